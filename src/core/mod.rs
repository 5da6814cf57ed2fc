pub mod config;

pub use config::{
    CollisionPolicy, CyclePolicy, FetchConfig, RenderOptions, SamplerConfig, SoapVersion,
};
