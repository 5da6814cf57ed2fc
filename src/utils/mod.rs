pub mod async_helpers;

pub use async_helpers::{bounded_try_join_all, with_timeout};
