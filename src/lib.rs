//! # WSDL Sampler
//!
//! Resolves the XSD type graph of a WSDL (or a bare schema) into synthetic
//! sample documents, one per top-level element, and turns them into a
//! request collection.
//!
//! ## Features
//!
//! - **Type resolution**: named and inline complex types, `sequence`/`choice`/`all`,
//!   `simpleContent`/`complexContent` extension, attributes, enumerations, patterns and lists
//! - **Cycle handling**: recursive types are truncated with a marker leaf or rejected
//! - **Imports**: `import`/`include` documents fetched concurrently over HTTP or from disk
//! - **Output**: XML rendering with optional SOAP envelope and Postman v2.0.0 collections
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wsdl_sampler::*;
//!
//! # fn example() -> Result<()> {
//! let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
//!   <xs:complexType name="Person">
//!     <xs:sequence>
//!       <xs:element name="name" type="xs:string"/>
//!       <xs:element name="age" type="xs:int"/>
//!     </xs:sequence>
//!   </xs:complexType>
//!   <xs:element name="Person" type="Person"/>
//! </xs:schema>"#;
//!
//! let definitions = WsdlDefinitions::parse(xsd, None)?;
//! let samples = SampleSynthesizer::new().synthesize_documents(definitions.schemas)?;
//! let xml = XmlRenderer::new().render("Person", &samples.samples["Person"])?;
//! # Ok(())
//! # }
//! ```

pub mod collection;
pub mod converter;
pub mod core;
pub mod error;
pub mod import;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod types;
pub mod utils;
pub mod wsdl;

pub use collection::{Collection, CollectionBuilder};
pub use converter::{
    ResolutionStats, SampleSet, SampleSynthesis, SampleSynthesizer, SynthesisContext,
    TypeResolver,
};
pub use core::{CollisionPolicy, CyclePolicy, FetchConfig, RenderOptions, SamplerConfig, SoapVersion};
pub use error::{Result, WsdlSamplerError};
pub use import::{DefaultFetcher, FileFetcher, ImportFetcher, SchemaAggregator, StaticFetcher};
pub use parser::parse_xml;
pub use pipeline::{Conversion, WsdlConverter};
pub use render::XmlRenderer;
pub use types::*;
pub use wsdl::WsdlDefinitions;

#[cfg(feature = "http-fetch")]
pub use import::HttpFetcher;
