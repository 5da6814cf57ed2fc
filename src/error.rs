use thiserror::Error;

#[derive(Error, Debug)]
pub enum WsdlSamplerError {
    #[error("Unsupported schema construct `{construct}` in {context}")]
    UnsupportedConstruct { construct: String, context: String },

    #[error("Unresolved type reference: {reference}")]
    UnresolvedType { reference: String },

    #[error("Recursive type `{type_name}` at {path}")]
    RecursiveType { type_name: String, path: String },

    #[error("Resolution depth limit of {depth} exceeded at {path}")]
    DepthLimitExceeded { depth: usize, path: String },

    #[error("Duplicate {kind} definition: {name}")]
    DuplicateDefinition { kind: String, name: String },

    #[error("Import fetch failed for {location}: {message}")]
    ImportFetch { location: String, message: String },

    #[error("Parsing error: {message}")]
    Parsing { message: String },

    #[error("Render error: {message}")]
    Render { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[cfg(feature = "http-fetch")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl WsdlSamplerError {
    pub fn unsupported(construct: impl Into<String>, context: impl Into<String>) -> Self {
        Self::UnsupportedConstruct {
            construct: construct.into(),
            context: context.into(),
        }
    }

    pub fn parsing(message: impl Into<String>) -> Self {
        Self::Parsing {
            message: message.into(),
        }
    }

    pub fn import_fetch(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ImportFetch {
            location: location.into(),
            message: message.into(),
        }
    }

    /// True for the error kinds that abort a run because the schema itself
    /// uses something the resolver cannot express.
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedConstruct { .. }
                | Self::UnresolvedType { .. }
                | Self::RecursiveType { .. }
                | Self::DepthLimitExceeded { .. }
                | Self::DuplicateDefinition { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, WsdlSamplerError>;
