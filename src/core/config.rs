use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Result, WsdlSamplerError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SamplerConfig {
    pub cycle_policy: CyclePolicy,
    pub max_depth: usize,
    pub strict_references: bool,
    pub collision_policy: CollisionPolicy,
    pub fetch: FetchConfig,
    pub render: RenderOptions,
}

/// What to do when a named complex type is reached again while it is still
/// being expanded.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CyclePolicy {
    /// Stop expanding and emit a `recursive:<TypeName>` leaf.
    #[default]
    Truncate,
    /// Abort the run with a `RecursiveType` error.
    Fail,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CollisionPolicy {
    #[default]
    LastWriteWins,
    Reject,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub max_concurrent_fetches: usize,
    pub max_import_depth: usize,
    pub follow_nested_imports: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderOptions {
    pub indent: usize,
    pub xml_declaration: bool,
    pub soap_envelope: Option<SoapVersion>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum SoapVersion {
    #[serde(rename = "1.1")]
    Soap11,
    #[serde(rename = "1.2")]
    Soap12,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            cycle_policy: CyclePolicy::default(),
            max_depth: 64,
            strict_references: false,
            collision_policy: CollisionPolicy::default(),
            fetch: FetchConfig::default(),
            render: RenderOptions::default(),
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_concurrent_fetches: num_cpus::get(),
            max_import_depth: 8,
            follow_nested_imports: true,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            xml_declaration: true,
            soap_envelope: None,
        }
    }
}

impl SamplerConfig {
    /// Load a config from a JSON file. Missing fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn strict() -> Self {
        Self {
            cycle_policy: CyclePolicy::Fail,
            strict_references: true,
            collision_policy: CollisionPolicy::Reject,
            ..Default::default()
        }
    }

    pub fn with_cycle_policy(mut self, cycle_policy: CyclePolicy) -> Self {
        self.cycle_policy = cycle_policy;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_strict_references(mut self, strict: bool) -> Self {
        self.strict_references = strict;
        self
    }

    pub fn with_collision_policy(mut self, collision_policy: CollisionPolicy) -> Self {
        self.collision_policy = collision_policy;
        self
    }

    pub fn with_fetch_config(mut self, fetch: FetchConfig) -> Self {
        self.fetch = fetch;
        self
    }

    pub fn with_render_options(mut self, render: RenderOptions) -> Self {
        self.render = render;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            return Err(WsdlSamplerError::Configuration {
                message: "max_depth must be at least 1".to_string(),
            });
        }
        if self.fetch.max_concurrent_fetches == 0 {
            return Err(WsdlSamplerError::Configuration {
                message: "fetch.max_concurrent_fetches must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl FetchConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_concurrent_fetches(mut self, max: usize) -> Self {
        self.max_concurrent_fetches = max;
        self
    }

    pub fn with_max_import_depth(mut self, depth: usize) -> Self {
        self.max_import_depth = depth;
        self
    }

    pub fn no_nested_imports(mut self) -> Self {
        self.follow_nested_imports = false;
        self
    }
}

impl std::fmt::Display for SoapVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoapVersion::Soap11 => write!(f, "1.1"),
            SoapVersion::Soap12 => write!(f, "1.2"),
        }
    }
}

impl SoapVersion {
    /// Envelope namespace URI for this SOAP version
    pub fn envelope_namespace(&self) -> &'static str {
        match self {
            SoapVersion::Soap11 => "http://schemas.xmlsoap.org/soap/envelope/",
            SoapVersion::Soap12 => "http://www.w3.org/2003/05/soap-envelope",
        }
    }

    /// Conventional prefix used for the envelope elements
    pub fn prefix(&self) -> &'static str {
        match self {
            SoapVersion::Soap11 => "soap",
            SoapVersion::Soap12 => "soap12",
        }
    }
}
