use std::path::Path;
use std::sync::Arc;

use crate::collection::{Collection, CollectionBuilder};
use crate::converter::{SampleSet, SampleSynthesis, SampleSynthesizer};
use crate::core::SamplerConfig;
use crate::error::Result;
use crate::import::{DefaultFetcher, ImportFetcher, SchemaAggregator};
use crate::render::XmlRenderer;
use crate::wsdl::WsdlDefinitions;

/// Everything one conversion run produces.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub definitions: WsdlDefinitions,
    pub samples: SampleSet,
    pub collection: Collection,
}

/// End-to-end run: parse, fetch imports, synthesize, render, collect.
#[derive(Clone)]
pub struct WsdlConverter {
    config: SamplerConfig,
    fetcher: Arc<dyn ImportFetcher>,
}

impl WsdlConverter {
    pub fn new() -> Self {
        Self::with_config(SamplerConfig::default())
    }

    pub fn with_config(config: SamplerConfig) -> Self {
        Self {
            config,
            fetcher: Arc::new(DefaultFetcher::new()),
        }
    }

    pub fn with_fetcher(mut self, fetcher: Arc<dyn ImportFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    fn aggregator(&self) -> SchemaAggregator {
        SchemaAggregator::new(self.fetcher.clone())
            .with_config(self.config.fetch.clone())
            .with_collision_policy(self.config.collision_policy)
    }

    /// Parse a WSDL (or bare XSD) and synthesize a sample for every element
    /// of it and its imports.
    pub async fn samples(
        &self,
        xml: &str,
        location: Option<&str>,
    ) -> Result<(WsdlDefinitions, SampleSet)> {
        self.config.validate()?;
        let definitions = WsdlDefinitions::parse(xml, location)?;
        let registry = self
            .aggregator()
            .build_registry(definitions.schemas.clone())
            .await?;
        let samples = SampleSynthesizer::with_config(self.config.clone()).synthesize(&registry)?;
        Ok((definitions, samples))
    }

    pub async fn convert(&self, xml: &str, location: Option<&str>) -> Result<Conversion> {
        let (definitions, samples) = self.samples(xml, location).await?;
        let builder = CollectionBuilder::new(XmlRenderer::with_options(self.config.render.clone()));
        let collection = builder.build(&definitions, &samples)?;
        Ok(Conversion {
            definitions,
            samples,
            collection,
        })
    }

    /// Read `path` and convert it; relative imports resolve against `path`.
    pub async fn convert_file(&self, path: impl AsRef<Path>) -> Result<Conversion> {
        let path = path.as_ref();
        let xml = tokio::fs::read_to_string(path).await?;
        let location = path.to_string_lossy();
        self.convert(&xml, Some(&*location)).await
    }
}

impl Default for WsdlConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for WsdlConverter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsdlConverter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
