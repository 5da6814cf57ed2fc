use std::collections::HashSet;
use std::sync::Arc;

use super::fetcher::{DefaultFetcher, ImportFetcher, resolve_location};
use crate::core::{CollisionPolicy, FetchConfig};
use crate::error::{Result, WsdlSamplerError};
use crate::parser::parse_xml;
use crate::types::{SchemaDocument, TypeRegistry};
use crate::utils::{bounded_try_join_all, with_timeout};
use crate::wsdl::schema_documents;

/// Pulls in every imported schema document and merges all of them into one
/// type registry.
///
/// Fetching is the only asynchronous step of a run. Imports of one level are
/// fetched concurrently; the next level is only discovered once the whole
/// level has arrived. Any failure aborts the aggregation.
#[derive(Clone)]
pub struct SchemaAggregator {
    fetcher: Arc<dyn ImportFetcher>,
    config: FetchConfig,
    collision_policy: CollisionPolicy,
}

impl SchemaAggregator {
    pub fn new(fetcher: Arc<dyn ImportFetcher>) -> Self {
        Self {
            fetcher,
            config: FetchConfig::default(),
            collision_policy: CollisionPolicy::default(),
        }
    }

    pub fn with_config(mut self, config: FetchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Return `roots` followed by every document reachable through
    /// `import`/`include`, in breadth-first order.
    pub async fn aggregate(&self, roots: Vec<SchemaDocument>) -> Result<Vec<SchemaDocument>> {
        let mut visited: HashSet<String> = roots
            .iter()
            .filter_map(|document| document.location.as_deref())
            .map(|location| resolve_location(None, location))
            .collect();
        let mut frontier = pending_imports(&roots, &mut visited);
        let root_count = roots.len();
        let mut documents = roots;
        let mut depth = 0;

        while !frontier.is_empty() {
            depth += 1;
            if depth > self.config.max_import_depth {
                return Err(WsdlSamplerError::import_fetch(
                    frontier[0].clone(),
                    format!(
                        "import depth limit of {} exceeded",
                        self.config.max_import_depth
                    ),
                ));
            }

            tracing::debug!("Fetching {} imports at depth {}", frontier.len(), depth);
            let fetched = bounded_try_join_all(
                frontier,
                self.config.max_concurrent_fetches,
                |location| self.fetch_documents(location),
            )
            .await?;
            let fetched: Vec<SchemaDocument> = fetched.into_iter().flatten().collect();

            frontier = if self.config.follow_nested_imports {
                pending_imports(&fetched, &mut visited)
            } else {
                Vec::new()
            };
            documents.extend(fetched);
        }

        tracing::info!(
            "Aggregated {} schema documents ({} imported)",
            documents.len(),
            documents.len() - root_count
        );
        Ok(documents)
    }

    /// Merge documents into one registry; later declarations follow the
    /// collision policy.
    pub fn merge(&self, documents: Vec<SchemaDocument>) -> Result<TypeRegistry> {
        let count = documents.len();
        let registry = TypeRegistry::from_documents(documents, self.collision_policy)?;
        let stats = registry.stats();
        tracing::info!(
            "Merged {} documents: {} complex types, {} simple types, {} elements",
            count,
            stats.complex_types,
            stats.simple_types,
            stats.elements
        );
        Ok(registry)
    }

    /// `aggregate` then `merge`.
    pub async fn build_registry(&self, roots: Vec<SchemaDocument>) -> Result<TypeRegistry> {
        let documents = self.aggregate(roots).await?;
        self.merge(documents)
    }

    async fn fetch_documents(&self, location: String) -> Result<Vec<SchemaDocument>> {
        tracing::debug!("Fetching import {}", location);
        let text = with_timeout(self.fetcher.fetch(&location), self.config.timeout, &location).await?;
        let tree = parse_xml(&text)
            .map_err(|e| WsdlSamplerError::import_fetch(&location, e.to_string()))?;
        let documents = schema_documents(&tree, Some(&location))?;
        if documents.is_empty() {
            return Err(WsdlSamplerError::import_fetch(
                location,
                "document contains no schema",
            ));
        }
        Ok(documents)
    }
}

impl Default for SchemaAggregator {
    fn default() -> Self {
        Self::new(Arc::new(DefaultFetcher::new()))
    }
}

impl std::fmt::Debug for SchemaAggregator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaAggregator")
            .field("config", &self.config)
            .field("collision_policy", &self.collision_policy)
            .finish_non_exhaustive()
    }
}

/// Resolved locations declared by `documents` that have not been seen yet.
fn pending_imports(documents: &[SchemaDocument], visited: &mut HashSet<String>) -> Vec<String> {
    let mut pending = Vec::new();
    for document in documents {
        for location in document.import_locations() {
            let resolved = resolve_location(document.location.as_deref(), location);
            if visited.insert(resolved.clone()) {
                pending.push(resolved);
            }
        }
    }
    pending
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::StaticFetcher;

    fn schema(xml: &str, location: &str) -> SchemaDocument {
        schema_documents(&parse_xml(xml).unwrap(), Some(location))
            .unwrap()
            .remove(0)
    }

    #[tokio::test]
    async fn test_no_imports_returns_roots() {
        let aggregator = SchemaAggregator::new(Arc::new(StaticFetcher::new()));
        let root = schema("<schema><element name=\"A\" type=\"xs:int\"/></schema>", "root.xsd");

        let documents = aggregator.aggregate(vec![root]).await.unwrap();
        assert_eq!(documents.len(), 1);
    }

    #[tokio::test]
    async fn test_shared_import_is_fetched_once() {
        let fetcher = StaticFetcher::new()
            .with_document("a.xsd", "<schema><include schemaLocation=\"common.xsd\"/></schema>")
            .with_document("b.xsd", "<schema><include schemaLocation=\"common.xsd\"/></schema>")
            .with_document("common.xsd", "<schema><complexType name=\"C\"/></schema>");
        let aggregator = SchemaAggregator::new(Arc::new(fetcher));
        let root = schema(
            "<schema><import schemaLocation=\"a.xsd\"/><import schemaLocation=\"b.xsd\"/></schema>",
            "root.xsd",
        );

        let documents = aggregator.aggregate(vec![root]).await.unwrap();
        let locations: Vec<_> = documents
            .iter()
            .filter_map(|d| d.location.as_deref())
            .collect();
        assert_eq!(locations, vec!["root.xsd", "a.xsd", "b.xsd", "common.xsd"]);
    }

    #[tokio::test]
    async fn test_depth_limit() {
        let fetcher = StaticFetcher::new()
            .with_document("one.xsd", "<schema><import schemaLocation=\"two.xsd\"/></schema>")
            .with_document("two.xsd", "<schema/>");
        let aggregator = SchemaAggregator::new(Arc::new(fetcher))
            .with_config(FetchConfig::default().with_max_import_depth(1));
        let root = schema("<schema><import schemaLocation=\"one.xsd\"/></schema>", "root.xsd");

        let err = aggregator.aggregate(vec![root]).await.unwrap_err();
        assert!(matches!(
            err,
            WsdlSamplerError::ImportFetch { ref location, .. } if location == "two.xsd"
        ));
    }

    #[tokio::test]
    async fn test_nested_imports_can_be_disabled() {
        let fetcher = StaticFetcher::new()
            .with_document("one.xsd", "<schema><import schemaLocation=\"two.xsd\"/></schema>");
        let aggregator = SchemaAggregator::new(Arc::new(fetcher))
            .with_config(FetchConfig::default().no_nested_imports());
        let root = schema("<schema><import schemaLocation=\"one.xsd\"/></schema>", "root.xsd");

        let documents = aggregator.aggregate(vec![root]).await.unwrap();
        assert_eq!(documents.len(), 2);
    }
}
