mod attribute;
mod choice;
mod complex_type;
mod context;
mod element;
mod simple_type;

pub use choice::alternative_names;
pub use complex_type::TypeResolver;
pub use context::*;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::core::SamplerConfig;
use crate::error::Result;
use crate::types::{ElementDecl, QName, SampleNode, SampleValue, SchemaDocument, TypeRegistry};

/// One sample per top-level element, plus the statistics of the run.
#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    pub samples: IndexMap<String, SampleNode>,
    pub stats: ResolutionStats,
}

pub trait SampleSynthesis {
    fn synthesize(&self, registry: &TypeRegistry) -> Result<SampleSet>;
    fn synthesize_with_context(
        &self,
        registry: &TypeRegistry,
        context: &mut SynthesisContext,
    ) -> Result<SampleSet>;
}

/// Entry point of the resolution walk: expands every top-level element of a
/// registry into a sample node keyed by element name.
#[derive(Debug, Clone, Default)]
pub struct SampleSynthesizer {
    config: SamplerConfig,
}

impl SampleSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SamplerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Build a registry from `documents` with the configured collision policy
    /// and synthesize it.
    pub fn synthesize_documents<I>(&self, documents: I) -> Result<SampleSet>
    where
        I: IntoIterator<Item = SchemaDocument>,
    {
        let registry = TypeRegistry::from_documents(documents, self.config.collision_policy)?;
        self.synthesize(&registry)
    }

    /// Synthesize a single top-level element, if the registry declares it.
    pub fn synthesize_element(
        &self,
        registry: &TypeRegistry,
        name: &str,
    ) -> Result<Option<SampleNode>> {
        let Some(element) = registry.element(&QName::parse(name)) else {
            return Ok(None);
        };
        let mut context = SynthesisContext::new(&self.config);
        self.synthesize_one(&TypeResolver::new(registry), element, &mut context)
            .map(Some)
    }

    fn synthesize_one(
        &self,
        resolver: &TypeResolver<'_>,
        element: &ElementDecl,
        context: &mut SynthesisContext,
    ) -> Result<SampleNode> {
        tracing::debug!("Synthesizing sample for element {}", element.name);
        let value = resolver.resolve_element(element, context)?;
        context.stats.samples_synthesized += 1;

        Ok(match value {
            SampleValue::Node(node) => node,
            SampleValue::Leaf(text) => SampleNode::with_text(text),
        })
    }
}

impl SampleSynthesis for SampleSynthesizer {
    fn synthesize(&self, registry: &TypeRegistry) -> Result<SampleSet> {
        let mut context = SynthesisContext::new(&self.config);
        self.synthesize_with_context(registry, &mut context)
    }

    fn synthesize_with_context(
        &self,
        registry: &TypeRegistry,
        context: &mut SynthesisContext,
    ) -> Result<SampleSet> {
        context.begin_run();

        let resolver = TypeResolver::new(registry);
        let mut samples = IndexMap::new();
        for element in registry.elements() {
            let node = self.synthesize_one(&resolver, element, context)?;
            samples.insert(element.name.clone(), node);
        }

        context.end_run();
        Ok(SampleSet {
            samples,
            stats: context.stats.clone(),
        })
    }
}

impl SampleSet {
    pub fn get(&self, name: &str) -> Option<&SampleNode> {
        self.samples.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.samples.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// `{ elementName: { elementName: <sample> } }`, the shape a tree-to-XML
    /// renderer expects per document.
    pub fn to_json(&self) -> Value {
        let mut map = Map::new();
        for (name, node) in &self.samples {
            let mut document = Map::new();
            document.insert(name.clone(), node.to_json());
            map.insert(name.clone(), Value::Object(document));
        }
        Value::Object(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ComplexContent, ComplexTypeDecl, Particle, TypeDefinition};

    fn person_registry() -> TypeRegistry {
        let person = ComplexTypeDecl::named("Person").with_content(ComplexContent::Sequence(vec![
            Particle::Element(ElementDecl::typed("name", "xs:string")),
            Particle::Element(ElementDecl::typed("age", "xs:int")),
        ]));
        let mut registry = TypeRegistry::default();
        registry
            .register("Person", TypeDefinition::Complex(person))
            .unwrap();
        registry
            .register_element(ElementDecl::typed("Person", "tns:Person"))
            .unwrap();
        registry
            .register_element(ElementDecl::typed("Count", "xs:int"))
            .unwrap();
        registry
    }

    #[test]
    fn test_synthesize_all_elements() {
        let registry = person_registry();
        let set = SampleSynthesizer::new().synthesize(&registry).unwrap();

        assert_eq!(set.names().collect::<Vec<_>>(), vec!["Person", "Count"]);
        let person = set.get("Person").unwrap();
        assert_eq!(person.leaf("name"), Some("string"));
        assert_eq!(person.leaf("age"), Some("int"));
        assert_eq!(set.get("Count").unwrap().text.as_deref(), Some("int"));
        assert_eq!(set.stats.samples_synthesized, 2);
    }

    #[test]
    fn test_synthesize_single_element() {
        let registry = person_registry();
        let synthesizer = SampleSynthesizer::new();

        assert!(synthesizer.synthesize_element(&registry, "Person").unwrap().is_some());
        assert!(synthesizer.synthesize_element(&registry, "Nope").unwrap().is_none());
    }

    #[test]
    fn test_sample_set_json() {
        let registry = person_registry();
        let set = SampleSynthesizer::new().synthesize(&registry).unwrap();
        assert_eq!(
            set.to_json()["Person"],
            serde_json::json!({"Person": {"name": "string", "age": "int"}})
        );
    }
}
