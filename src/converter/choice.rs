use super::TypeResolver;
use super::context::SynthesisContext;
use crate::error::Result;
use crate::types::{Particle, SampleNode};

impl TypeResolver<'_> {
    /// Expand every alternative of a choice and note which ones are optional.
    ///
    /// A sample lists all alternatives side by side rather than picking one.
    pub fn resolve_choice(
        &self,
        alternatives: &[Particle],
        context: &mut SynthesisContext,
    ) -> Result<SampleNode> {
        let names = alternative_names(alternatives);
        let mut node = SampleNode::new();
        if !names.is_empty() {
            node.annotate(format!("Optional nodes: {}", names.join(", ")));
        }

        node.overlay(self.resolve_particles(alternatives, context)?);
        context.stats.choices_expanded += 1;
        Ok(node)
    }
}

/// Element names offered by a choice, looking through nested sequences.
pub fn alternative_names(alternatives: &[Particle]) -> Vec<&str> {
    let mut names = Vec::new();
    for particle in alternatives {
        match particle {
            Particle::Element(element) => names.push(element.name.as_str()),
            Particle::Sequence(nested) => names.extend(alternative_names(nested)),
            Particle::Choice(_) | Particle::Any => {}
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SamplerConfig;
    use crate::types::{ElementDecl, TypeRegistry};

    #[test]
    fn test_all_alternatives_are_expanded() {
        let registry = TypeRegistry::default();
        let alternatives = vec![
            Particle::Element(ElementDecl::typed("X", "xs:string")),
            Particle::Element(ElementDecl::typed("Y", "xs:int")),
        ];

        let mut context = SynthesisContext::new(&SamplerConfig::default());
        let node = TypeResolver::new(&registry)
            .resolve_choice(&alternatives, &mut context)
            .unwrap();

        assert_eq!(node.annotation.as_deref(), Some("Optional nodes: X, Y"));
        assert_eq!(node.leaf("X"), Some("string"));
        assert_eq!(node.leaf("Y"), Some("int"));
        assert_eq!(context.stats.choices_expanded, 1);
    }

    #[test]
    fn test_nested_choice_notes_are_joined() {
        let registry = TypeRegistry::default();
        let alternatives = vec![
            Particle::Element(ElementDecl::typed("card", "xs:string")),
            Particle::Choice(vec![
                Particle::Element(ElementDecl::typed("iban", "xs:string")),
                Particle::Element(ElementDecl::typed("bic", "xs:string")),
            ]),
        ];

        let mut context = SynthesisContext::new(&SamplerConfig::default());
        let node = TypeResolver::new(&registry)
            .resolve_choice(&alternatives, &mut context)
            .unwrap();

        assert_eq!(
            node.annotation.as_deref(),
            Some("Optional nodes: card; Optional nodes: iban, bic")
        );
        assert_eq!(node.len(), 3);
    }

    #[test]
    fn test_names_look_through_sequences() {
        let alternatives = vec![
            Particle::Element(ElementDecl::typed("a", "xs:string")),
            Particle::Sequence(vec![
                Particle::Element(ElementDecl::typed("b", "xs:string")),
                Particle::Element(ElementDecl::typed("c", "xs:string")),
            ]),
            Particle::Any,
        ];
        assert_eq!(alternative_names(&alternatives), vec!["a", "b", "c"]);
    }
}
