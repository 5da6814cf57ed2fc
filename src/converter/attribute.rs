use super::TypeResolver;
use super::context::SynthesisContext;
use crate::error::Result;
use crate::types::{AttributeDecl, AttributeKind, SampleNode, SampleValue};

impl TypeResolver<'_> {
    /// Resolve a set of attribute declarations into a node of `@name` entries.
    pub fn resolve_attributes(
        &self,
        attributes: &[AttributeDecl],
        context: &mut SynthesisContext,
    ) -> Result<SampleNode> {
        let mut node = SampleNode::new();
        for attribute in attributes {
            let value = self.resolve_attribute(attribute, context)?;
            node.insert(format!("@{}", attribute.name), value);
        }
        Ok(node)
    }

    pub fn resolve_attribute(
        &self,
        attribute: &AttributeDecl,
        context: &mut SynthesisContext,
    ) -> Result<SampleValue> {
        context.stats.attributes_resolved += 1;
        match &attribute.kind {
            AttributeKind::InlineSimple(simple) => {
                Ok(SampleValue::Leaf(self.resolve_simple(simple, context)?))
            }
            AttributeKind::TypeRef(reference) => self.resolve_type_ref(reference, context),
            // Top-level attribute declarations are not registered.
            AttributeKind::Ref(reference) => Ok(SampleValue::leaf(reference.as_str())),
            AttributeKind::Untyped => Ok(SampleValue::leaf("anySimpleType")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SamplerConfig;
    use crate::types::{QName, Restriction, SimpleDerivation, SimpleTypeDecl, TypeRegistry};

    #[test]
    fn test_attribute_kinds() {
        let registry = TypeRegistry::default();
        let attributes = vec![
            AttributeDecl::typed("id", "xs:ID"),
            AttributeDecl {
                name: "status".into(),
                kind: AttributeKind::InlineSimple(SimpleTypeDecl {
                    name: None,
                    derivation: SimpleDerivation::Restriction(Restriction {
                        base: Some(QName::parse("xs:string")),
                        enumeration: vec!["open".into(), "closed".into()],
                        ..Default::default()
                    }),
                }),
            },
            AttributeDecl {
                name: "lang".into(),
                kind: AttributeKind::Ref(QName::parse("xml:lang")),
            },
            AttributeDecl {
                name: "note".into(),
                kind: AttributeKind::Untyped,
            },
        ];

        let mut context = SynthesisContext::new(&SamplerConfig::default());
        let node = TypeResolver::new(&registry)
            .resolve_attributes(&attributes, &mut context)
            .unwrap();

        assert_eq!(node.len(), 4);
        assert_eq!(node.leaf("@id"), Some("ID"));
        assert_eq!(node.leaf("@status"), Some("enum:open/closed"));
        assert_eq!(node.leaf("@lang"), Some("xml:lang"));
        assert_eq!(node.leaf("@note"), Some("anySimpleType"));
        assert_eq!(context.stats.attributes_resolved, 4);
    }
}
