use super::TypeResolver;
use super::context::SynthesisContext;
use crate::error::Result;
use crate::types::{ListDecl, Restriction, SimpleDerivation, SimpleTypeDecl};

impl TypeResolver<'_> {
    /// Describe a simple type as one leaf string.
    ///
    /// Enumerations win over patterns, patterns over the bare base name.
    pub fn resolve_simple(
        &self,
        decl: &SimpleTypeDecl,
        context: &mut SynthesisContext,
    ) -> Result<String> {
        match &decl.derivation {
            SimpleDerivation::Restriction(restriction) => {
                self.describe_restriction(restriction, context)
            }
            SimpleDerivation::List(list) => self.describe_list(list, context),
        }
    }

    fn describe_restriction(
        &self,
        restriction: &Restriction,
        context: &mut SynthesisContext,
    ) -> Result<String> {
        if !restriction.enumeration.is_empty() {
            return Ok(format!("enum:{}", restriction.enumeration.join("/")));
        }
        if let Some(pattern) = &restriction.pattern {
            return Ok(pattern.clone());
        }
        if let Some(base) = &restriction.base {
            return Ok(format!("base:{}", base.local_name()));
        }
        match &restriction.inline_base {
            Some(inline) => self.resolve_simple(inline, context),
            None => Ok("base:anySimpleType".to_string()),
        }
    }

    fn describe_list(&self, list: &ListDecl, context: &mut SynthesisContext) -> Result<String> {
        let item = match (&list.item_type, &list.inline_item) {
            (Some(item_type), _) => item_type.local_name().to_string(),
            (None, Some(inline)) => self.resolve_simple(inline, context)?,
            (None, None) => "anySimpleType".to_string(),
        };
        Ok(format!("list:{item}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SamplerConfig;
    use crate::types::{QName, TypeRegistry};

    fn describe(derivation: SimpleDerivation) -> String {
        let registry = TypeRegistry::default();
        let mut context = SynthesisContext::new(&SamplerConfig::default());
        let decl = SimpleTypeDecl {
            name: None,
            derivation,
        };
        TypeResolver::new(&registry)
            .resolve_simple(&decl, &mut context)
            .unwrap()
    }

    #[test]
    fn test_enumeration() {
        let restriction = Restriction {
            base: Some(QName::parse("xs:string")),
            enumeration: vec!["A".into(), "B".into(), "C".into()],
            pattern: Some("[A-C]".into()),
            ..Default::default()
        };
        assert_eq!(describe(SimpleDerivation::Restriction(restriction)), "enum:A/B/C");
    }

    #[test]
    fn test_pattern() {
        let restriction = Restriction {
            base: Some(QName::parse("xs:string")),
            pattern: Some("\\d{3}-\\d{4}".into()),
            ..Default::default()
        };
        assert_eq!(describe(SimpleDerivation::Restriction(restriction)), "\\d{3}-\\d{4}");
    }

    #[test]
    fn test_base_only() {
        let restriction = Restriction {
            base: Some(QName::parse("xsd:decimal")),
            ..Default::default()
        };
        assert_eq!(describe(SimpleDerivation::Restriction(restriction)), "base:decimal");
    }

    #[test]
    fn test_list() {
        let list = ListDecl {
            item_type: Some(QName::parse("xs:string")),
            inline_item: None,
        };
        assert_eq!(describe(SimpleDerivation::List(list)), "list:string");
    }

    #[test]
    fn test_list_of_inline_enumeration() {
        let inline = SimpleTypeDecl {
            name: None,
            derivation: SimpleDerivation::Restriction(Restriction {
                base: Some(QName::parse("xs:string")),
                enumeration: vec!["red".into(), "green".into()],
                ..Default::default()
            }),
        };
        let list = ListDecl {
            item_type: None,
            inline_item: Some(Box::new(inline)),
        };
        assert_eq!(describe(SimpleDerivation::List(list)), "list:enum:red/green");
    }
}
