use super::TypeResolver;
use super::context::{GuardKind, SynthesisContext};
use crate::error::Result;
use crate::types::{ElementDecl, ElementKind, QName, SampleValue};

impl TypeResolver<'_> {
    /// Resolve one element declaration to the value stored under its name.
    pub fn resolve_element(
        &self,
        element: &ElementDecl,
        context: &mut SynthesisContext,
    ) -> Result<SampleValue> {
        context.enter(&element.name)?;
        let value = self.resolve_element_kind(&element.kind, context);
        context.leave();
        context.stats.elements_resolved += 1;
        value
    }

    fn resolve_element_kind(
        &self,
        kind: &ElementKind,
        context: &mut SynthesisContext,
    ) -> Result<SampleValue> {
        match kind {
            ElementKind::TypeRef(reference) => self.resolve_type_ref(reference, context),
            ElementKind::Ref(reference) => self.resolve_element_ref(reference, context),
            ElementKind::InlineComplex(decl) => {
                self.resolve_complex(decl, context).map(SampleValue::Node)
            }
            ElementKind::InlineSimple(decl) => {
                self.resolve_simple(decl, context).map(SampleValue::Leaf)
            }
            ElementKind::Empty => Ok(SampleValue::leaf("")),
        }
    }

    /// `ref="p:Name"` takes the content of the referenced top-level element.
    fn resolve_element_ref(
        &self,
        reference: &QName,
        context: &mut SynthesisContext,
    ) -> Result<SampleValue> {
        let Some(target) = self.registry.element(reference) else {
            return self.unresolved(reference, context);
        };

        self.guarded(GuardKind::ElementRef, &target.name, context, |context| {
            self.resolve_element_kind(&target.kind, context)
        })
    }
}
