use super::context::{GuardKind, SynthesisContext};
use crate::core::CyclePolicy;
use crate::error::{Result, WsdlSamplerError};
use crate::types::{
    ComplexContent, ComplexTypeDecl, Derivation, Extension, Particle, QName, SampleNode,
    SampleValue, TypeLookup, TypeRegistry,
};

/// Recursive expansion of type references into sample values.
///
/// The resolver itself is stateless; everything that changes during a run
/// lives in the [`SynthesisContext`] passed to each call. The other resolver
/// modules (`simple_type`, `attribute`, `choice`, `element`) add their own
/// `impl` blocks to this type.
#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    pub(crate) registry: &'a TypeRegistry,
}

impl<'a> TypeResolver<'a> {
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// The single junction every type reference passes through.
    pub fn resolve_type_ref(
        &self,
        reference: &QName,
        context: &mut SynthesisContext,
    ) -> Result<SampleValue> {
        match self.registry.resolve(reference) {
            TypeLookup::Complex(decl) => self.resolve_named_complex(reference.local_name(), decl, context),
            TypeLookup::Simple(decl) => Ok(SampleValue::Leaf(self.resolve_simple(decl, context)?)),
            TypeLookup::Builtin(local) => Ok(SampleValue::leaf(local)),
            TypeLookup::Missing => self.unresolved(reference, context),
        }
    }

    /// Fallback for a reference the registry does not know.
    pub(crate) fn unresolved(
        &self,
        reference: &QName,
        context: &mut SynthesisContext,
    ) -> Result<SampleValue> {
        if context.config.strict_references {
            return Err(WsdlSamplerError::UnresolvedType {
                reference: reference.to_string(),
            });
        }
        context.record_opaque_reference(reference.as_str());
        Ok(SampleValue::leaf(reference.as_str()))
    }

    pub fn resolve_named_complex(
        &self,
        name: &str,
        decl: &ComplexTypeDecl,
        context: &mut SynthesisContext,
    ) -> Result<SampleValue> {
        self.guarded(GuardKind::ComplexType, name, context, |context| {
            tracing::debug!("Expanding complex type {} at {}", name, context.current_path());
            self.resolve_complex(decl, context).map(SampleValue::Node)
        })
    }

    /// Run `expand` with `name` marked active, applying the cycle policy if it
    /// already is.
    pub(crate) fn guarded<F>(
        &self,
        kind: GuardKind,
        name: &str,
        context: &mut SynthesisContext,
        expand: F,
    ) -> Result<SampleValue>
    where
        F: FnOnce(&mut SynthesisContext) -> Result<SampleValue>,
    {
        if context.is_active(kind, name) {
            return match context.config.cycle_policy {
                CyclePolicy::Truncate => {
                    context.record_truncation(name);
                    Ok(SampleValue::Leaf(format!("recursive:{name}")))
                }
                CyclePolicy::Fail => Err(WsdlSamplerError::RecursiveType {
                    type_name: name.to_string(),
                    path: context.current_path(),
                }),
            };
        }

        context.push_active(kind, name);
        let result = expand(context);
        context.pop_active(kind);
        result
    }

    /// Expand a complex type declaration, named or inline, into a new node.
    pub fn resolve_complex(
        &self,
        decl: &ComplexTypeDecl,
        context: &mut SynthesisContext,
    ) -> Result<SampleNode> {
        let mut node = match &decl.content {
            None => SampleNode::new(),
            Some(ComplexContent::Sequence(particles)) => self.resolve_particles(particles, context)?,
            Some(ComplexContent::SimpleContent(derivation))
            | Some(ComplexContent::ComplexContent(derivation)) => {
                self.resolve_derivation(derivation, context)?
            }
        };

        node.overlay(self.resolve_attributes(&decl.attributes, context)?);
        Ok(node)
    }

    /// Elements, choices and nested sequences of one content model, in order.
    pub fn resolve_particles(
        &self,
        particles: &[Particle],
        context: &mut SynthesisContext,
    ) -> Result<SampleNode> {
        let mut node = SampleNode::new();
        for particle in particles {
            match particle {
                Particle::Element(element) => {
                    let value = self.resolve_element(element, context)?;
                    node.insert(element.name.clone(), value);
                }
                Particle::Choice(alternatives) => {
                    node.overlay(self.resolve_choice(alternatives, context)?);
                }
                Particle::Sequence(nested) => {
                    node.overlay(self.resolve_particles(nested, context)?);
                }
                Particle::Any => {
                    tracing::debug!("Ignoring xs:any at {}", context.current_path());
                }
            }
        }
        Ok(node)
    }

    fn resolve_derivation(
        &self,
        derivation: &Derivation,
        context: &mut SynthesisContext,
    ) -> Result<SampleNode> {
        match derivation {
            Derivation::Extension(extension) => self.resolve_extension(extension, context),
            Derivation::Restriction { base } => {
                tracing::debug!(
                    "Content restriction of {} at {} contributes nothing",
                    base,
                    context.current_path()
                );
                Ok(SampleNode::new())
            }
        }
    }

    /// The base type becomes the starting node; the extension's own
    /// particles and attributes are overlaid on top of it.
    fn resolve_extension(
        &self,
        extension: &Extension,
        context: &mut SynthesisContext,
    ) -> Result<SampleNode> {
        let mut node = match self.resolve_type_ref(&extension.base, context)? {
            SampleValue::Node(base) => base,
            SampleValue::Leaf(text) => SampleNode::with_text(text),
        };

        node.overlay(self.resolve_particles(&extension.particles, context)?);
        node.overlay(self.resolve_attributes(&extension.attributes, context)?);
        context.stats.extensions_applied += 1;
        Ok(node)
    }
}
