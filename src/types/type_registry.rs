use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

use super::qname::{CONVENTIONAL_XSD_PREFIXES, QName};
use super::schema::{ComplexTypeDecl, ElementDecl, SchemaDocument, SimpleTypeDecl};
use crate::core::CollisionPolicy;
use crate::error::{Result, WsdlSamplerError};

/// A named type declaration as stored in the registry.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefinition {
    Complex(ComplexTypeDecl),
    Simple(SimpleTypeDecl),
}

/// Outcome of looking up a type reference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TypeLookup<'a> {
    Complex(&'a ComplexTypeDecl),
    Simple(&'a SimpleTypeDecl),
    /// Not registered, but a built-in XSD datatype; carries the local name.
    Builtin(&'a str),
    /// Not registered and not built-in.
    Missing,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistryStats {
    pub complex_types: usize,
    pub simple_types: usize,
    pub elements: usize,
    pub overwritten: usize,
}

/// Named declarations of every merged schema document, keyed by local name.
///
/// Namespace prefixes are ignored on both registration and lookup, so two
/// documents declaring the same local name collide. The collision policy
/// decides whether the later declaration replaces the earlier one or the
/// merge fails.
///
/// A reference only counts as a built-in datatype when its prefix is bound
/// to the XSD namespace in one of the merged documents. Until a document
/// with such a binding is added, `xs` and `xsd` are assumed.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, TypeDefinition>,
    elements: IndexMap<String, ElementDecl>,
    xsd_prefixes: HashSet<String>,
    policy: CollisionPolicy,
    overwritten: usize,
}

impl TypeRegistry {
    pub fn new(policy: CollisionPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    /// Register every declaration of `documents` in order.
    pub fn from_documents<I>(documents: I, policy: CollisionPolicy) -> Result<Self>
    where
        I: IntoIterator<Item = SchemaDocument>,
    {
        let mut registry = Self::new(policy);
        for document in documents {
            registry.add_document(document)?;
        }
        Ok(registry)
    }

    pub fn add_document(&mut self, document: SchemaDocument) -> Result<()> {
        self.xsd_prefixes
            .extend(document.xsd_prefixes().into_iter().map(str::to_string));
        for complex in document.complex_types {
            match complex.name.clone() {
                Some(name) => self.register(name, TypeDefinition::Complex(complex))?,
                None => tracing::warn!("Skipping anonymous top-level complexType"),
            }
        }
        for simple in document.simple_types {
            match simple.name.clone() {
                Some(name) => self.register(name, TypeDefinition::Simple(simple))?,
                None => tracing::warn!("Skipping anonymous top-level simpleType"),
            }
        }
        for element in document.elements {
            self.register_element(element)?;
        }
        Ok(())
    }

    /// Store a declaration under the local part of `name`.
    pub fn register(&mut self, name: impl AsRef<str>, definition: TypeDefinition) -> Result<()> {
        let key = QName::parse(name.as_ref()).local_name().to_string();
        if self.types.contains_key(&key) {
            self.on_collision("type", &key)?;
        }
        tracing::debug!("Registered type {}", key);
        self.types.insert(key, definition);
        Ok(())
    }

    pub fn register_element(&mut self, element: ElementDecl) -> Result<()> {
        if self.elements.contains_key(&element.name) {
            self.on_collision("element", &element.name)?;
        }
        self.elements.insert(element.name.clone(), element);
        Ok(())
    }

    fn on_collision(&mut self, kind: &str, name: &str) -> Result<()> {
        match self.policy {
            CollisionPolicy::LastWriteWins => {
                tracing::warn!("Duplicate {} definition `{}`, keeping the later one", kind, name);
                self.overwritten += 1;
                Ok(())
            }
            CollisionPolicy::Reject => Err(WsdlSamplerError::DuplicateDefinition {
                kind: kind.to_string(),
                name: name.to_string(),
            }),
        }
    }

    /// Strip the prefix of `reference` and classify what it names.
    pub fn resolve<'a>(&'a self, reference: &'a QName) -> TypeLookup<'a> {
        match self.types.get(reference.local_name()) {
            Some(TypeDefinition::Complex(complex)) => TypeLookup::Complex(complex),
            Some(TypeDefinition::Simple(simple)) => TypeLookup::Simple(simple),
            None if reference.is_builtin() && self.is_xsd_prefix(reference.prefix()) => {
                TypeLookup::Builtin(reference.local_name())
            }
            None => TypeLookup::Missing,
        }
    }

    /// Whether `prefix` (`None` for an unprefixed name) denotes the XSD namespace.
    pub fn is_xsd_prefix(&self, prefix: Option<&str>) -> bool {
        if self.xsd_prefixes.is_empty() {
            return prefix.is_some_and(|p| CONVENTIONAL_XSD_PREFIXES.contains(&p));
        }
        self.xsd_prefixes.contains(prefix.unwrap_or_default())
    }

    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(QName::parse(name).local_name())
    }

    pub fn element(&self, reference: &QName) -> Option<&ElementDecl> {
        self.elements.get(reference.local_name())
    }

    /// Top-level elements in first-registration order.
    pub fn elements(&self) -> impl Iterator<Item = &ElementDecl> {
        self.elements.values()
    }

    pub fn contains_type(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn stats(&self) -> RegistryStats {
        let complex_types = self
            .types
            .values()
            .filter(|definition| matches!(definition, TypeDefinition::Complex(_)))
            .count();
        RegistryStats {
            complex_types,
            simple_types: self.types.len() - complex_types,
            elements: self.elements.len(),
            overwritten: self.overwritten,
        }
    }
}
