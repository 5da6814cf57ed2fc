//! Typed XSD construct model.
//!
//! The labeled tree from the XML boundary is converted here into closed enums,
//! one variant per construct the resolver understands. Keywords outside that
//! set are rejected during conversion with `UnsupportedConstruct`, so the
//! resolver itself never sees an unknown key.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::qname::{QName, is_xsd_namespace};
use super::tree::{self, attr, cast_array, element_entries, namespace_bindings};
use crate::error::{Result, WsdlSamplerError};

/// Restriction facets that are recognized but contribute nothing to a sample.
const IGNORED_FACETS: &[&str] = &[
    "minInclusive",
    "maxInclusive",
    "minExclusive",
    "maxExclusive",
    "length",
    "minLength",
    "maxLength",
    "totalDigits",
    "fractionDigits",
    "whiteSpace",
];

/// Identity constraints allowed under an element declaration.
const IDENTITY_CONSTRAINTS: &[&str] = &["unique", "key", "keyref"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    pub target_namespace: Option<String>,
    /// Where the document was loaded from; relative imports resolve against it.
    pub location: Option<String>,
    pub elements: Vec<ElementDecl>,
    pub complex_types: Vec<ComplexTypeDecl>,
    pub simple_types: Vec<SimpleTypeDecl>,
    pub imports: Vec<ImportDecl>,
    /// Prefix to URI bindings in scope at the `schema` element, the default
    /// namespace under `""`.
    #[serde(default)]
    pub namespaces: IndexMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportKind {
    Import,
    Include,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportDecl {
    pub kind: ImportKind,
    pub namespace: Option<String>,
    pub schema_location: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDecl {
    pub name: String,
    pub kind: ElementKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ElementKind {
    /// `type="p:Name"`
    TypeRef(QName),
    /// `ref="p:Name"` pointing at a top-level element
    Ref(QName),
    InlineComplex(Box<ComplexTypeDecl>),
    InlineSimple(SimpleTypeDecl),
    /// No type information at all
    Empty,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDecl {
    pub name: String,
    pub kind: AttributeKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AttributeKind {
    TypeRef(QName),
    InlineSimple(SimpleTypeDecl),
    Ref(QName),
    Untyped,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComplexTypeDecl {
    pub name: Option<String>,
    pub attributes: Vec<AttributeDecl>,
    pub content: Option<ComplexContent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComplexContent {
    /// `sequence`, `all`, or a bare `choice`, flattened into particles
    Sequence(Vec<Particle>),
    SimpleContent(Derivation),
    ComplexContent(Derivation),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Particle {
    Element(ElementDecl),
    Choice(Vec<Particle>),
    Sequence(Vec<Particle>),
    Any,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Derivation {
    Extension(Extension),
    Restriction { base: QName },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extension {
    pub base: QName,
    pub attributes: Vec<AttributeDecl>,
    pub particles: Vec<Particle>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimpleTypeDecl {
    pub name: Option<String>,
    pub derivation: SimpleDerivation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SimpleDerivation {
    Restriction(Restriction),
    List(ListDecl),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Restriction {
    pub base: Option<QName>,
    pub inline_base: Option<Box<SimpleTypeDecl>>,
    pub enumeration: Vec<String>,
    pub pattern: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListDecl {
    pub item_type: Option<QName>,
    pub inline_item: Option<Box<SimpleTypeDecl>>,
}

impl SchemaDocument {
    /// Convert a `schema` node of the labeled tree.
    pub fn from_tree(schema: &Value) -> Result<Self> {
        let mut document = SchemaDocument {
            target_namespace: attr(schema, "targetNamespace").map(str::to_string),
            ..Default::default()
        }
        .inherit_namespaces(schema);

        for (key, value) in element_entries(schema) {
            match key {
                "element" => {
                    for node in cast_array(Some(value)) {
                        document.elements.push(parse_element(node, "schema")?);
                    }
                }
                "complexType" => {
                    for node in cast_array(Some(value)) {
                        document.complex_types.push(parse_complex_type(node, "schema")?);
                    }
                }
                "simpleType" => {
                    for node in cast_array(Some(value)) {
                        document.simple_types.push(parse_simple_type(node, "schema")?);
                    }
                }
                "import" | "include" => {
                    let kind = if key == "import" {
                        ImportKind::Import
                    } else {
                        ImportKind::Include
                    };
                    for node in cast_array(Some(value)) {
                        document.imports.push(ImportDecl {
                            kind,
                            namespace: attr(node, "namespace").map(str::to_string),
                            schema_location: attr(node, "schemaLocation").map(str::to_string),
                        });
                    }
                }
                // Definitions that only matter once referenced; references are rejected.
                "annotation" | "attribute" | "attributeGroup" | "group" | "notation" => {
                    tracing::debug!("Skipping top-level schema construct: {}", key);
                }
                other => return Err(WsdlSamplerError::unsupported(other, "schema")),
            }
        }

        Ok(document)
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Add the bindings declared on `node` that are not already in scope.
    /// Apply the innermost scope first.
    pub fn inherit_namespaces(mut self, node: &Value) -> Self {
        for (prefix, uri) in namespace_bindings(node) {
            self.namespaces
                .entry(prefix.to_string())
                .or_insert_with(|| uri.to_string());
        }
        self
    }

    /// Prefixes bound to an XSD namespace; `""` when it is the default namespace.
    pub fn xsd_prefixes(&self) -> Vec<&str> {
        self.namespaces
            .iter()
            .filter(|(_, uri)| is_xsd_namespace(uri))
            .map(|(prefix, _)| prefix.as_str())
            .collect()
    }

    /// `schemaLocation` values of all imports and includes, in declaration order.
    pub fn import_locations(&self) -> Vec<&str> {
        self.imports
            .iter()
            .filter_map(|import| import.schema_location.as_deref())
            .collect()
    }

    pub fn element_names(&self) -> Vec<&str> {
        self.elements.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn complex_type_names(&self) -> Vec<&str> {
        self.complex_types
            .iter()
            .filter_map(|t| t.name.as_deref())
            .collect()
    }
}

impl ElementDecl {
    pub fn new(name: impl Into<String>, kind: ElementKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn typed(name: impl Into<String>, type_ref: impl Into<QName>) -> Self {
        Self::new(name, ElementKind::TypeRef(type_ref.into()))
    }
}

impl AttributeDecl {
    pub fn typed(name: impl Into<String>, type_ref: impl Into<QName>) -> Self {
        Self {
            name: name.into(),
            kind: AttributeKind::TypeRef(type_ref.into()),
        }
    }
}

impl ComplexTypeDecl {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, attribute: AttributeDecl) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_content(mut self, content: ComplexContent) -> Self {
        self.content = Some(content);
        self
    }
}

fn parse_element(node: &Value, context: &str) -> Result<ElementDecl> {
    let reference = attr(node, "ref").map(QName::parse);
    let name = match (attr(node, "name"), &reference) {
        (Some(name), _) => name.to_string(),
        (None, Some(reference)) => reference.local_name().to_string(),
        (None, None) => {
            return Err(WsdlSamplerError::parsing(format!(
                "element without name or ref in {context}"
            )));
        }
    };
    let path = format!("{context}/element[{name}]");

    let mut inline_complex = None;
    let mut inline_simple = None;
    for (key, value) in element_entries(node) {
        match key {
            "complexType" => {
                if let Some(first) = cast_array(Some(value)).first() {
                    inline_complex = Some(parse_complex_type(first, &path)?);
                } else {
                    inline_complex = Some(ComplexTypeDecl::default());
                }
            }
            "simpleType" => {
                if let Some(first) = cast_array(Some(value)).first() {
                    inline_simple = Some(parse_simple_type(first, &path)?);
                }
            }
            "annotation" => {}
            key if IDENTITY_CONSTRAINTS.contains(&key) => {}
            other => return Err(WsdlSamplerError::unsupported(other, path)),
        }
    }

    let kind = if let Some(type_ref) = attr(node, "type") {
        ElementKind::TypeRef(QName::parse(type_ref))
    } else if let Some(reference) = reference {
        ElementKind::Ref(reference)
    } else if let Some(complex) = inline_complex {
        ElementKind::InlineComplex(Box::new(complex))
    } else if let Some(simple) = inline_simple {
        ElementKind::InlineSimple(simple)
    } else {
        ElementKind::Empty
    };

    Ok(ElementDecl { name, kind })
}

fn parse_attributes(value: &Value, context: &str) -> Result<Vec<AttributeDecl>> {
    cast_array(Some(value))
        .into_iter()
        .map(|node| parse_attribute(node, context))
        .collect()
}

fn parse_attribute(node: &Value, context: &str) -> Result<AttributeDecl> {
    let reference = attr(node, "ref").map(QName::parse);
    let name = match (attr(node, "name"), &reference) {
        (Some(name), _) => name.to_string(),
        (None, Some(reference)) => reference.local_name().to_string(),
        (None, None) => {
            return Err(WsdlSamplerError::parsing(format!(
                "attribute without name or ref in {context}"
            )));
        }
    };
    let path = format!("{context}/attribute[{name}]");

    let mut inline_simple = None;
    for (key, value) in element_entries(node) {
        match key {
            "simpleType" => {
                if let Some(first) = cast_array(Some(value)).first() {
                    inline_simple = Some(parse_simple_type(first, &path)?);
                }
            }
            "annotation" => {}
            other => return Err(WsdlSamplerError::unsupported(other, path)),
        }
    }

    let kind = if let Some(simple) = inline_simple {
        AttributeKind::InlineSimple(simple)
    } else if let Some(type_ref) = attr(node, "type") {
        AttributeKind::TypeRef(QName::parse(type_ref))
    } else if let Some(reference) = reference {
        AttributeKind::Ref(reference)
    } else {
        AttributeKind::Untyped
    };

    Ok(AttributeDecl { name, kind })
}

fn parse_complex_type(node: &Value, context: &str) -> Result<ComplexTypeDecl> {
    let name = attr(node, "name").map(str::to_string);
    let path = match &name {
        Some(name) => format!("{context}/complexType[{name}]"),
        None => format!("{context}/complexType"),
    };

    let mut decl = ComplexTypeDecl {
        name,
        ..Default::default()
    };

    for (key, value) in element_entries(node) {
        let content = match key {
            "attribute" => {
                decl.attributes.extend(parse_attributes(value, &path)?);
                continue;
            }
            "annotation" | "anyAttribute" => continue,
            "sequence" | "all" => ComplexContent::Sequence(parse_group(value, key, &path)?),
            "choice" => ComplexContent::Sequence(parse_choices(value, &path)?),
            "simpleContent" => ComplexContent::SimpleContent(parse_derivation(value, key, &path)?),
            "complexContent" => {
                ComplexContent::ComplexContent(parse_derivation(value, key, &path)?)
            }
            other => return Err(WsdlSamplerError::unsupported(other, path)),
        };
        if decl.content.is_some() {
            return Err(WsdlSamplerError::unsupported(
                format!("{key} (second content model)"),
                path,
            ));
        }
        decl.content = Some(content);
    }

    Ok(decl)
}

/// Particles of every `sequence`/`all` node under one key, in order.
fn parse_group(value: &Value, keyword: &str, context: &str) -> Result<Vec<Particle>> {
    let path = format!("{context}/{keyword}");
    let mut particles = Vec::new();
    for group in cast_array(Some(value)) {
        particles.extend(parse_particles(group, &path)?);
    }
    Ok(particles)
}

fn parse_choices(value: &Value, context: &str) -> Result<Vec<Particle>> {
    let path = format!("{context}/choice");
    cast_array(Some(value))
        .into_iter()
        .map(|choice| parse_particles(choice, &path).map(Particle::Choice))
        .collect()
}

fn parse_particles(group: &Value, context: &str) -> Result<Vec<Particle>> {
    let mut particles = Vec::new();
    for (key, value) in element_entries(group) {
        match key {
            "element" => {
                for node in cast_array(Some(value)) {
                    particles.push(Particle::Element(parse_element(node, context)?));
                }
            }
            "choice" => particles.extend(parse_choices(value, context)?),
            "sequence" => {
                for nested in cast_array(Some(value)) {
                    let path = format!("{context}/sequence");
                    particles.push(Particle::Sequence(parse_particles(nested, &path)?));
                }
            }
            "any" => particles.push(Particle::Any),
            "annotation" => {}
            other => return Err(WsdlSamplerError::unsupported(other, context)),
        }
    }
    Ok(particles)
}

fn parse_derivation(value: &Value, keyword: &str, context: &str) -> Result<Derivation> {
    let path = format!("{context}/{keyword}");
    let node = cast_array(Some(value))
        .into_iter()
        .next()
        .ok_or_else(|| WsdlSamplerError::parsing(format!("empty {keyword} in {context}")))?;

    let mut derivation = None;
    for (key, value) in element_entries(node) {
        match key {
            "extension" => {
                let node = first_node(value, key, &path)?;
                derivation = Some(Derivation::Extension(parse_extension(node, &path)?));
            }
            "restriction" => {
                let node = first_node(value, key, &path)?;
                let base = attr(node, "base").unwrap_or("anyType");
                derivation = Some(Derivation::Restriction {
                    base: QName::parse(base),
                });
            }
            "annotation" => {}
            other => return Err(WsdlSamplerError::unsupported(other, path)),
        }
    }

    derivation.ok_or_else(|| {
        WsdlSamplerError::parsing(format!("{keyword} without extension or restriction in {context}"))
    })
}

fn first_node<'a>(value: &'a Value, keyword: &str, context: &str) -> Result<&'a Value> {
    match value {
        Value::Array(items) => items.first(),
        other => Some(other),
    }
    .ok_or_else(|| WsdlSamplerError::parsing(format!("empty {keyword} in {context}")))
}

fn parse_extension(node: &Value, context: &str) -> Result<Extension> {
    let base = attr(node, "base").ok_or_else(|| {
        WsdlSamplerError::parsing(format!("extension without base in {context}"))
    })?;
    let path = format!("{context}/extension[{base}]");

    let mut extension = Extension {
        base: QName::parse(base),
        attributes: Vec::new(),
        particles: Vec::new(),
    };

    for (key, value) in element_entries(node) {
        match key {
            "attribute" => extension.attributes.extend(parse_attributes(value, &path)?),
            "sequence" | "all" => extension.particles.extend(parse_group(value, key, &path)?),
            "choice" => extension.particles.extend(parse_choices(value, &path)?),
            "annotation" | "anyAttribute" => {}
            other => return Err(WsdlSamplerError::unsupported(other, path)),
        }
    }

    Ok(extension)
}

fn parse_simple_type(node: &Value, context: &str) -> Result<SimpleTypeDecl> {
    let name = attr(node, "name").map(str::to_string);
    let path = match &name {
        Some(name) => format!("{context}/simpleType[{name}]"),
        None => format!("{context}/simpleType"),
    };

    let mut derivation = None;
    for (key, value) in element_entries(node) {
        match key {
            "restriction" => {
                let node = first_node(value, key, &path)?;
                derivation = Some(SimpleDerivation::Restriction(parse_restriction(node, &path)?));
            }
            "list" => {
                let node = first_node(value, key, &path)?;
                derivation = Some(SimpleDerivation::List(parse_list(node, &path)?));
            }
            "annotation" => {}
            other => return Err(WsdlSamplerError::unsupported(other, path)),
        }
    }

    let derivation = derivation.ok_or_else(|| {
        WsdlSamplerError::parsing(format!("simpleType without restriction or list in {path}"))
    })?;

    Ok(SimpleTypeDecl { name, derivation })
}

fn parse_restriction(node: &Value, context: &str) -> Result<Restriction> {
    let path = format!("{context}/restriction");
    let mut restriction = Restriction {
        base: attr(node, "base").map(QName::parse),
        ..Default::default()
    };

    for (key, value) in element_entries(node) {
        match key {
            "enumeration" => {
                restriction.enumeration.extend(
                    cast_array(Some(value))
                        .into_iter()
                        .filter_map(|e| attr(e, "value").or_else(|| tree::text(e)))
                        .map(str::to_string),
                );
            }
            "pattern" => {
                if restriction.pattern.is_none() {
                    restriction.pattern = cast_array(Some(value))
                        .into_iter()
                        .find_map(|p| attr(p, "value"))
                        .map(str::to_string);
                }
            }
            "simpleType" => {
                let node = first_node(value, key, &path)?;
                restriction.inline_base = Some(Box::new(parse_simple_type(node, &path)?));
            }
            "annotation" => {}
            facet if IGNORED_FACETS.contains(&facet) => {}
            other => return Err(WsdlSamplerError::unsupported(other, path)),
        }
    }

    Ok(restriction)
}

fn parse_list(node: &Value, context: &str) -> Result<ListDecl> {
    let path = format!("{context}/list");
    let mut list = ListDecl {
        item_type: attr(node, "itemType").map(QName::parse),
        inline_item: None,
    };

    for (key, value) in element_entries(node) {
        match key {
            "simpleType" => {
                let node = first_node(value, key, &path)?;
                list.inline_item = Some(Box::new(parse_simple_type(node, &path)?));
            }
            "annotation" => {}
            other => return Err(WsdlSamplerError::unsupported(other, path)),
        }
    }

    Ok(list)
}
