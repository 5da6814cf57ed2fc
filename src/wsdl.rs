//! WSDL `definitions` model: service endpoint, bindings and embedded schemas.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, WsdlSamplerError};
use crate::parser::parse_xml;
use crate::types::SchemaDocument;
use crate::types::tree::{attr, cast_array, get_path, namespace_bindings};

/// Namespaces that belong to the WSDL/SOAP/XSD machinery rather than the service.
const INFRASTRUCTURE_NAMESPACES: &[&str] = &[
    "http://xml.apache.org/xml-soap",
    "http://schemas.xmlsoap.org/wsdl/",
    "http://schemas.xmlsoap.org/wsdl/soap/",
    "http://schemas.xmlsoap.org/wsdl/soap12/",
    "http://schemas.xmlsoap.org/soap/encoding/",
    "http://www.w3.org/2001/XMLSchema",
];

const INFRASTRUCTURE_PREFIXES: &[&str] = &[
    "http://schemas.xmlsoap.org/",
    "http://www.w3.org/",
    "http://xml.apache.org/",
];

pub const DEFAULT_VERB: &str = "POST";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WsdlDefinitions {
    pub name: Option<String>,
    pub target_namespace: Option<String>,
    pub service_name: Option<String>,
    /// SOAP address of the first service port
    pub address: Option<String>,
    /// Service-specific namespace declarations, prefix → URI
    pub namespaces: IndexMap<String, String>,
    pub schemas: Vec<SchemaDocument>,
    pub bindings: Vec<Binding>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Binding {
    pub name: String,
    pub verb: String,
    pub operations: Vec<BindingOperation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BindingOperation {
    pub name: String,
    pub soap_action: Option<String>,
}

impl WsdlDefinitions {
    /// Parse WSDL or bare XSD text. `location` is where the text came from.
    pub fn parse(xml: &str, location: Option<&str>) -> Result<Self> {
        let tree = parse_xml(xml)?;
        Self::from_tree(&tree, location)
    }

    /// Build from a parsed tree whose root is `definitions` or `schema`.
    pub fn from_tree(tree: &Value, location: Option<&str>) -> Result<Self> {
        if tree.get("schema").is_some() {
            return Ok(Self {
                schemas: schema_documents(tree, location)?,
                ..Default::default()
            });
        }

        let definitions = tree.get("definitions").ok_or_else(|| {
            WsdlSamplerError::parsing("document root is neither `definitions` nor `schema`")
        })?;

        let service = get_path(definitions, &["service"]);
        let address = cast_array(definitions.get("service"))
            .into_iter()
            .flat_map(|service| cast_array(service.get("port")))
            .find_map(|port| get_path(port, &["address"]).and_then(|a| attr(a, "location")))
            .map(str::to_string);

        let bindings = cast_array(definitions.get("binding"))
            .into_iter()
            .map(parse_binding)
            .collect::<Result<Vec<_>>>()?;

        let definitions = Self {
            name: attr(definitions, "name").map(str::to_string),
            target_namespace: attr(definitions, "targetNamespace").map(str::to_string),
            service_name: service.and_then(|s| attr(s, "name")).map(str::to_string),
            address,
            namespaces: service_namespaces(definitions),
            schemas: schema_documents(tree, location)?,
            bindings,
        };

        tracing::info!(
            "Parsed WSDL {}: {} schemas, {} bindings, {} operations",
            definitions.service_name.as_deref().unwrap_or("<unnamed>"),
            definitions.schemas.len(),
            definitions.bindings.len(),
            definitions.operation_count()
        );
        Ok(definitions)
    }

    /// Prefix bound to `uri`; `xml` and `xmlns` are always known.
    pub fn prefix_for(&self, uri: &str) -> Option<&str> {
        match uri {
            "http://www.w3.org/XML/1998/namespace" => Some("xml"),
            "http://www.w3.org/2000/xmlns/" => Some("xmlns"),
            _ => self
                .namespaces
                .iter()
                .find(|(_, bound)| bound.as_str() == uri)
                .map(|(prefix, _)| prefix.as_str()),
        }
    }

    pub fn operation_count(&self) -> usize {
        self.bindings.iter().map(|b| b.operations.len()).sum()
    }
}

fn parse_binding(binding: &Value) -> Result<Binding> {
    let name = attr(binding, "name")
        .ok_or_else(|| WsdlSamplerError::parsing("binding without a name"))?
        .to_string();

    // `soap:binding` / `http:binding` child, prefix already stripped
    let verb = get_path(binding, &["binding"])
        .and_then(|b| attr(b, "verb"))
        .unwrap_or(DEFAULT_VERB)
        .to_string();

    let operations = cast_array(binding.get("operation"))
        .into_iter()
        .filter_map(|operation| {
            let name = attr(operation, "name")?.to_string();
            let soap_action = get_path(operation, &["operation"])
                .and_then(|o| attr(o, "soapAction"))
                .map(str::to_string);
            Some(BindingOperation { name, soap_action })
        })
        .collect();

    Ok(Binding {
        name,
        verb,
        operations,
    })
}

fn service_namespaces(definitions: &Value) -> IndexMap<String, String> {
    namespace_bindings(definitions)
        .into_iter()
        .filter(|(prefix, uri)| {
            let infrastructure = INFRASTRUCTURE_NAMESPACES.contains(uri)
                || INFRASTRUCTURE_PREFIXES.iter().any(|p| uri.starts_with(p));
            !prefix.is_empty() && !infrastructure
        })
        .map(|(prefix, uri)| (prefix.to_string(), uri.to_string()))
        .collect()
}

/// Every schema document of a tree: the root `schema` of an XSD, or each
/// `definitions/types/schema` of a WSDL. Embedded schemas inherit the
/// namespace bindings of `types` and `definitions`.
pub fn schema_documents(tree: &Value, location: Option<&str>) -> Result<Vec<SchemaDocument>> {
    let (nodes, scopes) = match tree.get("schema") {
        Some(schema) => (vec![schema], Vec::new()),
        None => {
            let definitions = tree.get("definitions");
            let types = definitions.and_then(|d| get_path(d, &["types"]));
            (
                cast_array(types.and_then(|t| get_path(t, &["schema"]))),
                [types, definitions].into_iter().flatten().collect(),
            )
        }
    };

    nodes
        .into_iter()
        .map(|node| {
            let document = scopes
                .iter()
                .fold(SchemaDocument::from_tree(node)?, |document, scope| {
                    document.inherit_namespaces(scope)
                });
            Ok(match location {
                Some(location) => document.with_location(location),
                None => document,
            })
        })
        .collect()
}
