//! Helpers over the labeled-tree shape produced by the XML parser.
//!
//! Attributes live next to child elements as `@name` keys, character data
//! under `#text`, and a child that occurs once is a bare object while a
//! repeated one is an array. Everything that reads this shape goes through
//! [`cast_array`] so the single-vs-many ambiguity never leaks further.

use serde_json::Value;

pub const TEXT_KEY: &str = "#text";
pub const COMMENT_KEY: &str = "#comment";
pub const ATTRIBUTE_PREFIX: char = '@';

/// Normalize "absent, one, or many" into an ordered list, dropping empty
/// placeholders (`null`, `""`).
pub fn cast_array(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().filter(|item| is_present(item)).collect(),
        Some(other) if is_present(other) => vec![other],
        Some(_) => Vec::new(),
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        Value::Bool(b) => *b,
        _ => true,
    }
}

/// Value of the `@name` attribute of a node, if the node is an object.
pub fn attr<'a>(node: &'a Value, name: &str) -> Option<&'a str> {
    node.as_object()?
        .get(&format!("{ATTRIBUTE_PREFIX}{name}"))?
        .as_str()
}

/// Walk a chain of child names, taking the first item whenever a step is an array.
pub fn get_path<'a>(node: &'a Value, path: &[&str]) -> Option<&'a Value> {
    let mut current = node;
    for segment in path {
        let next = match current {
            Value::Array(items) => items.first()?.get(*segment)?,
            other => other.get(*segment)?,
        };
        current = next;
    }
    Some(current)
}

/// Character data of a node: the string itself or its `#text` entry.
pub fn text(node: &Value) -> Option<&str> {
    match node {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => map.get(TEXT_KEY)?.as_str(),
        _ => None,
    }
}

pub fn is_attribute_key(key: &str) -> bool {
    key.starts_with(ATTRIBUTE_PREFIX)
}

pub fn is_reserved_key(key: &str) -> bool {
    key == TEXT_KEY || key == COMMENT_KEY
}

/// Namespace declarations on `node` as `(prefix, uri)`; the default
/// namespace has the empty prefix.
pub fn namespace_bindings(node: &Value) -> Vec<(&str, &str)> {
    let Some(map) = node.as_object() else {
        return Vec::new();
    };

    map.iter()
        .filter_map(|(key, value)| {
            let prefix = match key.strip_prefix("@xmlns")? {
                "" => "",
                rest => rest.strip_prefix(':')?,
            };
            Some((prefix, value.as_str()?))
        })
        .collect()
}

/// The child-element entries of a node, skipping attributes and text.
pub fn element_entries(node: &Value) -> Vec<(&str, &Value)> {
    match node {
        Value::Object(map) => map
            .iter()
            .filter(|(key, _)| !is_attribute_key(key) && !is_reserved_key(key))
            .map(|(key, value)| (key.as_str(), value))
            .collect(),
        _ => Vec::new(),
    }
}
