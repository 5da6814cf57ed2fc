use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use super::tree::{COMMENT_KEY, TEXT_KEY};

/// One synthesized value: either a placeholder string or a nested node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SampleValue {
    Leaf(String),
    Node(SampleNode),
}

/// A synthesized element. Entries keep insertion order; attribute entries
/// are keyed `@name`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleNode {
    pub entries: IndexMap<String, SampleValue>,
    /// Human-readable note, e.g. the alternatives of a choice.
    pub annotation: Option<String>,
    /// Character content for simple-content types and top-level leaf elements.
    pub text: Option<String>,
}

impl SampleValue {
    pub fn leaf(value: impl Into<String>) -> Self {
        SampleValue::Leaf(value.into())
    }

    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            SampleValue::Leaf(value) => Some(value),
            SampleValue::Node(_) => None,
        }
    }

    pub fn as_node(&self) -> Option<&SampleNode> {
        match self {
            SampleValue::Node(node) => Some(node),
            SampleValue::Leaf(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            SampleValue::Leaf(value) => Value::String(value.clone()),
            SampleValue::Node(node) => node.to_json(),
        }
    }
}

impl From<SampleNode> for SampleValue {
    fn from(node: SampleNode) -> Self {
        SampleValue::Node(node)
    }
}

impl SampleNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: SampleValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn insert_leaf(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.insert(key, SampleValue::Leaf(value.into()));
    }

    pub fn get(&self, key: &str) -> Option<&SampleValue> {
        self.entries.get(key)
    }

    pub fn leaf(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(SampleValue::as_leaf)
    }

    pub fn node(&self, key: &str) -> Option<&SampleNode> {
        self.get(key).and_then(SampleValue::as_node)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// No entries, no text and no annotation.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.text.is_none() && self.annotation.is_none()
    }

    /// Add a note, joining it to an existing one with `"; "`.
    pub fn annotate(&mut self, note: impl Into<String>) {
        let note = note.into();
        self.annotation = Some(match self.annotation.take() {
            Some(existing) => format!("{existing}; {note}"),
            None => note,
        });
    }

    /// Merge `other` on top of `self`. Entries of `other` replace entries with
    /// the same key, keeping the original position; new keys are appended.
    pub fn overlay(&mut self, other: SampleNode) {
        for (key, value) in other.entries {
            self.entries.insert(key, value);
        }
        if let Some(note) = other.annotation {
            self.annotate(note);
        }
        if other.text.is_some() {
            self.text = other.text;
        }
    }

    /// Attribute entries (`@name`) with the prefix stripped.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &SampleValue)> {
        self.entries
            .iter()
            .filter_map(|(key, value)| key.strip_prefix('@').map(|name| (name, value)))
    }

    /// Child element entries, in order.
    pub fn children(&self) -> impl Iterator<Item = (&str, &SampleValue)> {
        self.entries
            .iter()
            .filter(|(key, _)| !key.starts_with('@'))
            .map(|(key, value)| (key.as_str(), value))
    }

    /// Labeled-tree rendering: the annotation under `#comment`, attributes as
    /// `@name`, character content under `#text`. A node with nothing but text
    /// collapses to that string.
    pub fn to_json(&self) -> Value {
        if self.entries.is_empty() && self.annotation.is_none() {
            if let Some(text) = &self.text {
                return Value::String(text.clone());
            }
        }

        let mut map = Map::new();
        if let Some(annotation) = &self.annotation {
            map.insert(COMMENT_KEY.to_string(), Value::String(annotation.clone()));
        }
        for (key, value) in &self.entries {
            map.insert(key.clone(), value.to_json());
        }
        if let Some(text) = &self.text {
            map.insert(TEXT_KEY.to_string(), Value::String(text.clone()));
        }
        Value::Object(map)
    }
}

impl Serialize for SampleNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl Serialize for SampleValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_overlay_later_keys_win_in_place() {
        let mut base = SampleNode::new();
        base.insert_leaf("id", "int");
        base.insert_leaf("name", "string");

        let mut derived = SampleNode::new();
        derived.insert_leaf("name", "token");
        derived.insert_leaf("email", "string");

        base.overlay(derived);
        let keys: Vec<_> = base.keys().collect();
        assert_eq!(keys, vec!["id", "name", "email"]);
        assert_eq!(base.leaf("name"), Some("token"));
    }

    #[test]
    fn test_annotations_are_joined() {
        let mut node = SampleNode::new();
        node.annotate("Optional nodes: a, b");
        node.annotate("Optional nodes: c, d");
        assert_eq!(
            node.annotation.as_deref(),
            Some("Optional nodes: a, b; Optional nodes: c, d")
        );
    }

    #[test]
    fn test_to_json_shape() {
        let mut address = SampleNode::new();
        address.insert_leaf("city", "string");

        let mut node = SampleNode::new();
        node.annotate("Optional nodes: email, phone");
        node.insert_leaf("@id", "int");
        node.insert("address", address.into());

        assert_eq!(
            node.to_json(),
            json!({
                "#comment": "Optional nodes: email, phone",
                "@id": "int",
                "address": {"city": "string"}
            })
        );
    }

    #[test]
    fn test_text_only_node_collapses() {
        assert_eq!(SampleNode::with_text("string").to_json(), json!("string"));

        let mut price = SampleNode::with_text("decimal");
        price.insert_leaf("@currency", "string");
        assert_eq!(
            price.to_json(),
            json!({"@currency": "string", "#text": "decimal"})
        );
    }

    #[test]
    fn test_attributes_and_children_split() {
        let mut node = SampleNode::new();
        node.insert_leaf("@lang", "language");
        node.insert_leaf("title", "string");

        let attributes: Vec<_> = node.attributes().map(|(k, _)| k).collect();
        let children: Vec<_> = node.children().map(|(k, _)| k).collect();
        assert_eq!(attributes, vec!["lang"]);
        assert_eq!(children, vec!["title"]);
    }
}
