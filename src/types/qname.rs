use serde::{Deserialize, Serialize};
use std::fmt;

/// Namespace URIs of the XSD built-in datatypes.
pub const XSD_NAMESPACES: &[&str] = &[
    "http://www.w3.org/2001/XMLSchema",
    "http://www.w3.org/2000/10/XMLSchema",
    "http://www.w3.org/1999/XMLSchema",
];

/// Prefixes assumed to mean the XSD namespace when no binding is known.
pub const CONVENTIONAL_XSD_PREFIXES: &[&str] = &["xs", "xsd"];

/// Built-in XSD datatype names (XSD 1.0 part 2 plus `anyType`).
pub const BUILTIN_TYPES: &[&str] = &[
    "anyType",
    "anySimpleType",
    "string",
    "normalizedString",
    "token",
    "language",
    "Name",
    "NCName",
    "ID",
    "IDREF",
    "IDREFS",
    "ENTITY",
    "ENTITIES",
    "NMTOKEN",
    "NMTOKENS",
    "boolean",
    "base64Binary",
    "hexBinary",
    "float",
    "double",
    "decimal",
    "integer",
    "nonPositiveInteger",
    "negativeInteger",
    "long",
    "int",
    "short",
    "byte",
    "nonNegativeInteger",
    "unsignedLong",
    "unsignedInt",
    "unsignedShort",
    "unsignedByte",
    "positiveInteger",
    "duration",
    "dateTime",
    "time",
    "date",
    "gYearMonth",
    "gYear",
    "gMonthDay",
    "gDay",
    "gMonth",
    "anyURI",
    "QName",
    "NOTATION",
];

/// A `prefix:localName` reference exactly as written in the schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct QName {
    raw: String,
    split: Option<usize>,
}

impl QName {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let split = raw.rfind(':');
        Self { raw, split }
    }

    /// The part after the last `:`.
    pub fn local_name(&self) -> &str {
        match self.split {
            Some(idx) => &self.raw[idx + 1..],
            None => &self.raw,
        }
    }

    pub fn prefix(&self) -> Option<&str> {
        self.split.map(|idx| &self.raw[..idx])
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether the local name is one of the XSD built-in datatypes.
    ///
    /// Only the name is checked; whether the prefix is bound to the XSD
    /// namespace is decided by [`TypeRegistry::resolve`](super::TypeRegistry::resolve).
    pub fn is_builtin(&self) -> bool {
        BUILTIN_TYPES.contains(&self.local_name())
    }
}

pub fn is_xsd_namespace(uri: &str) -> bool {
    XSD_NAMESPACES.contains(&uri)
}

/// Strip everything up to and including the last `:` of a name.
pub fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<String> for QName {
    fn from(raw: String) -> Self {
        Self::parse(raw)
    }
}

impl From<&str> for QName {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<QName> for String {
    fn from(qname: QName) -> Self {
        qname.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixed_name() {
        let qname = QName::parse("tns:OrderType");
        assert_eq!(qname.prefix(), Some("tns"));
        assert_eq!(qname.local_name(), "OrderType");
        assert_eq!(qname.to_string(), "tns:OrderType");
    }

    #[test]
    fn test_unprefixed_name() {
        let qname = QName::parse("OrderType");
        assert_eq!(qname.prefix(), None);
        assert_eq!(qname.local_name(), "OrderType");
    }

    #[test]
    fn test_last_separator_wins() {
        assert_eq!(QName::parse("a:b:c").local_name(), "c");
        assert_eq!(local_name("urn:x:y"), "y");
        assert_eq!(local_name("plain"), "plain");
    }

    #[test]
    fn test_builtin_detection() {
        assert!(QName::parse("xs:string").is_builtin());
        assert!(QName::parse("xsd:dateTime").is_builtin());
        assert!(!QName::parse("tns:Person").is_builtin());
    }
}
