//! Sample node to XML text.

use indexmap::IndexMap;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::converter::SampleSet;
use crate::core::{RenderOptions, SoapVersion};
use crate::error::{Result, WsdlSamplerError};
use crate::types::{SampleNode, SampleValue};

#[derive(Debug, Clone, Default)]
pub struct XmlRenderer {
    options: RenderOptions,
}

impl XmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render one sample as a document whose root element is `name`.
    pub fn render(&self, name: &str, node: &SampleNode) -> Result<String> {
        let mut writer = if self.options.indent > 0 {
            Writer::new_with_indent(Vec::new(), b' ', self.options.indent)
        } else {
            Writer::new(Vec::new())
        };

        if self.options.xml_declaration {
            writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        }

        match self.options.soap_envelope {
            Some(version) => write_envelope(&mut writer, version, name, node)?,
            None => write_node(&mut writer, name, node)?,
        }

        String::from_utf8(writer.into_inner()).map_err(|err| WsdlSamplerError::Render {
            message: err.to_string(),
        })
    }

    /// Render every sample of a set, keyed by element name.
    pub fn render_all(&self, samples: &SampleSet) -> Result<IndexMap<String, String>> {
        samples
            .samples
            .iter()
            .map(|(name, node)| Ok((name.clone(), self.render(name, node)?)))
            .collect()
    }
}

fn write_envelope(
    writer: &mut Writer<Vec<u8>>,
    version: SoapVersion,
    name: &str,
    node: &SampleNode,
) -> Result<()> {
    let prefix = version.prefix();
    let envelope = format!("{prefix}:Envelope");
    let header = format!("{prefix}:Header");
    let body = format!("{prefix}:Body");

    let mut start = BytesStart::new(envelope.as_str());
    start.push_attribute((format!("xmlns:{prefix}").as_str(), version.envelope_namespace()));

    writer.write_event(Event::Start(start))?;
    writer.write_event(Event::Empty(BytesStart::new(header.as_str())))?;
    writer.write_event(Event::Start(BytesStart::new(body.as_str())))?;
    write_node(writer, name, node)?;
    writer.write_event(Event::End(BytesEnd::new(body.as_str())))?;
    writer.write_event(Event::End(BytesEnd::new(envelope.as_str())))?;
    Ok(())
}

fn write_node(writer: &mut Writer<Vec<u8>>, name: &str, node: &SampleNode) -> Result<()> {
    let mut start = BytesStart::new(name);
    for (attribute, value) in node.attributes() {
        start.push_attribute((attribute, attribute_text(value)));
    }

    let has_content =
        node.annotation.is_some() || node.text.is_some() || node.children().next().is_some();
    if !has_content {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    if let Some(annotation) = &node.annotation {
        let comment = format!(" {} ", comment_safe(annotation));
        writer.write_event(Event::Comment(BytesText::from_escaped(comment)))?;
    }
    if let Some(text) = &node.text {
        writer.write_event(Event::Text(BytesText::new(text)))?;
    }
    for (child, value) in node.children() {
        match value {
            SampleValue::Node(nested) => write_node(writer, child, nested)?,
            SampleValue::Leaf(text) if text.is_empty() => {
                writer.write_event(Event::Empty(BytesStart::new(child)))?;
            }
            SampleValue::Leaf(text) => {
                writer.write_event(Event::Start(BytesStart::new(child)))?;
                writer.write_event(Event::Text(BytesText::new(text)))?;
                writer.write_event(Event::End(BytesEnd::new(child)))?;
            }
        }
    }
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// XML comments may not contain `--`; split every run of hyphens with spaces.
fn comment_safe(text: &str) -> String {
    let mut safe = String::with_capacity(text.len());
    let mut previous = None;
    for c in text.chars() {
        if c == '-' && previous == Some('-') {
            safe.push(' ');
        }
        safe.push(c);
        previous = Some(c);
    }
    safe
}

/// Attributes are flat; a complex attribute type contributes its text only.
fn attribute_text(value: &SampleValue) -> &str {
    match value {
        SampleValue::Leaf(text) => text,
        SampleValue::Node(node) => node.text.as_deref().unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() -> XmlRenderer {
        XmlRenderer::with_options(RenderOptions {
            xml_declaration: false,
            ..Default::default()
        })
    }

    #[test]
    fn test_render_nested_sample() {
        let mut node = SampleNode::new();
        node.insert_leaf("name", "string");
        node.insert_leaf("age", "int");

        let xml = plain().render("Person", &node).unwrap();
        assert_eq!(
            xml,
            "<Person>\n  <name>string</name>\n  <age>int</age>\n</Person>"
        );
    }

    #[test]
    fn test_render_attributes_comment_and_text() {
        let mut node = SampleNode::with_text("decimal");
        node.insert_leaf("@currency", "enum:EUR/USD");
        node.annotate("Optional nodes: a, b");

        let xml = XmlRenderer::new().render("Price", &node).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<Price currency=\"enum:EUR/USD\">"));
        assert!(xml.contains("<!-- Optional nodes: a, b -->"));
        assert!(xml.contains("decimal"));
        assert!(xml.trim_end().ends_with("</Price>"));
    }

    #[test]
    fn test_hyphen_runs_in_comment_are_split() {
        let mut node = SampleNode::new();
        node.insert_leaf("a---b", "string");
        node.annotate("Optional nodes: a---b, c-");

        let xml = plain().render("Holder", &node).unwrap();
        let start = xml.find("<!--").unwrap() + 4;
        let end = xml.find("-->").unwrap();
        let body = &xml[start..end];

        assert!(!body.contains("--"));
        assert!(!body.ends_with('-'));
        assert!(body.contains("a- - -b"));
        assert_eq!(comment_safe("a--b"), "a- -b");
    }

    #[test]
    fn test_blank_leaf_is_empty_element() {
        let mut node = SampleNode::new();
        node.insert_leaf("note", "");
        let xml = plain().render("Memo", &node).unwrap();
        assert!(xml.contains("<note/>"));
    }

    #[test]
    fn test_soap_envelope() {
        let mut node = SampleNode::new();
        node.insert_leaf("id", "int");

        let renderer = XmlRenderer::with_options(RenderOptions {
            soap_envelope: Some(SoapVersion::Soap11),
            ..Default::default()
        });
        let xml = renderer.render("GetOrder", &node).unwrap();

        assert!(xml.contains(
            "<soap:Envelope xmlns:soap=\"http://schemas.xmlsoap.org/soap/envelope/\">"
        ));
        assert!(xml.contains("<soap:Header/>"));
        assert!(xml.contains("<GetOrder>"));
        assert!(xml.trim_end().ends_with("</soap:Envelope>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let node = SampleNode::with_text("a<b");
        let xml = plain().render("Pattern", &node).unwrap();
        assert_eq!(xml, "<Pattern>a&lt;b</Pattern>");
    }
}
