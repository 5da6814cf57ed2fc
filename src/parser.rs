//! XML text to labeled tree.
//!
//! The tree is a `serde_json::Value` with the element's local name as the
//! single root key. Within an element, attributes become `@name` entries,
//! character data goes under `#text`, and a child tag that repeats becomes an
//! array while a child that occurs once stays an object. Elements with only
//! text collapse to a plain string.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Value};

use crate::error::{Result, WsdlSamplerError};
use crate::types::local_name;
use crate::types::tree::TEXT_KEY;

struct Frame {
    name: String,
    attributes: Vec<(String, String)>,
    children: Map<String, Value>,
    text: String,
}

/// Parse an XML document into the labeled tree shape.
pub fn parse_xml(xml: &str) -> Result<Value> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => stack.push(open_frame(&start)?),
            Event::Empty(start) => {
                let frame = open_frame(&start)?;
                close_frame(frame, &mut stack, &mut root);
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| WsdlSamplerError::parsing("unbalanced end tag"))?;
                close_frame(frame, &mut stack, &mut root);
            }
            Event::Text(text) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text.unescape()?);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(WsdlSamplerError::parsing(format!(
            "unexpected end of document inside <{}>",
            stack.last().map(|f| f.name.as_str()).unwrap_or_default()
        )));
    }

    let (name, value) =
        root.ok_or_else(|| WsdlSamplerError::parsing("no root element found"))?;
    let mut document = Map::new();
    document.insert(name, value);
    Ok(Value::Object(document))
}

fn open_frame(start: &BytesStart<'_>) -> Result<Frame> {
    let raw_name = String::from_utf8_lossy(start.name().as_ref()).to_string();
    let mut attributes = Vec::new();

    for attribute in start.attributes() {
        let attribute = attribute.map_err(|err| {
            WsdlSamplerError::parsing(format!("invalid attribute on <{raw_name}>: {err}"))
        })?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).to_string();
        let value = attribute.unescape_value()?.to_string();
        attributes.push((attribute_key(&key), value));
    }

    Ok(Frame {
        name: local_name(&raw_name).to_string(),
        attributes,
        children: Map::new(),
        text: String::new(),
    })
}

/// `xmlns` declarations keep their full name; other attributes lose their prefix.
fn attribute_key(raw: &str) -> String {
    if raw == "xmlns" || raw.starts_with("xmlns:") {
        format!("@{raw}")
    } else {
        format!("@{}", local_name(raw))
    }
}

fn close_frame(frame: Frame, stack: &mut [Frame], root: &mut Option<(String, Value)>) {
    let name = frame.name.clone();
    let value = frame_to_value(frame);
    match stack.last_mut() {
        Some(parent) => add_child(&mut parent.children, name, value),
        None => {
            if root.is_none() {
                *root = Some((name, value));
            }
        }
    }
}

fn add_child(children: &mut Map<String, Value>, name: String, value: Value) {
    match children.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            children.insert(name, value);
        }
    }
}

fn frame_to_value(frame: Frame) -> Value {
    if frame.attributes.is_empty() && frame.children.is_empty() {
        return Value::String(frame.text);
    }

    let mut object = Map::new();
    for (key, value) in frame.attributes {
        object.insert(key, Value::String(value));
    }
    for (key, value) in frame.children {
        object.insert(key, value);
    }
    if !frame.text.is_empty() {
        object.insert(TEXT_KEY.to_string(), Value::String(frame.text));
    }
    Value::Object(object)
}
