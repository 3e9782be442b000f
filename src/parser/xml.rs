//! XML to JSON-like tree conversion
//!
//! Documents are converted into a [`serde_json::Value`] tree:
//!
//! - the result is an object with a single key, the root element name
//! - attributes become `@name` keys
//! - an element with only text becomes a string
//! - text next to attributes or children is stored under `#text`; for an
//!   element with children this is the text of the whole subtree, so inline
//!   markup such as `<title>Use <code>Vec</code></title>` keeps its words
//! - a child element that occurs once is stored as a single value, a
//!   repeated child becomes an array
//!
//! The last rule means consumers never know whether a field is a value or a
//! list; [`one_or_many`](super::normalize::one_or_many) normalizes that.

use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};

use crate::utils::error::ParseError;

/// Key holding an element's text when it also has attributes or children
pub const TEXT_KEY: &str = "#text";

/// Element under construction
struct Frame {
    name: String,
    children: Map<String, Value>,
    /// Text content of the subtree read so far
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, ParseError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut children = Map::new();

        for attr in start.attributes() {
            let attr = attr.map_err(|e| ParseError::Xml(format!("bad attribute in <{name}>: {e}")))?;
            let key = format!("@{}", String::from_utf8_lossy(attr.key.as_ref()));
            let value = match attr.unescape_value() {
                Ok(v) => v.into_owned(),
                Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
            };
            children.insert(key, Value::String(value));
        }

        Ok(Self {
            name,
            children,
            text: String::new(),
        })
    }

    /// Append a closed child's text, keeping words on either side apart
    fn push_child_text(&mut self, child: &str) {
        if child.is_empty() {
            return;
        }
        let joined = self.text.is_empty()
            || self.text.ends_with(char::is_whitespace)
            || child.starts_with(char::is_whitespace);
        if !joined {
            self.text.push(' ');
        }
        self.text.push_str(child);
    }

    /// Finish the element, returning its name, value and trimmed text
    fn into_value(mut self) -> (String, Value, String) {
        let text = self.text.trim().to_string();
        let value = if self.children.is_empty() {
            Value::String(text.clone())
        } else {
            if !text.is_empty() {
                self.children
                    .insert(TEXT_KEY.to_string(), Value::String(text.clone()));
            }
            Value::Object(self.children)
        };
        (self.name, value, text)
    }
}

fn insert_child(map: &mut Map<String, Value>, name: String, value: Value) {
    match map.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            map.insert(name, value);
        }
    }
}

fn close(
    frame: Frame,
    stack: &mut [Frame],
    root: &mut Option<(String, Value)>,
) -> Result<(), ParseError> {
    let (name, value, text) = frame.into_value();
    match stack.last_mut() {
        Some(parent) => {
            parent.push_child_text(&text);
            insert_child(&mut parent.children, name, value);
        }
        None if root.is_none() => *root = Some((name, value)),
        None => return Err(ParseError::Xml(format!("second root element <{name}>"))),
    }
    Ok(())
}

fn unescape_text(text: &BytesText<'_>) -> String {
    match text.unescape() {
        Ok(t) => t.into_owned(),
        // HTML entities such as &nbsp; are common in feeds but not valid XML
        Err(_) => html_escape::decode_html_entities(&String::from_utf8_lossy(text)).into_owned(),
    }
}

/// Parse an XML document into a value tree
///
/// # Errors
///
/// Returns [`ParseError::Xml`] for malformed markup, mismatched tags,
/// unclosed elements, or a document without a root element.
pub fn to_value(xml: &str) -> Result<Value, ParseError> {
    // Untrimmed: whitespace between text and CDATA or inline elements
    // separates words
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => stack.push(Frame::open(&e)?),
            Ok(Event::Empty(e)) => {
                let frame = Frame::open(&e)?;
                close(frame, &mut stack, &mut root)?;
            }
            Ok(Event::End(_)) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| ParseError::Xml("unexpected closing tag".to_string()))?;
                close(frame, &mut stack, &mut root)?;
            }
            Ok(Event::Text(t)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&unescape_text(&t));
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(ParseError::Xml(format!(
                    "at position {}: {e}",
                    reader.buffer_position()
                )))
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::Xml(format!("unclosed element <{}>", open.name)));
    }

    let (name, value) = root.ok_or_else(|| ParseError::Xml("document has no root element".to_string()))?;
    let mut document = Map::new();
    document.insert(name, value);
    Ok(Value::Object(document))
}
