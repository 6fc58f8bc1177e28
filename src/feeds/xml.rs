//! Minimal attribute-aware XML tree built on `quick_xml`'s event reader.
//!
//! Feeds are small, so the whole document is materialised as an [`XmlNode`]
//! tree. Attributes, child elements and character data stay distinct: an
//! element's `text` holds only its own text and CDATA, never that of its
//! children.

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

/// Errors raised for payloads that are not well-formed XML documents.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("malformed XML: {0}")]
    Syntax(#[from] quick_xml::Error),
    #[error("document ended inside <{0}>")]
    Unclosed(String),
    #[error("document has no root element")]
    NoRoot,
}

/// One XML element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlNode {
    /// Qualified name as written, e.g. `item`, `atom:link`, `content:encoded`.
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
    text: String,
}

impl XmlNode {
    fn open(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = match attr.unescape_value() {
                Ok(v) => v.into_owned(),
                Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
            };
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }

    /// Own character data with surrounding whitespace removed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Value of the named attribute, if present.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// True for an element that carries no attributes and no child elements.
    pub fn is_leaf(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty()
    }

    /// True for an element with nothing in it at all.
    pub fn is_empty(&self) -> bool {
        self.is_leaf() && self.text().is_empty()
    }
}

/// Parse a complete document and return its root element.
///
/// Entity references are resolved for the five XML built-ins and numeric
/// character references; anything else, including a bare `&`, is kept
/// literally.
pub fn parse_document(xml: &str) -> Result<XmlNode, XmlError> {
    let mut reader = Reader::from_str(xml);
    // Real feeds ship bare `&` in titles ("AT&T"); keep it as text.
    reader.config_mut().allow_dangling_amp = true;
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                stack.push(XmlNode::open(&e)?);
            }
            Event::Empty(e) => {
                let node = XmlNode::open(&e)?;
                close(&mut stack, &mut root, node);
            }
            Event::End(_) => {
                // quick-xml has already checked the end name against the open tag.
                if let Some(node) = stack.pop() {
                    close(&mut stack, &mut root, node);
                }
            }
            Event::Text(e) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&e.decode().map_err(quick_xml::Error::from)?);
                }
            }
            Event::CData(e) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&e.decode().map_err(quick_xml::Error::from)?);
                }
            }
            Event::GeneralRef(e) => {
                if let Some(top) = stack.last_mut() {
                    let name = e.decode().map_err(quick_xml::Error::from)?;
                    if let Some(ch) = e.resolve_char_ref()? {
                        top.text.push(ch);
                    } else if let Some(resolved) = resolve_predefined_entity(&name) {
                        top.text.push_str(resolved);
                    } else {
                        top.text.push('&');
                        top.text.push_str(&name);
                        top.text.push(';');
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::Unclosed(open.name));
    }
    root.ok_or(XmlError::NoRoot)
}

fn close(stack: &mut Vec<XmlNode>, root: &mut Option<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => {
            if root.is_none() {
                *root = Some(node);
            }
        }
    }
}
