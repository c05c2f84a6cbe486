//! Minimal owned element tree built from `quick_xml` events.
//!
//! Listing mapping needs random access to children and attributes, so the
//! event stream is folded into a tree once per document.

use crate::error::{FeedError, Result};
use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use tracing::warn;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Direct character data of this element, excluding descendants
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Text of the first child with `name`, if that child exists
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(Element::text)
    }

    /// Value attribute of the first child with `name` (`<underOffer value="no"/>`)
    pub fn child_attr(&self, name: &str, attr: &str) -> Option<&str> {
        self.child(name).and_then(|child| child.attr(attr))
    }

    fn from_start(start: &BytesStart<'_>, decoder: Decoder) -> Result<Self> {
        let name = decoder.decode(start.name().as_ref())?.into_owned();

        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|err| FeedError::XmlParse(err.to_string()))?;
            let key = decoder.decode(attr.key.as_ref())?.into_owned();
            let value = attr.decode_and_unescape_value(decoder)?.into_owned();
            attributes.push((key, value));
        }

        Ok(Self {
            name,
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }
}

/// Parse a complete document held as text and return its root element.
///
/// Rejects anything that is not well-formed: unclosed or mismatched
/// elements, several roots, or character data outside the root.
pub fn parse_document(xml: &str, trim_text: bool) -> Result<Element> {
    build_tree(Reader::from_str(xml), trim_text)
}

/// Parse raw document bytes, decoding them in the encoding the document
/// declares (`<?xml ... encoding="ISO-8859-1"?>`), UTF-8 otherwise.
///
/// Bytes that are not valid in the detected encoding fall back to a lossy
/// UTF-8 reading when the document is not valid UTF-8 either.
pub fn parse_document_bytes(bytes: &[u8], trim_text: bool) -> Result<Element> {
    match build_tree(Reader::from_reader(bytes), trim_text) {
        Err(FeedError::Encoding(reason)) if std::str::from_utf8(bytes).is_err() => {
            warn!("Decoding feed lossily: {}", reason);
            parse_document(&String::from_utf8_lossy(bytes), trim_text)
        }
        result => result,
    }
}

fn build_tree(mut reader: Reader<&[u8]>, trim_text: bool) -> Result<Element> {
    reader.config_mut().trim_text(trim_text);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let event = reader.read_event().map_err(|err| match FeedError::from(err) {
            FeedError::XmlParse(msg) => {
                FeedError::XmlParse(format!("{} at byte {}", msg, reader.error_position()))
            }
            other => other,
        })?;
        let decoder = reader.decoder();

        match event {
            Event::Start(ref e) => {
                if stack.is_empty() && root.is_some() {
                    return Err(FeedError::XmlParse("multiple root elements".to_string()));
                }
                stack.push(Element::from_start(e, decoder)?);
            }
            Event::Empty(ref e) => {
                let element = Element::from_start(e, decoder)?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| {
                    FeedError::XmlParse("closing tag without matching opening tag".to_string())
                })?;
                attach(&mut stack, &mut root, element)?;
            }
            Event::Text(ref e) => {
                let text = e.unescape()?;
                append_text(&mut stack, &text)?;
            }
            Event::CData(ref e) => {
                let text = decoder.decode(e)?;
                append_text(&mut stack, &text)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(FeedError::XmlParse(format!(
            "unexpected end of document, <{}> is not closed",
            open.name
        )));
    }

    root.ok_or_else(|| FeedError::XmlParse("document has no root element".to_string()))
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(FeedError::XmlParse("multiple root elements".to_string())),
    }
}

fn append_text(stack: &mut [Element], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(current) => {
            current.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(FeedError::XmlParse(
            "character data outside the root element".to_string(),
        )),
    }
}
