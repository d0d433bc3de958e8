use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::element::{XmlElement, XmlNode};
use crate::error::{XmlError, XmlResult};

/// Parse a single XML element (with optional declaration, comments and
/// processing instructions around it) into an owned tree.
///
/// Whitespace-only text is dropped; all other text is unescaped. Exactly one
/// root element is accepted.
pub fn parse_element(input: &str) -> XmlResult<XmlElement> {
    let mut reader = Reader::from_str(input);
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader
            .read_event()
            .map_err(|e| malformed(position, e.to_string()))?;

        match event {
            Event::Start(start) => {
                if root.is_some() && stack.is_empty() {
                    return Err(XmlError::TrailingContent(position));
                }
                stack.push(open_element(&start, position)?);
            }
            Event::Empty(start) => {
                if root.is_some() && stack.is_empty() {
                    return Err(XmlError::TrailingContent(position));
                }
                let element = open_element(&start, position)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| malformed(position, "unmatched closing tag".into()))?;
                attach(&mut stack, &mut root, element);
            }
            Event::Text(text) => {
                let value = text
                    .unescape()
                    .map_err(|e| malformed(position, e.to_string()))?;
                if value.trim().is_empty() {
                    continue;
                }
                match stack.last_mut() {
                    Some(parent) => parent.push_text(value.into_owned()),
                    None => return Err(XmlError::TrailingContent(position)),
                }
            }
            Event::CData(data) => {
                let value = String::from_utf8(data.into_inner().into_owned())
                    .map_err(|e| malformed(position, e.to_string()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(XmlNode::CData(value)),
                    None => return Err(XmlError::TrailingContent(position)),
                }
            }
            Event::Comment(comment) => {
                // Comments outside the root carry no fragment content.
                if let Some(parent) = stack.last_mut() {
                    let value = String::from_utf8_lossy(&comment).into_owned();
                    parent.children.push(XmlNode::Comment(value));
                }
            }
            Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            Event::Eof => break,
        }
    }

    if let Some(open) = stack.last() {
        return Err(malformed(
            input.len() as u64,
            format!("unclosed element <{}>", open.name),
        ));
    }
    root.ok_or(XmlError::MissingRoot)
}

fn open_element(start: &BytesStart<'_>, position: u64) -> XmlResult<XmlElement> {
    let qname = start.name();
    let name = std::str::from_utf8(qname.as_ref())
        .map_err(|e| malformed(position, e.to_string()))?;
    let mut element = XmlElement::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| malformed(position, e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| malformed(position, e.to_string()))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| malformed(position, e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.push_element(element),
        None => *root = Some(element),
    }
}

fn malformed(position: u64, reason: String) -> XmlError {
    XmlError::Malformed { position, reason }
}
