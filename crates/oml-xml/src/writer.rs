use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::element::{XmlElement, XmlNode};
use crate::error::{XmlError, XmlResult};

/// Serialize an element with no indentation or inserted whitespace.
///
/// Elements without children are written self-closing (`<a/>`).
pub fn to_unformatted_string(element: &XmlElement) -> XmlResult<String> {
    let mut writer = Writer::new(Vec::new());
    write_element(&mut writer, element)?;
    String::from_utf8(writer.into_inner()).map_err(|e| XmlError::Write(e.to_string()))
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> XmlResult<()> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    for child in &element.children {
        match child {
            XmlNode::Element(e) => write_element(writer, e)?,
            XmlNode::Text(text) => emit(writer, Event::Text(BytesText::new(text)))?,
            XmlNode::CData(data) => emit(writer, Event::CData(BytesCData::new(data.as_str())))?,
            XmlNode::Comment(comment) => emit(
                writer,
                Event::Comment(BytesText::from_escaped(comment.as_str())),
            )?,
        }
    }
    emit(writer, Event::End(BytesEnd::new(element.name.as_str())))
}

fn emit(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> XmlResult<()> {
    writer
        .write_event(event)
        .map_err(|e| XmlError::Write(e.to_string()))
}
