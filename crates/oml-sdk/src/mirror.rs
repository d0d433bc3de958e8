use oml_xml::XmlElement;

use crate::document::Document;
use crate::error::OmlResult;

pub const ROOT_ELEMENT: &str = "OML";
pub const HEADER_ELEMENT: &str = "Header";
pub const FRAGMENT_NAME_ATTRIBUTE: &str = "FragmentName";

/// Renders a whole document as one XML tree.
///
/// The root is `<OML>`; each fragment contributes its own root element,
/// tagged with a `FragmentName` attribute, in fragment-name order.
pub struct XmlMirror;

impl XmlMirror {
    /// Fragments only.
    pub fn to_xml(document: &mut Document) -> OmlResult<XmlElement> {
        let mut root = XmlElement::new(ROOT_ELEMENT);
        Self::push_fragments(document, &mut root)?;
        Ok(root)
    }

    /// A leading `<Header>` with one element per header field, then fragments.
    pub fn to_xml_with_headers(document: &mut Document) -> OmlResult<XmlElement> {
        let mut header = XmlElement::new(HEADER_ELEMENT);
        for (field, value) in document.headers().iter() {
            let mut element = XmlElement::new(field.name());
            let text = value.to_string();
            if !text.is_empty() {
                element.push_text(text);
            }
            header.push_element(element);
        }

        let mut root = XmlElement::new(ROOT_ELEMENT).with_child(header);
        Self::push_fragments(document, &mut root)?;
        Ok(root)
    }

    fn push_fragments(document: &mut Document, root: &mut XmlElement) -> OmlResult<()> {
        let names = document.fragment_names().to_vec();
        for name in names {
            let mut element = document.get_fragment_xml(&name)?.clone();
            element.set_attribute(FRAGMENT_NAME_ATTRIBUTE, name);
            root.push_element(element);
        }
        Ok(())
    }
}
