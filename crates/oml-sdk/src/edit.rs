use oml_header::PreparedHeader;
use oml_xml::{parse_element, XmlElement};

use crate::document::Document;
use crate::error::{OmlError, OmlResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditKind {
    Header,
    Fragment,
}

impl EditKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EditKind::Header => "header",
            EditKind::Fragment => "fragment",
        }
    }
}

/// Split a `name:value` edit line at its first colon.
pub fn split_edit_line(line: &str, kind: EditKind) -> OmlResult<(&str, &str)> {
    let Some((name, value)) = line.split_once(':') else {
        return Err(OmlError::MalformedEdit(format!(
            "unable to parse {kind} value \"{line}\"; name and value must be separated by colon (':')",
            kind = kind.as_str(),
        )));
    };
    if name.is_empty() {
        return Err(OmlError::MalformedEdit(format!(
            "the {kind} name in the {kind} parameter is mandatory",
            kind = kind.as_str(),
        )));
    }
    Ok((name, value))
}

/// A fully validated set of edits.
///
/// Building a batch runs every check; applying it cannot fail, so a batch is
/// either applied whole or not at all.
#[derive(Debug)]
pub struct EditBatch {
    headers: Vec<PreparedHeader>,
    fragments: Vec<(String, XmlElement)>,
}

impl EditBatch {
    /// Validate header lines in order, then fragment lines in order.
    pub fn prepare<H, F>(
        document: &Document,
        header_edits: &[H],
        fragment_edits: &[F],
    ) -> OmlResult<Self>
    where
        H: AsRef<str>,
        F: AsRef<str>,
    {
        let mut headers = Vec::with_capacity(header_edits.len());
        for line in header_edits {
            let (name, value) = split_edit_line(line.as_ref(), EditKind::Header)?;
            headers.push(document.headers().prepare(name, value)?);
        }

        let mut fragments = Vec::with_capacity(fragment_edits.len());
        for line in fragment_edits {
            let (name, body) = split_edit_line(line.as_ref(), EditKind::Fragment)?;
            fragments.push((name.to_string(), parse_element(body)?));
        }

        Ok(Self { headers, fragments })
    }

    pub fn len(&self) -> usize {
        self.headers.len() + self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn apply(self, document: &mut Document) {
        for prepared in self.headers {
            document.headers_mut().commit(prepared);
        }
        for (name, xml) in self.fragments {
            document.set_fragment_xml(&name, xml);
        }
    }
}
