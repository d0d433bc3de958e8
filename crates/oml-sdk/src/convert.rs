use std::path::Path;

use tracing::warn;

use crate::error::OmlResult;
use crate::facade::Oml;
use crate::mirror::XmlMirror;
use crate::source::ByteSource;

/// Single-document OML to XML conversion for batch callers.
///
/// Unlike the rest of the toolkit this never returns an error: every failure
/// comes back as the text `Error: <message>`.
#[derive(Debug, Default)]
pub struct XmlConverter {
    oml: Oml,
}

impl XmlConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_facade(oml: Oml) -> Self {
        Self { oml }
    }

    /// Convert a file on disk.
    pub fn convert_file(&self, path: impl AsRef<Path>) -> String {
        let path = path.as_ref();
        match std::fs::read(path) {
            Ok(bytes) => self.convert_bytes(&bytes),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "conversion failed");
                format!("Error: {e}")
            }
        }
    }

    /// Convert an in-memory document, loading it under the latest platform.
    pub fn convert_bytes(&self, bytes: &[u8]) -> String {
        self.try_convert(bytes).unwrap_or_else(|e| {
            warn!(error = %e, "conversion failed");
            format!("Error: {e}")
        })
    }

    fn try_convert(&self, bytes: &[u8]) -> OmlResult<String> {
        let latest = self.oml.config().latest_token.clone();
        let mut document = self.oml.load(ByteSource::from_bytes(bytes), &latest)?;
        Ok(XmlMirror::to_xml(&mut document)?.to_unformatted_string()?)
    }
}
