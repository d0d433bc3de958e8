use std::io::{Read, Seek, Write};

use oml_types::PlatformVersion;
use oml_xml::XmlElement;

use crate::document::NativeDocument;
use crate::error::StoreResult;

/// A readable source that supports random access.
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek + ?Sized> ReadSeek for T {}

/// Capability that encodes and decodes a container format.
///
/// Implementations must satisfy these invariants:
/// - `load` only ever sees seekable input; callers buffer streams first.
/// - Fragment names are compared exactly (case-sensitive).
/// - `read_fragment` returns `Ok(None)` for an unknown name and `Err` only
///   when a known fragment cannot be decoded.
/// - `write_fragment` inserts or replaces, keeping an existing fragment's
///   position.
/// - The core never interprets a fragment payload; only the store does.
pub trait DocumentStore: Send + Sync {
    /// Decode a container under the given platform version.
    fn load(&self, reader: &mut dyn ReadSeek, version: &PlatformVersion)
        -> StoreResult<NativeDocument>;

    /// Fragment names in container order.
    fn fragment_names(&self, document: &NativeDocument) -> Vec<String> {
        document
            .fragments()
            .iter()
            .map(|f| f.name.clone())
            .collect()
    }

    /// Decode one fragment's payload into XML.
    fn read_fragment(&self, document: &NativeDocument, name: &str)
        -> StoreResult<Option<XmlElement>>;

    /// Encode XML into a fragment payload on the handle.
    fn write_fragment(
        &self,
        document: &mut NativeDocument,
        name: &str,
        xml: &XmlElement,
    ) -> StoreResult<()>;

    /// Write the whole container to `sink`.
    fn save(&self, document: &NativeDocument, sink: &mut dyn Write) -> StoreResult<()>;
}
