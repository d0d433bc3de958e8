use std::io::Write;
use std::sync::Arc;

use oml_header::{HeaderSchema, HeaderSet};
use oml_store::{DocumentStore, FragmentStore, NativeDocument};
use oml_types::PlatformVersion;
use oml_xml::XmlElement;
use tracing::info;

use crate::error::OmlResult;

/// One loaded OML document: typed headers plus named fragments.
///
/// The platform version is fixed when the document is created. Changes live
/// in memory until [`save_native`](Self::save_native) or an XML export runs.
#[derive(Debug)]
pub struct Document {
    platform_version: PlatformVersion,
    headers: HeaderSet,
    fragments: FragmentStore,
}

impl Document {
    /// An empty document for `version`, saved through `store`.
    pub fn new(store: Arc<dyn DocumentStore>, version: PlatformVersion) -> Self {
        let native = NativeDocument::new(&version);
        Self {
            headers: HeaderSet::new(HeaderSchema::for_version(&version)),
            fragments: FragmentStore::new(store, native),
            platform_version: version,
        }
    }

    pub(crate) fn from_native(
        store: Arc<dyn DocumentStore>,
        native: NativeDocument,
        version: PlatformVersion,
    ) -> OmlResult<Self> {
        let headers = HeaderSet::from_raw(
            HeaderSchema::for_version(&version),
            native
                .headers()
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        )?;
        Ok(Self {
            headers,
            fragments: FragmentStore::new(store, native),
            platform_version: version,
        })
    }

    pub fn platform_version(&self) -> &PlatformVersion {
        &self.platform_version
    }

    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderSet {
        &mut self.headers
    }

    pub fn get_header(&self, name: &str) -> OmlResult<String> {
        Ok(self.headers.get(name)?)
    }

    pub fn set_header(&mut self, name: &str, raw: &str) -> OmlResult<()> {
        Ok(self.headers.set(name, raw)?)
    }

    pub fn fragment_names(&self) -> &[String] {
        self.fragments.names()
    }

    pub fn get_fragment_xml(&mut self, name: &str) -> OmlResult<&XmlElement> {
        Ok(self.fragments.get_xml(name)?)
    }

    pub fn set_fragment_xml(&mut self, name: &str, xml: XmlElement) {
        self.fragments.set_xml(name, xml);
    }

    pub fn fragments(&self) -> &FragmentStore {
        &self.fragments
    }

    /// Write the document in the store's native format.
    ///
    /// Pending fragment edits and the current header values are folded into
    /// the native handle first, stamped with this document's platform version.
    pub fn save_native(&mut self, sink: &mut dyn Write) -> OmlResult<()> {
        let raw = self.headers.to_raw();
        let native = self.fragments.native_mut();
        native.set_platform(&self.platform_version);
        for (name, value) in raw {
            native.set_header(&name, value);
        }
        self.fragments.save(sink)?;
        info!(
            platform = %self.platform_version,
            fragments = self.fragments.len(),
            "saved native document"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OmlError;
    use oml_store::NativeContainerStore;
    use oml_types::VersionRegistry;

    fn store() -> Arc<dyn DocumentStore> {
        Arc::new(NativeContainerStore::new())
    }

    fn latest() -> PlatformVersion {
        VersionRegistry::builtin().latest().clone()
    }

    #[test]
    fn new_document_has_every_header() {
        let doc = Document::new(store(), latest());
        assert_eq!(doc.headers().iter().count(), HeaderSchema::builtin().len());
        assert!(doc.fragment_names().is_empty());
    }

    #[test]
    fn older_platform_uses_smaller_schema() {
        let o9 = VersionRegistry::builtin().find("O9.0").unwrap().clone();
        let doc = Document::new(store(), o9);
        assert!(matches!(
            doc.get_header("IsSystemModule").unwrap_err(),
            OmlError::HeaderNotFound(_)
        ));
    }

    #[test]
    fn native_roundtrip_keeps_headers_and_fragments() {
        let codec = Arc::new(NativeContainerStore::new());
        let mut doc = Document::new(codec.clone(), latest());
        doc.set_header("Name", "Portal").unwrap();
        doc.set_header("Revision", "4").unwrap();
        doc.set_fragment_xml("Main", "<Screen Name=\"Home\"/>".parse().unwrap());

        let mut bytes = Vec::new();
        doc.save_native(&mut bytes).unwrap();

        let native = codec.decode(&bytes, &latest()).unwrap();
        let mut loaded = Document::from_native(codec, native, latest()).unwrap();
        assert_eq!(loaded.get_header("name").unwrap(), "Portal");
        assert_eq!(loaded.get_header("Revision").unwrap(), "4");
        assert_eq!(loaded.fragment_names(), &["Main"]);
        assert_eq!(
            loaded.get_fragment_xml("Main").unwrap().attribute("Name"),
            Some("Home")
        );
    }

    #[test]
    fn save_stamps_platform() {
        let codec = Arc::new(NativeContainerStore::new());
        let o10 = VersionRegistry::builtin().find("o10").unwrap().clone();
        let mut doc = Document::new(codec.clone(), o10.clone());
        let mut bytes = Vec::new();
        doc.save_native(&mut bytes).unwrap();
        let native = codec.decode(&bytes, &latest()).unwrap();
        assert_eq!(native.platform(), o10.number());
        assert_eq!(native.platform_label(), "O10");
    }
}
