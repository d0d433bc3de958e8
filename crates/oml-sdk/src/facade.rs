use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use oml_store::{DocumentStore, NativeContainerStore};
use oml_types::{PlatformVersion, VersionRegistry};
use tracing::{debug, info};

use crate::config::OmlConfig;
use crate::document::Document;
use crate::edit::EditBatch;
use crate::error::{OmlError, OmlResult};
use crate::mirror::XmlMirror;
use crate::search::{CorpusSearch, SearchResult};
use crate::source::{self, ByteSource, PathRole};

/// Output encoding chosen by [`Oml::persist`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PersistFormat {
    Native,
    Xml,
}

impl PersistFormat {
    /// `xml` (any case) selects XML; with no format, a destination ending in
    /// `.xml` (any case) does. Everything else is native.
    pub fn resolve(destination: &str, format: Option<&str>) -> Self {
        let xml = match format {
            Some(format) => format.eq_ignore_ascii_case("xml"),
            None => destination
                .len()
                .checked_sub(4)
                .and_then(|start| destination.get(start..))
                .map(|ext| ext.eq_ignore_ascii_case(".xml"))
                .unwrap_or(false),
        };
        if xml {
            PersistFormat::Xml
        } else {
            PersistFormat::Native
        }
    }
}

/// Entry point for loading, inspecting, editing and saving OML documents.
pub struct Oml {
    registry: VersionRegistry,
    store: Arc<dyn DocumentStore>,
    config: OmlConfig,
}

impl Oml {
    /// Built-in versions, the native container store and default config.
    pub fn new() -> Self {
        Self::with_config(OmlConfig::default())
    }

    pub fn with_config(config: OmlConfig) -> Self {
        Self {
            registry: VersionRegistry::builtin(),
            store: Arc::new(NativeContainerStore::new()),
            config,
        }
    }

    pub fn with_store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_registry(mut self, registry: VersionRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn registry(&self) -> &VersionRegistry {
        &self.registry
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    pub fn config(&self) -> &OmlConfig {
        &self.config
    }

    /// Resolve a version token: the latest token or a registry label, both
    /// matched ignoring case.
    pub fn resolve_version(&self, token: &str) -> OmlResult<&PlatformVersion> {
        if token.is_empty() {
            return Err(OmlError::InvalidArgument(
                "the platform version argument is mandatory".into(),
            ));
        }
        if token.eq_ignore_ascii_case(&self.config.latest_token) {
            return Ok(self.registry.latest());
        }
        self.registry
            .find(token)
            .ok_or_else(|| OmlError::UnsupportedVersion(token.to_string()))
    }

    /// Load a document from `source` under the platform named by `version`.
    pub fn load(&self, source: ByteSource, version: &str) -> OmlResult<Document> {
        let platform = self.resolve_version(version)?.clone();
        let mut reader = source.into_seekable(self.config.read_chunk_size)?;
        let native = self.store.load(&mut *reader, &platform)?;
        let document = Document::from_native(self.store.clone(), native, platform)?;
        info!(
            platform = %document.platform_version(),
            fragments = document.fragment_names().len(),
            "loaded document"
        );
        Ok(document)
    }

    /// Load a document from a file; the file is closed before this returns.
    pub fn open(&self, path: impl AsRef<Path>, version: &str) -> OmlResult<Document> {
        let path = path.as_ref();
        source::check_path(path, PathRole::Input)?;
        self.resolve_version(version)?;
        debug!(path = %path.display(), "opening document");
        self.load(ByteSource::from_path(path)?, version)
    }

    /// Supported platform versions as labels (`O11`) or full numbers
    /// (`11.0.0.0`), either all in registry order or just the latest.
    pub fn list_platform_versions(&self, only_latest: bool, show_full: bool) -> Vec<String> {
        let render = |v: &PlatformVersion| {
            if show_full {
                v.number().to_string()
            } else {
                v.label().to_string()
            }
        };
        if only_latest {
            vec![render(self.registry.latest())]
        } else {
            self.registry.versions().iter().map(render).collect()
        }
    }

    /// Every header as `name:value`, or the bare value of `filter`.
    pub fn dump_headers(&self, document: &Document, filter: Option<&str>) -> OmlResult<Vec<String>> {
        match filter.filter(|name| !name.is_empty()) {
            Some(name) => Ok(vec![document.get_header(name)?]),
            None => Ok(document
                .headers()
                .iter()
                .map(|(field, value)| format!("{}:{}", field.name(), value))
                .collect()),
        }
    }

    pub fn dump_fragment_names(&self, document: &Document) -> Vec<String> {
        document.fragment_names().to_vec()
    }

    /// One fragment rendered as unformatted XML text.
    pub fn dump_fragment_xml(&self, document: &mut Document, name: &str) -> OmlResult<String> {
        let render_err = |reason: String| OmlError::FragmentRender {
            name: name.to_string(),
            reason,
        };
        let xml = document
            .get_fragment_xml(name)
            .map_err(|e| render_err(e.to_string()))?;
        xml.to_unformatted_string()
            .map_err(|e| render_err(e.to_string()))
    }

    /// Apply `name:value` header lines and `name:xml` fragment lines.
    ///
    /// Every line is validated before any is applied; the first failure
    /// leaves the document untouched.
    pub fn apply_edits<H, F>(
        &self,
        document: &mut Document,
        header_edits: &[H],
        fragment_edits: &[F],
    ) -> OmlResult<()>
    where
        H: AsRef<str>,
        F: AsRef<str>,
    {
        let batch = EditBatch::prepare(document, header_edits, fragment_edits)?;
        debug!(edits = batch.len(), "applying edit batch");
        batch.apply(document);
        Ok(())
    }

    /// Write `document` to `sink` as XML or native bytes.
    ///
    /// `destination` is only consulted for its extension when `format` is
    /// absent.
    pub fn persist(
        &self,
        document: &mut Document,
        sink: &mut dyn Write,
        destination: &str,
        format: Option<&str>,
    ) -> OmlResult<PersistFormat> {
        let target = PersistFormat::resolve(destination, format);
        match target {
            PersistFormat::Xml => {
                let text = XmlMirror::to_xml_with_headers(document)?.to_unformatted_string()?;
                sink.write_all(text.as_bytes())?;
                info!(bytes = text.len(), destination, "exported XML");
            }
            PersistFormat::Native => document.save_native(sink)?,
        }
        sink.flush()?;
        Ok(target)
    }

    /// Persist to a file, replacing any existing content.
    ///
    /// The output is rendered in memory before the file is opened, so a
    /// render failure leaves the destination untouched.
    pub fn save(
        &self,
        document: &mut Document,
        path: impl AsRef<Path>,
        format: Option<&str>,
    ) -> OmlResult<PersistFormat> {
        let path = path.as_ref();
        source::check_path(path, PathRole::Output)?;
        let mut rendered = Vec::new();
        let target = self.persist(document, &mut rendered, &path.to_string_lossy(), format)?;
        let mut file = source::open_output(path)?;
        file.write_all(&rendered)?;
        file.flush()?;
        Ok(target)
    }

    pub fn show_headers(
        &self,
        path: impl AsRef<Path>,
        version: &str,
        filter: Option<&str>,
    ) -> OmlResult<Vec<String>> {
        let document = self.open(path, version)?;
        self.dump_headers(&document, filter)
    }

    /// Fragment names, or the XML of `name` when given.
    pub fn show_fragments(
        &self,
        path: impl AsRef<Path>,
        version: &str,
        name: Option<&str>,
    ) -> OmlResult<Vec<String>> {
        let mut document = self.open(path, version)?;
        match name.filter(|name| !name.is_empty()) {
            Some(name) => Ok(vec![self.dump_fragment_xml(&mut document, name)?]),
            None => Ok(self.dump_fragment_names(&document)),
        }
    }

    /// Load `input`, apply edits and save to `output`.
    pub fn manipulate<H, F>(
        &self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        version: &str,
        format: Option<&str>,
        header_edits: &[H],
        fragment_edits: &[F],
    ) -> OmlResult<PersistFormat>
    where
        H: AsRef<str>,
        F: AsRef<str>,
    {
        let mut document = self.open(input, version)?;
        self.apply_edits(&mut document, header_edits, fragment_edits)?;
        self.save(&mut document, output, format)
    }

    /// Count `keyword` across the native documents in `dir`.
    pub fn search(
        &self,
        dir: impl AsRef<Path>,
        keyword: &str,
        version: &str,
    ) -> OmlResult<SearchResult> {
        CorpusSearch::new(self).scan(dir, keyword, version)
    }
}

impl Default for Oml {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Oml {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Oml")
            .field("registry", &self.registry)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
