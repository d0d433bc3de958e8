//! High-level toolkit for OML documents.
//!
//! [`Oml`] is the main entry point. It resolves platform versions, loads
//! documents through a [`DocumentStore`](oml_store::DocumentStore), applies
//! batched edits and saves in the native format or as XML.
//!
//! ```no_run
//! use oml_sdk::Oml;
//!
//! # fn main() -> oml_sdk::OmlResult<()> {
//! let oml = Oml::new();
//! let mut doc = oml.open("module.oml", "OL")?;
//! oml.apply_edits(&mut doc, &["Description:Customer portal"], &[] as &[&str])?;
//! oml.save(&mut doc, "module.xml", None)?;
//! # Ok(())
//! # }
//! ```
//!
//! [`XmlConverter`] turns a whole document into one XML tree and reports
//! failures as text. [`CorpusSearch`] counts a keyword across a directory of
//! documents.

pub mod config;
pub mod convert;
pub mod document;
pub mod edit;
pub mod error;
pub mod facade;
pub mod mirror;
pub mod search;
pub mod source;

pub use config::OmlConfig;
pub use convert::XmlConverter;
pub use document::Document;
pub use edit::{split_edit_line, EditBatch, EditKind};
pub use error::{OmlError, OmlResult};
pub use facade::{Oml, PersistFormat};
pub use mirror::XmlMirror;
pub use search::{count_occurrences, format_elapsed, CorpusSearch, FileMatch, SearchResult};
pub use source::{buffer_all, open_output, ByteSource};

// Re-export key types
pub use oml_header::{FieldKind, HeaderField, HeaderSchema, HeaderSet, HeaderValue};
pub use oml_store::{DocumentStore, NativeContainerStore, NativeDocument};
pub use oml_types::{PlatformVersion, VersionNumber, VersionRegistry};
pub use oml_xml::XmlElement;
