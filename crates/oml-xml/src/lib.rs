//! Owned XML trees for OML fragments.
//!
//! Fragments are small, independently addressable XML documents. This crate
//! gives them an owned, mutable representation ([`XmlElement`]) that can be
//! parsed from text and written back without any formatting.
//!
//! Parsing drops whitespace-only text between elements, so a parsed tree
//! serializes to its unformatted form directly.

pub mod element;
pub mod error;
pub mod reader;
pub mod writer;

pub use element::{XmlElement, XmlNode};
pub use error::{XmlError, XmlResult};
pub use reader::parse_element;
pub use writer::to_unformatted_string;
