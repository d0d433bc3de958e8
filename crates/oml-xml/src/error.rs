use thiserror::Error;

/// Errors from XML parsing and serialization.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum XmlError {
    /// The input is not well-formed XML.
    #[error("malformed XML at byte {position}: {reason}")]
    Malformed { position: u64, reason: String },

    /// The input contains no root element.
    #[error("XML document has no root element")]
    MissingRoot,

    /// More than one top-level element, or text outside the root.
    #[error("unexpected content after the root element at byte {0}")]
    TrailingContent(u64),

    /// Writing the tree failed.
    #[error("failed to write XML: {0}")]
    Write(String),
}

/// Result alias for XML operations.
pub type XmlResult<T> = Result<T, XmlError>;
