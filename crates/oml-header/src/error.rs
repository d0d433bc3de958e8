use thiserror::Error;

/// Errors from header lookups and assignments.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HeaderError {
    #[error("header name \"{0}\" was not found")]
    NotFound(String),

    #[error("cannot change header \"{0}\" because it is read-only")]
    ReadOnly(String),

    #[error("invalid value {value:?} for {kind} header \"{name}\": {reason}")]
    InvalidValue {
        name: String,
        kind: &'static str,
        value: String,
        reason: String,
    },

    #[error("duplicate header field: {0}")]
    DuplicateField(String),
}

/// Result alias for header operations.
pub type HeaderResult<T> = Result<T, HeaderError>;
