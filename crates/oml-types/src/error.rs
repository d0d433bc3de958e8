use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid version number: {0}")]
    InvalidVersionNumber(String),

    #[error("duplicate platform version label: {0}")]
    DuplicateLabel(String),

    #[error("latest platform version {0:?} is not part of the registry")]
    UnknownLatest(String),

    #[error("version registry must not be empty")]
    EmptyRegistry,
}

/// Result alias for type operations.
pub type TypeResult<T> = Result<T, TypeError>;
