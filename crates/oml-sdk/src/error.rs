use std::path::PathBuf;

use oml_header::HeaderError;
use oml_store::StoreError;
use oml_xml::XmlError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OmlError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("platform version \"{0}\" not recognized; run `oml versions` to list supported versions")]
    UnsupportedVersion(String),

    #[error("{0}")]
    NotSupported(String),

    #[error("cannot change header \"{0}\" because it is read-only")]
    ReadOnlyField(String),

    #[error("header name \"{0}\" was not found")]
    HeaderNotFound(String),

    #[error("{0}")]
    InvalidHeaderValue(HeaderError),

    #[error("fragment \"{0}\" was not found")]
    FragmentNotFound(String),

    #[error("unable to get XML content of fragment \"{name}\": {reason}")]
    FragmentRender { name: String, reason: String },

    #[error("{0}")]
    MalformedEdit(String),

    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("store error: {0}")]
    Store(StoreError),

    #[error("XML error: {0}")]
    Xml(#[from] XmlError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<HeaderError> for OmlError {
    fn from(err: HeaderError) -> Self {
        match err {
            HeaderError::NotFound(name) => OmlError::HeaderNotFound(name),
            HeaderError::ReadOnly(name) => OmlError::ReadOnlyField(name),
            HeaderError::DuplicateField(name) => {
                OmlError::InvalidArgument(format!("duplicate header field: {name}"))
            }
            other @ HeaderError::InvalidValue { .. } => OmlError::InvalidHeaderValue(other),
        }
    }
}

impl From<StoreError> for OmlError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::FragmentNotFound(name) => OmlError::FragmentNotFound(name),
            StoreError::Io(io) => OmlError::Io(io),
            other => OmlError::Store(other),
        }
    }
}

pub type OmlResult<T> = Result<T, OmlError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_errors_map_to_taxonomy() {
        assert!(matches!(
            OmlError::from(HeaderError::ReadOnly("Signature".into())),
            OmlError::ReadOnlyField(name) if name == "Signature"
        ));
        assert!(matches!(
            OmlError::from(HeaderError::NotFound("Title".into())),
            OmlError::HeaderNotFound(name) if name == "Title"
        ));
    }

    #[test]
    fn store_fragment_not_found_is_lifted() {
        let err = OmlError::from(StoreError::FragmentNotFound("Main".into()));
        assert!(matches!(err, OmlError::FragmentNotFound(name) if name == "Main"));
        let err = OmlError::from(StoreError::UnsupportedFormat(9));
        assert!(matches!(err, OmlError::Store(_)));
    }

    #[test]
    fn unsupported_version_names_the_listing_command() {
        let msg = OmlError::UnsupportedVersion("O7".into()).to_string();
        assert!(msg.contains("\"O7\""));
        assert!(msg.contains("oml versions"));
    }
}
