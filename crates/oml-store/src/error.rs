use oml_types::VersionNumber;

/// Errors from document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The input does not start with the container magic.
    #[error("invalid container magic: expected {expected}, got {actual}")]
    InvalidMagic { expected: String, actual: String },

    /// The container layout version is not understood.
    #[error("unsupported container format version: {0}")]
    UnsupportedFormat(u32),

    /// The trailing BLAKE3 checksum does not match the content.
    #[error("container checksum mismatch: expected {expected}, computed {computed}")]
    ChecksumMismatch { expected: String, computed: String },

    /// A fragment payload failed its CRC32 check.
    #[error("CRC32 mismatch for fragment \"{0}\"")]
    CrcMismatch(String),

    /// The container structure is malformed.
    #[error("corrupt container at offset {offset}: {reason}")]
    Corrupt { offset: u64, reason: String },

    /// The document was written by a newer platform than the one requested.
    #[error("document was saved with platform {document}, which is newer than {requested}")]
    NewerPlatform {
        document: VersionNumber,
        requested: String,
    },

    /// No fragment with this exact name exists.
    #[error("fragment \"{0}\" was not found")]
    FragmentNotFound(String),

    /// A fragment payload could not be turned into XML.
    #[error("unable to decode fragment \"{name}\": {reason}")]
    FragmentDecode { name: String, reason: String },

    /// Compressing a fragment payload failed.
    #[error("compression failed: {0}")]
    Compression(String),

    /// Header block (de)serialization failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying reader or writer.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
