use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{OmlError, OmlResult};

/// Toolkit configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OmlConfig {
    /// Chunk size used when buffering a non-seekable source.
    pub read_chunk_size: usize,
    /// Extension (without dot) of native documents, matched ignoring case.
    pub native_extension: String,
    /// Version token that resolves to the latest supported platform.
    pub latest_token: String,
}

impl Default for OmlConfig {
    fn default() -> Self {
        Self {
            read_chunk_size: 32 * 1024,
            native_extension: "oml".into(),
            latest_token: oml_types::LATEST_TOKEN.into(),
        }
    }
}

impl OmlConfig {
    /// Parse a TOML document; missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> OmlResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| OmlError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> OmlResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> OmlResult<()> {
        if self.read_chunk_size == 0 {
            return Err(OmlError::Config("read_chunk_size must be positive".into()));
        }
        if self.native_extension.is_empty() || self.native_extension.starts_with('.') {
            return Err(OmlError::Config(format!(
                "native_extension must be a bare extension, got {:?}",
                self.native_extension
            )));
        }
        if self.latest_token.is_empty() {
            return Err(OmlError::Config("latest_token must not be empty".into()));
        }
        Ok(())
    }
}
