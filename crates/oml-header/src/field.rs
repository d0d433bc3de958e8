use std::fmt;

use serde::{Deserialize, Serialize};

/// Value kind of a header field. Every kind converts to and from text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FieldKind {
    Text,
    Boolean,
    Integer,
    Timestamp,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Timestamp => "timestamp",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared header field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderField {
    name: String,
    kind: FieldKind,
    read_only: bool,
    since: u16,
}

impl HeaderField {
    /// A writable field available since the first platform major.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            read_only: false,
            since: 0,
        }
    }

    /// Mark the field read-only.
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    /// First platform major version that declares this field.
    pub fn since(mut self, major: u16) -> Self {
        self.since = major;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn since_major(&self) -> u16 {
        self.since
    }

    /// Case-insensitive name comparison.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_flags() {
        let f = HeaderField::new("Signature", FieldKind::Text)
            .read_only()
            .since(10);
        assert!(f.is_read_only());
        assert_eq!(f.since_major(), 10);
        assert_eq!(f.kind(), FieldKind::Text);
    }

    #[test]
    fn is_named_ignores_case() {
        let f = HeaderField::new("LastModifiedUTC", FieldKind::Timestamp);
        assert!(f.is_named("lastmodifiedutc"));
        assert!(f.is_named("LASTMODIFIEDUTC"));
        assert!(!f.is_named("LastModified"));
    }
}
