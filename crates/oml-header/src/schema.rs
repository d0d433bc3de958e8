use oml_types::PlatformVersion;

use crate::error::{HeaderError, HeaderResult};
use crate::field::{FieldKind, HeaderField};

/// The built-in header table: name, kind, read-only, first platform major.
const BUILTIN_FIELDS: &[(&str, FieldKind, bool, u16)] = &[
    ("Name", FieldKind::Text, false, 9),
    ("Description", FieldKind::Text, false, 9),
    ("ActivationCode", FieldKind::Text, false, 9),
    ("Revision", FieldKind::Integer, false, 9),
    ("IsSystemModule", FieldKind::Boolean, false, 10),
    ("Version", FieldKind::Text, true, 9),
    ("LastUpgradeVersion", FieldKind::Text, true, 9),
    ("LastModifiedUTC", FieldKind::Timestamp, true, 9),
    ("Signature", FieldKind::Text, true, 9),
];

/// An ordered set of uniquely named header fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderSchema {
    fields: Vec<HeaderField>,
}

impl HeaderSchema {
    /// Build a schema; names must be unique ignoring case.
    pub fn new(fields: Vec<HeaderField>) -> HeaderResult<Self> {
        for (i, field) in fields.iter().enumerate() {
            if fields[..i].iter().any(|f| f.is_named(field.name())) {
                return Err(HeaderError::DuplicateField(field.name().to_string()));
            }
        }
        Ok(Self { fields })
    }

    /// Every built-in field regardless of platform version.
    pub fn builtin() -> Self {
        Self::from_table(|_| true)
    }

    /// Built-in fields declared by `version`.
    pub fn for_version(version: &PlatformVersion) -> Self {
        Self::from_table(|since| since <= version.major())
    }

    fn from_table(include: impl Fn(u16) -> bool) -> Self {
        let fields = BUILTIN_FIELDS
            .iter()
            .filter(|(_, _, _, since)| include(*since))
            .map(|&(name, kind, read_only, since)| {
                let field = HeaderField::new(name, kind).since(since);
                if read_only {
                    field.read_only()
                } else {
                    field
                }
            })
            .collect();
        Self { fields }
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[HeaderField] {
        &self.fields
    }

    /// Case-insensitive exact lookup.
    pub fn find_field(&self, name: &str) -> Option<&HeaderField> {
        self.fields.iter().find(|f| f.is_named(name))
    }

    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.is_named(name))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
