use tracing::warn;

use crate::error::{HeaderError, HeaderResult};
use crate::field::HeaderField;
use crate::schema::HeaderSchema;
use crate::value::HeaderValue;

/// A header assignment that has passed every check and can no longer fail.
///
/// Produced by [`HeaderSet::prepare`]; applying it with
/// [`HeaderSet::commit`] is infallible, which lets callers validate a whole
/// batch before touching any value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PreparedHeader {
    index: usize,
    entry: Entry,
}

/// Stored text plus its coerced value; the text is what `get` returns.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Entry {
    raw: String,
    value: HeaderValue,
}

impl Entry {
    fn default_for(field: &HeaderField) -> Self {
        let value = HeaderValue::default_for(field.kind());
        Self {
            raw: value.to_string(),
            value,
        }
    }
}

/// Current values for every field of a schema.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeaderSet {
    schema: HeaderSchema,
    entries: Vec<Entry>,
}

impl HeaderSet {
    /// A set with every field at its default value.
    pub fn new(schema: HeaderSchema) -> Self {
        let entries = schema.fields().iter().map(Entry::default_for).collect();
        Self { schema, entries }
    }

    /// Build a set from raw name/value pairs read out of a container.
    ///
    /// Names match case-insensitively; fields without a pair keep their
    /// default and unknown names are skipped. Read-only fields are populated
    /// like any other, since the container is their source of truth.
    pub fn from_raw<'a, I>(schema: HeaderSchema, pairs: I) -> HeaderResult<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut set = Self::new(schema);
        for (name, raw) in pairs {
            let Some(index) = set.schema.position(name) else {
                warn!(header = name, "ignoring header not declared by the schema");
                continue;
            };
            set.entries[index] = set.coerce(index, raw)?;
        }
        Ok(set)
    }

    pub fn schema(&self) -> &HeaderSchema {
        &self.schema
    }

    /// The named field's text exactly as it was last written.
    pub fn get(&self, name: &str) -> HeaderResult<String> {
        let index = self.index_of(name)?;
        Ok(self.entries[index].raw.clone())
    }

    /// Typed value of the named field.
    pub fn value(&self, name: &str) -> HeaderResult<&HeaderValue> {
        let index = self.index_of(name)?;
        Ok(&self.entries[index].value)
    }

    /// Assign raw text to a field.
    ///
    /// Fails for unknown names, read-only fields and values that do not
    /// coerce to the field's kind. On failure the stored value is unchanged.
    pub fn set(&mut self, name: &str, raw: &str) -> HeaderResult<()> {
        let prepared = self.prepare(name, raw)?;
        self.commit(prepared);
        Ok(())
    }

    /// Run every check of [`set`](Self::set) without assigning.
    pub fn prepare(&self, name: &str, raw: &str) -> HeaderResult<PreparedHeader> {
        let index = self.index_of(name)?;
        let field = &self.schema.fields()[index];
        if field.is_read_only() {
            return Err(HeaderError::ReadOnly(field.name().to_string()));
        }
        let entry = self.coerce(index, raw)?;
        Ok(PreparedHeader { index, entry })
    }

    pub fn commit(&mut self, prepared: PreparedHeader) {
        self.entries[prepared.index] = prepared.entry;
    }

    /// Fields paired with their stored text, in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&HeaderField, &str)> {
        self.schema
            .fields()
            .iter()
            .zip(self.entries.iter().map(|e| e.raw.as_str()))
    }

    /// Every field as `(name, text)` for writing into a container.
    pub fn to_raw(&self) -> Vec<(String, String)> {
        self.iter()
            .map(|(field, raw)| (field.name().to_string(), raw.to_string()))
            .collect()
    }

    fn index_of(&self, name: &str) -> HeaderResult<usize> {
        self.schema
            .position(name)
            .ok_or_else(|| HeaderError::NotFound(name.to_string()))
    }

    /// Typed values are validated but the caller's text is kept as written.
    fn coerce(&self, index: usize, raw: &str) -> HeaderResult<Entry> {
        let field = &self.schema.fields()[index];
        let value = HeaderValue::parse(field.kind(), raw).map_err(|reason| {
            HeaderError::InvalidValue {
                name: field.name().to_string(),
                kind: field.kind().as_str(),
                value: raw.to_string(),
                reason,
            }
        })?;
        Ok(Entry {
            raw: raw.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldKind;
    use proptest::prelude::*;

    fn builtin_set() -> HeaderSet {
        HeaderSet::new(HeaderSchema::builtin())
    }

    #[test]
    fn every_field_has_a_value() {
        let set = builtin_set();
        assert_eq!(set.iter().count(), set.schema().len());
        assert_eq!(set.get("Name").unwrap(), "");
        assert_eq!(set.get("Revision").unwrap(), "0");
    }

    #[test]
    fn set_then_get_returns_written_value() {
        let mut set = builtin_set();
        set.set("Description", "Customer portal").unwrap();
        assert_eq!(set.get("description").unwrap(), "Customer portal");
        set.set("revision", "17").unwrap();
        assert_eq!(set.get("Revision").unwrap(), "17");
    }

    #[test]
    fn typed_fields_keep_the_written_text() {
        let mut set = builtin_set();
        set.set("IsSystemModule", "1").unwrap();
        set.set("Revision", "007").unwrap();
        assert_eq!(set.get("IsSystemModule").unwrap(), "1");
        assert_eq!(set.get("Revision").unwrap(), "007");
        assert_eq!(set.value("IsSystemModule").unwrap(), &HeaderValue::Boolean(true));
        assert_eq!(set.value("Revision").unwrap(), &HeaderValue::Integer(7));

        set.set("IsSystemModule", " True ").unwrap();
        assert_eq!(set.get("IsSystemModule").unwrap(), " True ");
        let raw = set.to_raw();
        assert!(raw.contains(&("Revision".to_string(), "007".to_string())));
    }

    #[test]
    fn read_only_fields_always_reject() {
        let mut set = builtin_set();
        let read_only: Vec<String> = set
            .schema()
            .fields()
            .iter()
            .filter(|f| f.is_read_only())
            .map(|f| f.name().to_string())
            .collect();
        assert!(!read_only.is_empty());
        for name in read_only {
            for raw in ["", "x", "2024-01-01T00:00:00Z"] {
                let err = set.set(&name, raw).unwrap_err();
                assert_eq!(err, HeaderError::ReadOnly(name.clone()));
            }
        }
    }

    #[test]
    fn failed_coercion_leaves_value_unchanged() {
        let mut set = builtin_set();
        set.set("Revision", "3").unwrap();
        let err = set.set("Revision", "three").unwrap_err();
        assert!(matches!(err, HeaderError::InvalidValue { .. }));
        assert_eq!(set.get("Revision").unwrap(), "3");
    }

    #[test]
    fn unknown_header_is_not_found() {
        let mut set = builtin_set();
        assert_eq!(
            set.set("Title", "x").unwrap_err(),
            HeaderError::NotFound("Title".into())
        );
        assert!(set.get("Title").is_err());
    }

    #[test]
    fn from_raw_fills_read_only_and_skips_unknown() {
        let set = HeaderSet::from_raw(
            HeaderSchema::builtin(),
            [
                ("signature", "abc"),
                ("Name", "Portal"),
                ("Bogus", "ignored"),
            ],
        )
        .unwrap();
        assert_eq!(set.get("Signature").unwrap(), "abc");
        assert_eq!(set.get("Name").unwrap(), "Portal");
        assert_eq!(set.get("Description").unwrap(), "");
    }

    #[test]
    fn from_raw_rejects_bad_typed_value() {
        let err = HeaderSet::from_raw(HeaderSchema::builtin(), [("Revision", "x")]).unwrap_err();
        assert!(matches!(err, HeaderError::InvalidValue { .. }));
    }

    #[test]
    fn to_raw_roundtrips_through_from_raw() {
        let mut set = builtin_set();
        set.set("Name", "Portal").unwrap();
        set.set("IsSystemModule", "true").unwrap();
        let raw = set.to_raw();
        let rebuilt = HeaderSet::from_raw(
            HeaderSchema::builtin(),
            raw.iter().map(|(n, v)| (n.as_str(), v.as_str())),
        )
        .unwrap();
        assert_eq!(rebuilt, set);
    }

    #[test]
    fn prepare_does_not_assign() {
        let set = builtin_set();
        let prepared = set.prepare("Name", "Draft").unwrap();
        assert_eq!(set.get("Name").unwrap(), "");
        let mut set = set;
        set.commit(prepared);
        assert_eq!(set.get("Name").unwrap(), "Draft");
    }

    #[test]
    fn custom_schema() {
        let schema = HeaderSchema::new(vec![
            HeaderField::new("Title", FieldKind::Text),
            HeaderField::new("Locked", FieldKind::Boolean).read_only(),
        ])
        .unwrap();
        let mut set = HeaderSet::new(schema);
        set.set("title", "x").unwrap();
        assert_eq!(set.get("TITLE").unwrap(), "x");
        assert!(set.set("locked", "true").is_err());
    }

    proptest! {
        #[test]
        fn writable_text_roundtrips_exactly(value in ".*") {
            let mut set = builtin_set();
            set.set("Description", &value).unwrap();
            prop_assert_eq!(set.get("Description").unwrap(), value);
        }

        #[test]
        fn writable_integer_roundtrips(n: i64) {
            let mut set = builtin_set();
            set.set("Revision", &n.to_string()).unwrap();
            prop_assert_eq!(set.get("Revision").unwrap(), n.to_string());
        }
    }
}
