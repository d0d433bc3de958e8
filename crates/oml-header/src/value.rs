use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::field::FieldKind;

/// A typed header value.
///
/// Every kind has a default (`""`, `false`, `0`, unset timestamp) so a field
/// always has a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HeaderValue {
    Text(String),
    Boolean(bool),
    Integer(i64),
    Timestamp(Option<DateTime<Utc>>),
}

impl HeaderValue {
    pub fn default_for(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text => Self::Text(String::new()),
            FieldKind::Boolean => Self::Boolean(false),
            FieldKind::Integer => Self::Integer(0),
            FieldKind::Timestamp => Self::Timestamp(None),
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::Text(_) => FieldKind::Text,
            Self::Boolean(_) => FieldKind::Boolean,
            Self::Integer(_) => FieldKind::Integer,
            Self::Timestamp(_) => FieldKind::Timestamp,
        }
    }

    /// Coerce raw text into a value of `kind`.
    ///
    /// Text is taken verbatim. Booleans accept `true/false/1/0` in any case,
    /// integers any `i64`, timestamps RFC 3339 or an empty string for unset.
    /// The error is a human-readable reason.
    pub fn parse(kind: FieldKind, raw: &str) -> Result<Self, String> {
        match kind {
            FieldKind::Text => Ok(Self::Text(raw.to_string())),
            FieldKind::Boolean => {
                let trimmed = raw.trim();
                if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
                    Ok(Self::Boolean(true))
                } else if trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
                    Ok(Self::Boolean(false))
                } else {
                    Err("expected true or false".into())
                }
            }
            FieldKind::Integer => raw
                .trim()
                .parse::<i64>()
                .map(Self::Integer)
                .map_err(|e| e.to_string()),
            FieldKind::Timestamp => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Ok(Self::Timestamp(None));
                }
                DateTime::parse_from_rfc3339(trimmed)
                    .map(|dt| Self::Timestamp(Some(dt.with_timezone(&Utc))))
                    .map_err(|e| e.to_string())
            }
        }
    }
}

impl fmt::Display for HeaderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(n) => write!(f, "{n}"),
            Self::Timestamp(Some(ts)) => {
                f.write_str(&ts.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            Self::Timestamp(None) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn defaults_render_as_empty_or_zero() {
        assert_eq!(HeaderValue::default_for(FieldKind::Text).to_string(), "");
        assert_eq!(HeaderValue::default_for(FieldKind::Boolean).to_string(), "false");
        assert_eq!(HeaderValue::default_for(FieldKind::Integer).to_string(), "0");
        assert_eq!(HeaderValue::default_for(FieldKind::Timestamp).to_string(), "");
    }

    #[test]
    fn text_is_verbatim() {
        let v = HeaderValue::parse(FieldKind::Text, "  a:b  ").unwrap();
        assert_eq!(v.to_string(), "  a:b  ");
    }

    #[test]
    fn boolean_spellings() {
        for raw in ["true", "TRUE", "1", " True "] {
            assert_eq!(
                HeaderValue::parse(FieldKind::Boolean, raw).unwrap(),
                HeaderValue::Boolean(true)
            );
        }
        for raw in ["false", "False", "0"] {
            assert_eq!(
                HeaderValue::parse(FieldKind::Boolean, raw).unwrap(),
                HeaderValue::Boolean(false)
            );
        }
        assert!(HeaderValue::parse(FieldKind::Boolean, "yes").is_err());
    }

    #[test]
    fn integer_parse() {
        assert_eq!(
            HeaderValue::parse(FieldKind::Integer, " 42 ").unwrap(),
            HeaderValue::Integer(42)
        );
        assert!(HeaderValue::parse(FieldKind::Integer, "4.2").is_err());
        assert!(HeaderValue::parse(FieldKind::Integer, "").is_err());
    }

    #[test]
    fn timestamp_normalizes_to_utc() {
        let v = HeaderValue::parse(FieldKind::Timestamp, "2024-05-01T12:00:00+02:00").unwrap();
        assert_eq!(
            v,
            HeaderValue::Timestamp(Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()))
        );
        assert_eq!(v.to_string(), "2024-05-01T10:00:00Z");
    }

    #[test]
    fn timestamp_empty_is_unset() {
        assert_eq!(
            HeaderValue::parse(FieldKind::Timestamp, "").unwrap(),
            HeaderValue::Timestamp(None)
        );
        assert!(HeaderValue::parse(FieldKind::Timestamp, "yesterday").is_err());
    }

    #[test]
    fn kind_matches_variant() {
        assert_eq!(HeaderValue::Integer(1).kind(), FieldKind::Integer);
        assert_eq!(HeaderValue::Timestamp(None).kind(), FieldKind::Timestamp);
    }
}
