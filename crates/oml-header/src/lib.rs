//! Typed header schema for OML documents.
//!
//! Headers are declared in a static table rather than discovered at runtime:
//! each [`HeaderField`] names a value kind and whether users may change it.
//! A [`HeaderSet`] holds one value for every field of a [`HeaderSchema`],
//! so a header is never absent, only defaulted.
//!
//! Field names compare case-insensitively (`title` finds `Title`).

pub mod error;
pub mod field;
pub mod schema;
pub mod set;
pub mod value;

pub use error::{HeaderError, HeaderResult};
pub use field::{FieldKind, HeaderField};
pub use schema::HeaderSchema;
pub use set::{HeaderSet, PreparedHeader};
pub use value::HeaderValue;
