//! Document store capability for OML containers.
//!
//! The container encoding sits behind the [`DocumentStore`] trait: the rest
//! of the toolkit only loads a [`NativeDocument`] handle, asks for fragment
//! names, decodes or re-encodes individual fragments and saves the handle.
//!
//! # Backends
//!
//! - [`NativeContainerStore`]: self-describing binary container with
//!   zstd-compressed fragments, CRC32 per fragment and a BLAKE3 trailer
//!
//! # Fragment access
//!
//! [`FragmentStore`] sits on top of a loaded handle and materializes fragment
//! XML lazily: each fragment is decoded at most once per store and cached
//! until the store is dropped. Fragment names are case-sensitive.

pub mod document;
pub mod error;
pub mod fragments;
pub mod native;
pub mod traits;

pub use document::{NativeDocument, NativeFragment};
pub use error::{StoreError, StoreResult};
pub use fragments::FragmentStore;
pub use native::NativeContainerStore;
pub use traits::{DocumentStore, ReadSeek};
