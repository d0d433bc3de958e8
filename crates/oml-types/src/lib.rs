//! Foundation types for the OML toolkit.
//!
//! Every other OML crate depends on `oml-types`. It describes which platform
//! versions the toolkit understands and how a version token is resolved.
//!
//! # Key Types
//!
//! - [`VersionNumber`]: four-part numeric version (`11.0.0.0`)
//! - [`PlatformVersion`]: a labelled platform release (`O11`)
//! - [`VersionRegistry`]: ordered set of supported releases with a designated latest

pub mod error;
pub mod version;

pub use error::{TypeError, TypeResult};
pub use version::{PlatformVersion, VersionNumber, VersionRegistry, LATEST_TOKEN};
