use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TypeError, TypeResult};

/// Token that always resolves to the newest supported platform version.
pub const LATEST_TOKEN: &str = "OL";

/// Four-part numeric platform version (`major.minor.build.revision`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VersionNumber {
    pub major: u16,
    pub minor: u16,
    pub build: u16,
    pub revision: u16,
}

impl VersionNumber {
    pub const fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }
}

impl fmt::Debug for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VersionNumber({self})")
    }
}

impl fmt::Display for VersionNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

impl FromStr for VersionNumber {
    type Err = TypeError;

    /// Parse `major[.minor[.build[.revision]]]`; missing parts are zero.
    fn from_str(s: &str) -> TypeResult<Self> {
        let parts: Vec<&str> = s.trim().split('.').collect();
        if parts.is_empty() || parts.len() > 4 {
            return Err(TypeError::InvalidVersionNumber(s.to_string()));
        }
        let mut numbers = [0u16; 4];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| TypeError::InvalidVersionNumber(s.to_string()))?;
        }
        Ok(Self::new(numbers[0], numbers[1], numbers[2], numbers[3]))
    }
}

/// A labelled platform release.
///
/// The label (`O11`) is what users type; the number (`11.0.0.0`) is what
/// containers record and what ordering is based on.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlatformVersion {
    label: String,
    number: VersionNumber,
}

impl PlatformVersion {
    pub fn new(label: impl Into<String>, number: VersionNumber) -> Self {
        Self {
            label: label.into(),
            number,
        }
    }

    /// Short label, e.g. `O11`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Full version number, e.g. `11.0.0.0`.
    pub fn number(&self) -> VersionNumber {
        self.number
    }

    pub fn major(&self) -> u16 {
        self.number.major
    }

    /// Case-insensitive label comparison.
    pub fn matches_label(&self, label: &str) -> bool {
        self.label.eq_ignore_ascii_case(label)
    }
}

impl fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Ordered set of supported platform versions with a designated latest.
///
/// Deserialization goes through [`VersionRegistry::new`], so a registry read
/// from config is held to the same checks as one built in code.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RegistryRepr", into = "RegistryRepr")]
pub struct VersionRegistry {
    versions: Vec<PlatformVersion>,
    latest: usize,
}

/// Serialized form: the latest version is named by label.
#[derive(Serialize, Deserialize)]
struct RegistryRepr {
    versions: Vec<PlatformVersion>,
    latest: String,
}

impl TryFrom<RegistryRepr> for VersionRegistry {
    type Error = TypeError;

    fn try_from(repr: RegistryRepr) -> TypeResult<Self> {
        Self::new(repr.versions, &repr.latest)
    }
}

impl From<VersionRegistry> for RegistryRepr {
    fn from(registry: VersionRegistry) -> Self {
        let latest = registry.latest().label().to_string();
        Self {
            versions: registry.versions,
            latest,
        }
    }
}

impl VersionRegistry {
    /// Build a registry from versions in declaration order.
    ///
    /// Labels must be unique (case-insensitively) and `latest_label` must name
    /// one of the versions.
    pub fn new(versions: Vec<PlatformVersion>, latest_label: &str) -> TypeResult<Self> {
        if versions.is_empty() {
            return Err(TypeError::EmptyRegistry);
        }
        for (i, version) in versions.iter().enumerate() {
            if versions[..i]
                .iter()
                .any(|earlier| earlier.matches_label(version.label()))
            {
                return Err(TypeError::DuplicateLabel(version.label().to_string()));
            }
        }
        let latest = versions
            .iter()
            .position(|v| v.matches_label(latest_label))
            .ok_or_else(|| TypeError::UnknownLatest(latest_label.to_string()))?;
        Ok(Self { versions, latest })
    }

    /// The platform versions this toolkit ships with.
    pub fn builtin() -> Self {
        let versions = vec![
            PlatformVersion::new("O9.0", VersionNumber::new(9, 0, 0, 0)),
            PlatformVersion::new("O9.1", VersionNumber::new(9, 1, 0, 0)),
            PlatformVersion::new("O10", VersionNumber::new(10, 0, 0, 0)),
            PlatformVersion::new("O11", VersionNumber::new(11, 0, 0, 0)),
        ];
        Self { versions, latest: 3 }
    }

    /// All versions in declaration order.
    pub fn versions(&self) -> &[PlatformVersion] {
        &self.versions
    }

    pub fn latest(&self) -> &PlatformVersion {
        &self.versions[self.latest]
    }

    /// Look up a version by label, ignoring case.
    pub fn find(&self, label: &str) -> Option<&PlatformVersion> {
        self.versions.iter().find(|v| v.matches_label(label))
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

impl Default for VersionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
