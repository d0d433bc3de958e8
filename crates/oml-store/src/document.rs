use oml_types::{PlatformVersion, VersionNumber};

/// One fragment as held by the container: its name and an opaque payload
/// whose encoding belongs to the store that produced it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeFragment {
    pub name: String,
    pub payload: Vec<u8>,
}

/// A loaded container handle.
///
/// Holds the platform version the container was written with, raw header
/// pairs exactly as stored and fragments in container order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NativeDocument {
    platform: VersionNumber,
    platform_label: String,
    headers: Vec<(String, String)>,
    fragments: Vec<NativeFragment>,
}

impl NativeDocument {
    /// An empty container for the given platform.
    pub fn new(platform: &PlatformVersion) -> Self {
        Self {
            platform: platform.number(),
            platform_label: platform.label().to_string(),
            headers: Vec::new(),
            fragments: Vec::new(),
        }
    }

    pub(crate) fn from_parts(
        platform: VersionNumber,
        platform_label: String,
        headers: Vec<(String, String)>,
        fragments: Vec<NativeFragment>,
    ) -> Self {
        Self {
            platform,
            platform_label,
            headers,
            fragments,
        }
    }

    pub fn platform(&self) -> VersionNumber {
        self.platform
    }

    pub fn platform_label(&self) -> &str {
        &self.platform_label
    }

    /// Record the platform the container will be saved under.
    pub fn set_platform(&mut self, platform: &PlatformVersion) {
        self.platform = platform.number();
        self.platform_label = platform.label().to_string();
    }

    /// Raw header pairs in stored order.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Replace a raw header (matched ignoring case) or append it.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .headers
            .iter_mut()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
        {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name.to_string(), value)),
        }
    }

    pub fn fragments(&self) -> &[NativeFragment] {
        &self.fragments
    }

    /// Fragment by exact name.
    pub fn fragment(&self, name: &str) -> Option<&NativeFragment> {
        self.fragments.iter().find(|f| f.name == name)
    }

    /// Insert or replace a fragment payload; replacements keep their position.
    pub fn put_fragment(&mut self, name: &str, payload: Vec<u8>) {
        match self.fragments.iter_mut().find(|f| f.name == name) {
            Some(fragment) => fragment.payload = payload,
            None => self.fragments.push(NativeFragment {
                name: name.to_string(),
                payload,
            }),
        }
    }
}
