use std::collections::HashMap;
use std::io::Write;
use std::sync::Arc;

use oml_xml::XmlElement;
use tracing::debug;

use crate::document::NativeDocument;
use crate::error::{StoreError, StoreResult};
use crate::traits::DocumentStore;

#[derive(Debug, Default)]
struct FragmentSlot {
    /// Decoded tree; `None` until first access.
    cached: Option<XmlElement>,
    /// Set by callers and not yet written back to the handle.
    dirty: bool,
}

/// Named fragment access over a loaded container.
///
/// Names are matched exactly (case-sensitive). Each fragment's native payload
/// is decoded through the [`DocumentStore`] on first access and cached for the
/// lifetime of this store; later reads return the cached tree.
pub struct FragmentStore {
    store: Arc<dyn DocumentStore>,
    native: NativeDocument,
    order: Vec<String>,
    slots: HashMap<String, FragmentSlot>,
}

impl FragmentStore {
    /// Wrap a loaded handle. Nothing is decoded yet.
    pub fn new(store: Arc<dyn DocumentStore>, native: NativeDocument) -> Self {
        let order = store.fragment_names(&native);
        let slots = order
            .iter()
            .map(|name| (name.clone(), FragmentSlot::default()))
            .collect();
        Self {
            store,
            native,
            order,
            slots,
        }
    }

    /// Fragment names in container order; names added later come last.
    pub fn names(&self) -> &[String] {
        &self.order
    }

    pub fn contains(&self, name: &str) -> bool {
        self.slots.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// XML content of a fragment, decoding it on first access.
    pub fn get_xml(&mut self, name: &str) -> StoreResult<&XmlElement> {
        let slot = self
            .slots
            .get_mut(name)
            .ok_or_else(|| StoreError::FragmentNotFound(name.to_string()))?;
        if slot.cached.is_none() {
            let xml = self
                .store
                .read_fragment(&self.native, name)?
                .ok_or_else(|| StoreError::FragmentNotFound(name.to_string()))?;
            debug!(fragment = name, "materialized fragment");
            slot.cached = Some(xml);
        }
        slot.cached
            .as_ref()
            .ok_or_else(|| StoreError::FragmentNotFound(name.to_string()))
    }

    /// Insert or replace a fragment's XML and mark it for write-back.
    pub fn set_xml(&mut self, name: &str, xml: XmlElement) {
        if !self.slots.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.slots.insert(
            name.to_string(),
            FragmentSlot {
                cached: Some(xml),
                dirty: true,
            },
        );
    }

    /// Whether the fragment has been decoded or set.
    pub fn is_materialized(&self, name: &str) -> bool {
        self.slots
            .get(name)
            .map(|slot| slot.cached.is_some())
            .unwrap_or(false)
    }

    /// Whether any fragment has changes not yet written to the handle.
    pub fn is_dirty(&self) -> bool {
        self.slots.values().any(|slot| slot.dirty)
    }

    /// Encode every dirty fragment back into the handle.
    ///
    /// Returns the number of fragments written.
    pub fn flush(&mut self) -> StoreResult<usize> {
        let mut written = 0;
        for name in &self.order {
            let Some(slot) = self.slots.get_mut(name) else {
                continue;
            };
            if !slot.dirty {
                continue;
            }
            if let Some(xml) = &slot.cached {
                self.store.write_fragment(&mut self.native, name, xml)?;
            }
            slot.dirty = false;
            written += 1;
        }
        if written > 0 {
            debug!(written, "flushed fragments");
        }
        Ok(written)
    }

    /// Flush pending fragments and write the container to `sink`.
    pub fn save(&mut self, sink: &mut dyn Write) -> StoreResult<()> {
        self.flush()?;
        self.store.save(&self.native, sink)
    }

    /// The underlying handle.
    pub fn native(&self) -> &NativeDocument {
        &self.native
    }

    /// Mutable access to the handle, e.g. to update raw headers before saving.
    pub fn native_mut(&mut self) -> &mut NativeDocument {
        &mut self.native
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }
}

impl std::fmt::Debug for FragmentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let materialized = self.slots.values().filter(|s| s.cached.is_some()).count();
        f.debug_struct("FragmentStore")
            .field("fragments", &self.order.len())
            .field("materialized", &materialized)
            .field("dirty", &self.is_dirty())
            .finish()
    }
}
