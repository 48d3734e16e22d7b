//! Durable Slot Storage
//!
//! Named-slot persistence shared by the cart and the theme preference. Each
//! slot holds one serialized payload that is overwritten as a whole.

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::error::{Result, StorefrontError};

/// Slot holding the serialized cart line items.
pub const CART_SLOT: &str = "cart";

/// Slot holding the theme preference.
pub const THEME_SLOT: &str = "theme";

// == Slot Storage Trait ==
/// A set of named, individually overwritable payload slots.
pub trait SlotStorage: Send {
    /// Reads the payload of `slot`, `None` if it was never written.
    fn read(&self, slot: &str) -> Result<Option<String>>;

    /// Replaces the payload of `slot`.
    fn write(&mut self, slot: &str, payload: &str) -> Result<()>;
}

// == File Storage ==
/// Stores each slot as `<dir>/<slot>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Opens (and creates if needed) the slot directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| {
            StorefrontError::Storage(format!("cannot create {}: {}", dir.display(), e))
        })?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }
}

impl SlotStorage for FileStorage {
    fn read(&self, slot: &str) -> Result<Option<String>> {
        let path = self.slot_path(slot);
        match fs::read_to_string(&path) {
            Ok(payload) => Ok(Some(payload)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorefrontError::Storage(format!(
                "cannot read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn write(&mut self, slot: &str, payload: &str) -> Result<()> {
        let path = self.slot_path(slot);
        // Write beside the target, then rename into place.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, payload)
            .and_then(|_| fs::rename(&tmp, &path))
            .map_err(|e| {
                StorefrontError::Storage(format!("cannot write {}: {}", path.display(), e))
            })
    }
}

// == Memory Storage ==
/// In-process slots. Clones share the same slots, which lets a second store
/// instance observe what a first one persisted.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.slots
            .lock()
            .map_err(|_| StorefrontError::Storage("memory slots poisoned".to_string()))
    }
}

impl SlotStorage for MemoryStorage {
    fn read(&self, slot: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(slot).cloned())
    }

    fn write(&mut self, slot: &str, payload: &str) -> Result<()> {
        self.lock()?.insert(slot.to_string(), payload.to_string());
        Ok(())
    }
}
