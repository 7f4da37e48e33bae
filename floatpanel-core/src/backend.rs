//! String key-value storage backends for persisted panel geometry.
//!
//! Backends report failures through [`Result`]; it is the
//! [`GeometryStore`](crate::store::GeometryStore) on top of them that decides
//! those failures are not worth surfacing.

use crate::{storage_error, Error, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Durable string key-value storage.
pub trait StorageBackend: Send + Sync {
    /// Fetch the value stored under `key`, `None` if there is none.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}

/// In-process backend. Clones share the same entries.
///
/// # Example
///
/// ```rust
/// use floatpanel_core::backend::{MemoryBackend, StorageBackend};
///
/// let backend = MemoryBackend::new();
/// let shared = backend.clone();
/// backend.set_item("panel-state:main", "{}")?;
/// assert_eq!(shared.get_item("panel-state:main")?, Some("{}".to_string()));
/// # Ok::<(), floatpanel_core::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|entries| entries.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl StorageBackend for MemoryBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| Error::storage("memory backend lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::storage("memory backend lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| Error::storage("memory backend lock poisoned"))?;
        entries.remove(key);
        Ok(())
    }
}

/// Backend keeping all keys in a single JSON object file.
///
/// The file maps storage keys to payload strings. A missing file reads as an
/// empty store. Writes go to a sibling temporary file that is then renamed
/// over the original.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Backend at the default location,
    /// `<data dir>/floatpanel/panel-state.json`.
    ///
    /// # Errors
    ///
    /// Returns an error if the platform data directory cannot be determined.
    pub fn at_default_location() -> Result<Self> {
        Ok(Self::new(Self::default_path()?))
    }

    pub fn default_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| Error::config("Could not determine data directory"))?
            .join("floatpanel");

        Ok(data_dir.join("panel-state.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        Ok(serde_json::from_str(&content)?)
    }

    /// Like [`load`](Self::load) but starts over from an empty map when the
    /// existing file cannot be parsed, so one corrupt file does not block
    /// every later write.
    fn load_for_update(&self) -> Result<BTreeMap<String, String>> {
        match self.load() {
            Err(Error::Json(e)) => {
                warn!("Discarding unreadable state file {}: {}", self.path.display(), e);
                Ok(BTreeMap::new())
            }
            other => other,
        }
    }

    fn store(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| storage_error!("Failed to create state directory: {}", e))?;
        }

        let content = serde_json::to_string_pretty(entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        std::fs::write(&tmp_path, content)
            .map_err(|e| storage_error!("Failed to write state file: {}", e))?;
        std::fs::rename(&tmp_path, &self.path)
            .map_err(|e| storage_error!("Failed to replace state file: {}", e))?;

        debug!("Wrote {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}

impl StorageBackend for JsonFileBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load_for_update()?;
        entries.insert(key.to_string(), value.to_string());
        self.store(&entries)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        let mut entries = self.load_for_update()?;
        if entries.remove(key).is_some() {
            self.store(&entries)?;
        }
        Ok(())
    }
}
