use crate::wheel::EnablementMap;
use derive_more::{AsRef, Deref, Display, From, Into};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_PERSIST_KEY: &str = "spinwheel:enabled";

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct PersistKey(String);

crate::impl_string_newtype!(PersistKey);

impl Default for PersistKey {
    fn default() -> Self {
        Self::new(DEFAULT_PERSIST_KEY)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to determine data directory")]
    DataDirNotFound,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// String key-value persistence.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// All keys live in one JSON document on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$XDG_DATA_HOME/spinwheel/storage.json`
    pub fn open_default() -> Result<Self, StoreError> {
        let data_home = xdg::BaseDirectories::new()
            .get_data_home()
            .ok_or(StoreError::DataDirNotFound)?;
        Ok(Self::new(data_home.join("spinwheel").join("storage.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs_err::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

impl Storage for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // a corrupt document is replaced rather than blocking every write
        let mut entries = self.read_all().unwrap_or_default();
        entries.insert(key.to_string(), value.to_string());
        if let Some(parent) = self.path.parent() {
            fs_err::create_dir_all(parent)?;
        }
        fs_err::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}

/// Loads and saves enablement maps. Storage is a convenience, so every failure
/// is logged and swallowed here.
pub struct EnablementStore<S> {
    storage: S,
}

impl<S: Storage> EnablementStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn load(&self, key: &PersistKey) -> Option<EnablementMap> {
        let raw = match self.storage.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read enablement for '{}': {}", key, e);
                return None;
            }
        };
        match serde_json::from_str::<EnablementMap>(&raw) {
            Ok(map) => Some(map),
            Err(e) => {
                log::warn!("Ignoring malformed enablement for '{}': {}", key, e);
                None
            }
        }
    }

    pub fn save(&self, key: &PersistKey, map: &EnablementMap) {
        let result = serde_json::to_string(map)
            .map_err(StoreError::from)
            .and_then(|raw| self.storage.set(key, &raw));
        if let Err(e) = result {
            log::warn!("Failed to save enablement for '{}': {}", key, e);
        }
    }
}
