//! Injected key/value state store.
//!
//! Replaces reading and writing browser storage from wherever it is needed:
//! callers get a `StateStore` handed to them and go through typed keys.

use crate::error::StoreError;
use crate::search::SearchFilters;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, warn};

pub trait StateStore: Send + Sync {
    fn get_raw(&self, key: &str) -> Result<Option<Value>, StoreError>;
    fn set_raw(&self, key: &str, value: Value) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// A store key bound to the type stored under it
#[derive(Debug)]
pub struct StoreKey<T> {
    pub name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StoreKey<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }
}

impl<T> Clone for StoreKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StoreKey<T> {}

/// How the user wants to be reached about a listing
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ContactSettings {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
}

pub const SEARCH_FILTERS: StoreKey<SearchFilters> = StoreKey::new("search_filters");
pub const CONTACT_SETTINGS: StoreKey<ContactSettings> = StoreKey::new("contact_settings");

/// Read a typed value; `None` when the key was never set
pub fn load<T: DeserializeOwned>(
    store: &dyn StateStore,
    key: StoreKey<T>,
) -> Result<Option<T>, StoreError> {
    match store.get_raw(key.name)? {
        Some(value) => Ok(Some(serde_json::from_value(value)?)),
        None => Ok(None),
    }
}

pub fn save<T: Serialize>(
    store: &dyn StateStore,
    key: StoreKey<T>,
    value: &T,
) -> Result<(), StoreError> {
    store.set_raw(key.name, serde_json::to_value(value)?)
}

/// Process-local store, for tests and one-off runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn get_raw(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    fn set_raw(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        values.remove(key);
        Ok(())
    }
}

/// Store backed by a single JSON object on disk, rewritten on every change
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: RwLock<Map<String, Value>>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file starts empty; an unreadable
    /// one is logged and replaced on the next write.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let values = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<Map<String, Value>>(&contents) {
                Ok(values) => values,
                Err(e) => {
                    warn!("Ignoring corrupt state file {}: {}", path.display(), e);
                    Map::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(e) => return Err(e.into()),
        };

        debug!("Opened state file {} ({} keys)", path.display(), values.len());
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    fn persist(&self, values: &Map<String, Value>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(values)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

impl StateStore for JsonFileStore {
    fn get_raw(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let values = self.values.read().unwrap_or_else(|e| e.into_inner());
        Ok(values.get(key).cloned())
    }

    // The in-memory map only changes once the file write went through
    fn set_raw(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        let mut updated = values.clone();
        updated.insert(key.to_string(), value);
        self.persist(&updated)?;
        *values = updated;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut values = self.values.write().unwrap_or_else(|e| e.into_inner());
        if !values.contains_key(key) {
            return Ok(());
        }
        let mut updated = values.clone();
        updated.remove(key);
        self.persist(&updated)?;
        *values = updated;
        Ok(())
    }
}
