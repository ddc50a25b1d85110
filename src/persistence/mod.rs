//! Key-value persistence collaborator
//!
//! The game never touches storage ambiently: a [`Store`] is injected into the
//! orchestrator and every read/write goes through one fixed key.
//!
//! Backends:
//! - `MemoryStore`: in-process map (tests, headless runs)
//! - `FileStore`: one JSON file per key (native)
//! - `LocalStorage`: browser LocalStorage (wasm32)

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode stored value: {0}")]
    Json(#[from] serde_json::Error),
    #[error("storage backend unavailable")]
    Unavailable,
}

/// A flat string key-value store
pub trait Store {
    /// Read the raw value under `key`, `None` when nothing is stored
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replace the value under `key`
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stores each key as `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Store for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        // Write then rename over the old value
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        std::fs::write(&tmp, value)?;
        std::fs::rename(&tmp, self.path_for(key))?;
        Ok(())
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn storage() -> Result<web_sys::Storage, StoreError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or(StoreError::Unavailable)
    }
}

#[cfg(target_arch = "wasm32")]
impl Store for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Self::storage()?
            .get_item(key)
            .map_err(|_| StoreError::Unavailable)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|_| StoreError::Unavailable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_read_write() {
        let mut store = MemoryStore::new();
        assert!(store.read("k").unwrap().is_none());

        store.write("k", "[1,2]").unwrap();
        assert_eq!(store.read("k").unwrap().as_deref(), Some("[1,2]"));

        store.write("k", "[]").unwrap();
        assert_eq!(store.read("k").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_store_missing_key_is_none() {
        let dir = std::env::temp_dir().join(format!("meidoufu-store-{}", std::process::id()));
        let mut store = FileStore::new(&dir);
        assert!(store.read("absent").unwrap().is_none());

        store.write("present", "{\"a\":1}").unwrap();
        assert_eq!(store.read("present").unwrap().as_deref(), Some("{\"a\":1}"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
