//! Key/value local storage
//!
//! Mirrors browser `localStorage`: string keys to string values. A storage
//! opened from a file writes every change back to it as a JSON object.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::common::{paths, Error, Result};

/// String key/value store, optionally persisted to a JSON file
#[derive(Debug, Default)]
pub struct LocalStorage {
    items: BTreeMap<String, String>,
    path: Option<PathBuf>,
}

impl LocalStorage {
    /// Storage that lives only as long as this value
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open file-backed storage, starting empty if the file does not exist
    pub fn open(path: &Path) -> Result<Self> {
        let items = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
                path: path.display().to_string(),
                error: e.to_string(),
            })?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = %path.display(), keys = items.len(), "Opened local storage");

        Ok(Self {
            items,
            path: Some(path.to_path_buf()),
        })
    }

    /// Value stored under `key`
    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    /// Store `value` under `key`, replacing any previous value
    pub fn set_item(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        self.items.insert(key.to_string(), value.into());
        self.persist()
    }

    /// Remove `key`; removing a missing key is not an error
    pub fn remove_item(&mut self, key: &str) -> Result<()> {
        if self.items.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }

    fn persist(&self) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        paths::ensure_parent_dir(path)?;
        let json = serde_json::to_string_pretty(&self.items)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_roundtrip() {
        let mut storage = LocalStorage::in_memory();
        assert!(storage.get_item("user").is_none());

        storage.set_item("user", "{\"type\":\"Employee\"}").unwrap();
        assert_eq!(storage.get_item("user"), Some("{\"type\":\"Employee\"}"));

        storage.remove_item("user").unwrap();
        assert!(storage.get_item("user").is_none());
        storage.remove_item("user").unwrap();
    }

    #[test]
    fn test_file_backed_survives_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested").join("local_storage.json");

        let mut storage = LocalStorage::open(&path).unwrap();
        storage.set_item("jwt", "token").unwrap();
        drop(storage);

        let storage = LocalStorage::open(&path).unwrap();
        assert_eq!(storage.get_item("jwt"), Some("token"));
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("local_storage.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(LocalStorage::open(&path), Err(Error::Json(_))));
    }
}
