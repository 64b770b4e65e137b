//! Persistent string key-value storage.
//!
//! Everything the app remembers between runs (the API key and the cached home
//! feed) lives behind [`KeyValueStore`], so the feed cache and settings logic
//! can run against an in-memory map in tests.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::StorageError;

pub trait KeyValueStore {
  fn get(&self, key: &str) -> Option<String>;

  fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

  fn remove(&mut self, key: &str) -> Result<(), StorageError>;

  /// Write several keys as one update. Implementations backed by a file
  /// persist them in a single write so readers never see half of them.
  fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
    for (key, value) in entries {
      self.set(key, value)?;
    }
    Ok(())
  }
}

/// A JSON object file of string keys to string values.
///
/// The whole map is loaded on open and rewritten (temp file + rename) on every
/// mutation.
#[derive(Debug)]
pub struct FileStore {
  path: PathBuf,
  entries: BTreeMap<String, String>,
}

impl FileStore {
  pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
    let path = path.into();
    let entries = match std::fs::read_to_string(&path) {
      Ok(content) if content.trim().is_empty() => BTreeMap::new(),
      Ok(content) => match serde_json::from_str(&content) {
        Ok(entries) => entries,
        Err(e) => {
          // Start over so `settings set-key` can still rewrite the file.
          warn!(path = %path.display(), err = %e, "storage: unreadable file, starting empty");
          BTreeMap::new()
        }
      },
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
      Err(e) => return Err(e.into()),
    };
    debug!(path = %path.display(), keys = entries.len(), "storage: opened");
    Ok(Self { path, entries })
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn persist(&self) -> Result<(), StorageError> {
    if let Some(parent) = self.path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(&self.entries)?;
    let tmp = self.path.with_extension("json.tmp");
    std::fs::write(&tmp, content)?;
    std::fs::rename(&tmp, &self.path)?;
    Ok(())
  }
}

impl KeyValueStore for FileStore {
  fn get(&self, key: &str) -> Option<String> {
    self.entries.get(key).cloned()
  }

  fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
    self.entries.insert(key.to_string(), value.to_string());
    self.persist()
  }

  fn remove(&mut self, key: &str) -> Result<(), StorageError> {
    if self.entries.remove(key).is_some() {
      self.persist()?;
    }
    Ok(())
  }

  fn set_many(&mut self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
    for (key, value) in entries {
      self.entries.insert(key.to_string(), value.to_string());
    }
    self.persist()
  }
}

/// In-memory store, used in place of the file store by tests.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
  pub entries: BTreeMap<String, String>,
}

#[cfg(test)]
impl KeyValueStore for MemoryStore {
  fn get(&self, key: &str) -> Option<String> {
    self.entries.get(key).cloned()
  }

  fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
    self.entries.insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn remove(&mut self, key: &str) -> Result<(), StorageError> {
    self.entries.remove(key);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn file_store_missing_file_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    let store = FileStore::open(dir.path().join("storage.json")).unwrap();
    assert_eq!(store.get("ytApiKey"), None);
  }

  #[test]
  fn file_store_persists_across_opens() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("storage.json");

    let mut store = FileStore::open(&path).unwrap();
    store.set("ytApiKey", "abc").unwrap();
    store.set_many(&[("ytHomeFeed", "{\"items\":[]}"), ("ytHomeFeedTime", "42")]).unwrap();

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get("ytApiKey").as_deref(), Some("abc"));
    assert_eq!(reopened.get("ytHomeFeed").as_deref(), Some("{\"items\":[]}"));
    assert_eq!(reopened.get("ytHomeFeedTime").as_deref(), Some("42"));
  }

  #[test]
  fn file_store_remove() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    let mut store = FileStore::open(&path).unwrap();
    store.set("a", "1").unwrap();
    store.remove("a").unwrap();
    // Removing a missing key is not an error.
    store.remove("a").unwrap();

    assert_eq!(FileStore::open(&path).unwrap().get("a"), None);
  }

  #[test]
  fn file_store_recovers_from_garbage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");
    std::fs::write(&path, "not json").unwrap();

    let mut store = FileStore::open(&path).unwrap();
    assert_eq!(store.get("ytApiKey"), None);
    store.set("ytApiKey", "fresh").unwrap();

    assert_eq!(FileStore::open(&path).unwrap().get("ytApiKey").as_deref(), Some("fresh"));
  }

  #[test]
  fn memory_store_set_many_uses_set() {
    let mut store = MemoryStore::default();
    store.set_many(&[("a", "1"), ("b", "2")]).unwrap();
    assert_eq!(store.get("a").as_deref(), Some("1"));
    assert_eq!(store.get("b").as_deref(), Some("2"));
  }
}
