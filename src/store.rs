//! Key-value persistence standing in for browser local storage.

use async_trait::async_trait;
use log::warn;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use crate::error::CocktailError;

/// Minimal persisted key-value store
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Stored value for `key`, `None` when absent or unreadable
    async fn get(&self, key: &str) -> Option<Value>;

    async fn set(&self, key: &str, value: Value) -> Result<(), CocktailError>;
}

/// In-process store, used by tests and as a fallback when no file is wanted
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Option<Value> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(key)
            .cloned()
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), CocktailError> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(key.to_string(), value);
        Ok(())
    }
}

/// Store persisted as one JSON object in a file
///
/// The file is read on every access and rewritten on every `set`; there is no
/// locking between processes.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    async fn read_all(&self) -> Result<Map<String, Value>, CocktailError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(e) => return Err(e.into()),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str::<Value>(&content)? {
            Value::Object(map) => Ok(map),
            _ => Err(CocktailError::MalformedPayload(format!(
                "{} does not hold a JSON object",
                self.path.display()
            ))),
        }
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Option<Value> {
        match self.read_all().await {
            Ok(mut entries) => entries.remove(key),
            Err(e) => {
                warn!("Ignoring unreadable cache {}: {}", self.path.display(), e);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), CocktailError> {
        // a corrupt file is replaced rather than blocking every later write
        let mut entries = self.read_all().await.unwrap_or_default();
        entries.insert(key.to_string(), value);
        let content = serde_json::to_string_pretty(&Value::Object(entries))?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "cocktail-finder-{}-{}.json",
            name,
            std::process::id()
        ))
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert!(store.get("missing").await.is_none());

        store.set("key", json!({"a": 1})).await.unwrap();
        assert_eq!(store.get("key").await, Some(json!({"a": 1})));

        store.set("key", json!("replaced")).await.unwrap();
        assert_eq!(store.get("key").await, Some(json!("replaced")));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_file_store_persists_between_instances() {
        let path = temp_path("persist");
        let _ = std::fs::remove_file(&path);

        let store = FileStore::new(&path);
        assert!(store.get("date").await.is_none());
        store.set("date", json!("2024-05-01")).await.unwrap();
        store.set("other", json!(3)).await.unwrap();

        let reopened = FileStore::new(&path);
        assert_eq!(reopened.get("date").await, Some(json!("2024-05-01")));
        assert_eq!(reopened.get("other").await, Some(json!(3)));

        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_file_store_recovers_from_corrupt_file() {
        let path = temp_path("corrupt");
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::new(&path);
        assert!(store.get("date").await.is_none());
        store.set("date", json!("2024-05-01")).await.unwrap();
        assert_eq!(store.get("date").await, Some(json!("2024-05-01")));

        let _ = std::fs::remove_file(&path);
    }
}
