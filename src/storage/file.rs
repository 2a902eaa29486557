use async_trait::async_trait;
use log::error;
use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use tokio::sync::Mutex;
use crate::storage::KeyValueStore;

/// JSON-file backend: a single object mapping keys to string values, read
/// fully at open and rewritten in full on every `set`.
pub struct FileStore {
    path: PathBuf,
    map: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Opens the store at `path`. A missing file means an empty store; a
    /// malformed file is logged and also treated as empty so a corrupted
    /// storage file never prevents a session from starting.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let map = match fs::read_to_string(&path) {
            Ok(raw) =>
                match serde_json::from_str::<HashMap<String, String>>(&raw) {
                    Ok(map) => map,
                    Err(e) => {
                        error!("Error loading storage file {}: {}", path.display(), e);
                        HashMap::new()
                    }
                }
            Err(_) => HashMap::new(),
        };
        Self { path, map: Mutex::new(map) }
    }
}

#[async_trait]
impl KeyValueStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Box<dyn Error + Send + Sync>> {
        let map = self.map.lock().await;
        Ok(map.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), Box<dyn Error + Send + Sync>> {
        let mut map = self.map.lock().await;
        map.insert(key.to_string(), value.to_string());
        let serialized = serde_json::to_string_pretty(&*map)?;
        tokio::fs::write(&self.path, serialized).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get_round_trips_through_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");

        let store = FileStore::open(&path);
        store.set("darkMode", "true").await.unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("darkMode").await.unwrap().as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn malformed_file_opens_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get("darkMode").await.unwrap(), None);
    }

    #[tokio::test]
    async fn missing_file_opens_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("absent.json"));
        assert_eq!(store.get("anything").await.unwrap(), None);
    }
}
