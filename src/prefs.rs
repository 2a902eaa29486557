use log::warn;
use std::error::Error;
use crate::storage::KeyValueStore;

/// Reads the persisted dark-mode flag. Missing or unrecognized values fall
/// back to light mode.
pub async fn load_dark_mode(store: &dyn KeyValueStore, key: &str) -> bool {
    match store.get(key).await {
        Ok(Some(value)) =>
            match value.as_str() {
                "true" => true,
                "false" => false,
                other => {
                    warn!("Unrecognized theme preference '{}', defaulting to light", other);
                    false
                }
            }
        Ok(None) => false,
        Err(e) => {
            warn!("Failed to read theme preference: {}", e);
            false
        }
    }
}

pub async fn save_dark_mode(
    store: &dyn KeyValueStore,
    key: &str,
    enabled: bool
) -> Result<(), Box<dyn Error + Send + Sync>> {
    store.set(key, if enabled { "true" } else { "false" }).await
}
