mod file;
mod memory;

use async_trait::async_trait;
use log::info;
use std::error::Error;
use std::sync::Arc;
use crate::cli::Args;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Local key-value store holding the persisted conversation history and the
/// theme preference. Values are opaque strings; every `set` rewrites the
/// stored value in full.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, Box<dyn Error + Send + Sync>>;

    async fn set(&self, key: &str, value: &str) -> Result<(), Box<dyn Error + Send + Sync>>;
}

pub fn create_storage(args: &Args) -> Result<Arc<dyn KeyValueStore>, Box<dyn Error + Send + Sync>> {
    match args.storage_type.to_lowercase().as_str() {
        "file" => {
            let store = file::FileStore::open(&args.storage_path);
            Ok(Arc::new(store))
        }
        "memory" => Ok(Arc::new(memory::MemoryStore::new())),
        _ =>
            Err(
                Box::new(
                    std::io::Error::new(
                        std::io::ErrorKind::InvalidInput,
                        format!("Unsupported storage type: {}", args.storage_type)
                    )
                )
            ),
    }
}

pub fn initialize_storage(
    args: &Args
) -> Result<Arc<dyn KeyValueStore>, Box<dyn Error + Send + Sync>> {
    info!("Preferences and history will be stored in: {} at {}", args.storage_type, args.storage_path);
    create_storage(args)
}
