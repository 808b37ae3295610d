mod file;
mod memory;

use std::path::Path;

use anyhow::Result;
pub use file::FileStore;
pub use memory::MemoryStore;

use crate::domain::models::KeyValueStoreBox;

pub struct StoreManager {}

impl StoreManager {
    /// An empty path keeps everything in memory for the lifetime of the process.
    pub fn get(storage_file: &str) -> Result<KeyValueStoreBox> {
        if storage_file.is_empty() {
            tracing::info!("keeping widget state in memory");
            return Ok(Box::<MemoryStore>::default());
        }

        let store = FileStore::open(Path::new(storage_file))?;
        tracing::info!(path = %store.path().display(), "persisting widget state");

        return Ok(Box::new(store));
    }
}
