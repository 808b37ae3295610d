use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::anyhow;
use anyhow::Context;
use anyhow::Result;

use crate::domain::models::KeyValueStore;

#[cfg(test)]
#[path = "file_test.rs"]
mod tests;

type Entries = BTreeMap<String, String>;

/// Store backed by a single JSON object file, replaced on every mutation by
/// writing a sibling temp file and renaming it over the original.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<Entries>,
}

impl FileStore {
    /// Loads existing entries. A missing or unreadable file starts empty.
    pub fn open(path: &Path) -> Result<FileStore> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let entries = match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str::<Entries>(&contents).unwrap_or_else(|err| {
                tracing::warn!(path = %path.display(), error = ?err, "discarding malformed storage file");
                Entries::new()
            }),
            Err(_) => Entries::new(),
        };

        return Ok(FileStore {
            path: path.to_path_buf(),
            entries: Mutex::new(entries),
        });
    }

    pub fn path(&self) -> &Path {
        return &self.path;
    }

    fn mutate<F>(&self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Entries),
    {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("Storage lock poisoned"))?;
        f(&mut entries);

        let json = serde_json::to_string_pretty(&*entries)?;
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        return Ok(());
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("Storage lock poisoned"))?;
        return Ok(entries.get(key).cloned());
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        return self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        });
    }

    fn remove(&self, key: &str) -> Result<()> {
        return self.mutate(|entries| {
            entries.remove(key);
        });
    }
}
