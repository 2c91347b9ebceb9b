pub mod filter_state;

use crate::error::DashboardResult;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use log::warn;

pub use filter_state::*;

/// String key-value persistence.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> DashboardResult<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> DashboardResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Flat JSON object on disk, rewritten on every `set`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileStore {
    pub fn open<P: AsRef<Path>>(path: P) -> DashboardResult<Self> {
        let path = path.as_ref().to_path_buf();

        // An unreadable or corrupted store starts over empty
        let entries: BTreeMap<String, String> = if !path.exists() {
            BTreeMap::new()
        } else {
            match std::fs::read_to_string(&path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                    warn!("Ignoring corrupted filter store {:?}: {}", path, e);
                    BTreeMap::new()
                }),
                Err(e) => {
                    warn!("Ignoring unreadable filter store {:?}: {}", path, e);
                    BTreeMap::new()
                },
            }
        };

        Ok(Self { path, entries })
    }

    fn save(&self) -> DashboardResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> DashboardResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("a"), None);
        store.set("a", "1").unwrap();
        assert_eq!(store.get("a"), Some("1".to_string()));
    }

    #[test]
    fn test_json_file_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("filters.json");

        let mut store = JsonFileStore::open(&path).unwrap();
        store.set("patient", "\"P002\"").unwrap();

        let reopened = JsonFileStore::open(&path).unwrap();
        assert_eq!(reopened.get("patient"), Some("\"P002\"".to_string()));
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("filters.json");
        std::fs::write(&path, "not json at all").unwrap();

        let store = JsonFileStore::open(&path).unwrap();
        assert_eq!(store.get("patient"), None);
    }

    #[test]
    fn test_unreadable_path_loads_empty() {
        let dir = tempfile::tempdir().unwrap();

        let mut store = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(store.get("patient"), None);
        // writing over a directory still reports the failure
        assert!(store.set("patient", "\"P001\"").is_err());
    }
}
