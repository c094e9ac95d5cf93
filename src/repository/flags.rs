//! Durable boolean flags surviving restarts (e.g. `formSubmitted`).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::repository::errors::{RepositoryError, RepositoryResult};

/// Key/value flag storage. A missing or unreadable key reads as `false`.
pub trait FlagStore: Send + Sync {
    fn get(&self, key: &str) -> bool;
    fn set(&self, key: &str, value: bool) -> RepositoryResult<()>;
}

fn poisoned() -> RepositoryError {
    RepositoryError::Storage("flag store lock poisoned".to_string())
}

/// Process-local store, lost on exit.
#[derive(Debug, Default)]
pub struct MemoryFlagStore {
    flags: Mutex<BTreeMap<String, bool>>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flag(key: &str, value: bool) -> Self {
        let store = Self::default();
        if let Ok(mut flags) = store.flags.lock() {
            flags.insert(key.to_string(), value);
        }
        store
    }
}

impl FlagStore for MemoryFlagStore {
    fn get(&self, key: &str) -> bool {
        self.flags
            .lock()
            .map(|flags| flags.get(key).copied().unwrap_or(false))
            .unwrap_or(false)
    }

    fn set(&self, key: &str, value: bool) -> RepositoryResult<()> {
        self.flags
            .lock()
            .map_err(|_| poisoned())?
            .insert(key.to_string(), value);
        Ok(())
    }
}

/// Flags kept as a JSON object in a single file, written through on every
/// change.
#[derive(Debug)]
pub struct FileFlagStore {
    path: PathBuf,
    flags: Mutex<BTreeMap<String, bool>>,
}

impl FileFlagStore {
    /// Opens the store at `path`. A missing or corrupt file starts empty.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let flags = Self::read_file(&path).unwrap_or_default();
        Self {
            path,
            flags: Mutex::new(flags),
        }
    }

    /// Parses the file, `None` when it is missing or unreadable.
    fn read_file(path: &Path) -> Option<BTreeMap<String, bool>> {
        let raw = fs::read_to_string(path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(flags) => Some(flags),
            Err(e) => {
                log::warn!("Ignoring unreadable flag file {}: {e}", path.display());
                None
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FlagStore for FileFlagStore {
    /// Reads through to the file so writes from other stores on the same
    /// path are seen. Falls back to the last known values if the file
    /// cannot be read.
    fn get(&self, key: &str) -> bool {
        let Ok(mut flags) = self.flags.lock() else {
            return false;
        };
        if let Some(on_disk) = Self::read_file(&self.path) {
            *flags = on_disk;
        }
        flags.get(key).copied().unwrap_or(false)
    }

    fn set(&self, key: &str, value: bool) -> RepositoryResult<()> {
        let mut flags = self.flags.lock().map_err(|_| poisoned())?;
        if let Some(on_disk) = Self::read_file(&self.path) {
            *flags = on_disk;
        }
        flags.insert(key.to_string(), value);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(&*flags)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_defaults_to_false() {
        let store = MemoryFlagStore::new();
        assert!(!store.get("formSubmitted"));
        store.set("formSubmitted", true).unwrap();
        assert!(store.get("formSubmitted"));
    }

    #[test]
    fn with_flag_presets_value() {
        assert!(MemoryFlagStore::with_flag("formSubmitted", true).get("formSubmitted"));
    }
}
