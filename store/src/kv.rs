use crate::{StoreConfig, StoreError};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;
use tracing::debug;

/// Storage capability the core depends on.
///
/// Implementations must guarantee whole-value atomicity per key: a reader
/// observes either the previous bytes or the new bytes, never a torn write.
/// Concurrent writers are last-writer-wins.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

/// File-per-key store under a directory reachable from both the app and the
/// widget process. There is no cross-process locking; a write from one
/// process can overwrite the other's, which is accepted at this write rate.
pub struct SharedFileStore {
    dir: PathBuf,
}

impl SharedFileStore {
    pub fn new(config: StoreConfig) -> Result<Self, StoreError> {
        fs::create_dir_all(&config.dir)?;
        Ok(Self { dir: config.dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for SharedFileStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        fs::read(self.path_for(key)).ok()
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        // Write-then-rename keeps each key's value atomic for readers in the
        // other process.
        let tmp = self.dir.join(format!(".{}.tmp", key));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, self.path_for(key))?;

        debug!("Persisted {} ({} bytes)", key, value.len());

        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        match self.values.read() {
            Ok(values) => values.get(key).cloned(),
            Err(_) => None,
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.to_string(), value.to_vec());
        }
        Ok(())
    }
}
