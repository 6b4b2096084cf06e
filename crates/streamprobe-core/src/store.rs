//! Injected key-value settings store
//!
//! The harness persists exactly one value: the last stream URL the
//! user set, so a restarted session surfaces it without re-entry.
//! The store is passed in at construction rather than reached for as
//! a process-wide singleton.

use crate::{Error, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Key under which the last-used stream URL is persisted
pub const LAST_URL_KEY: &str = "last_url";

/// Minimal key-value persistence contract
pub trait SettingsStore: Send {
    /// Fetch the stored value for `key`, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Ephemeral in-memory store for tests and one-shot runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Flat JSON string map on disk, written through on every set
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

impl JsonFileStore {
    /// Open the store at `path`, loading existing values
    ///
    /// A missing file is an empty store; it is created on first set.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).unwrap_or_default(),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => {
                return Err(Error::Store {
                    key: String::new(),
                    source: err,
                })
            }
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, key: &str) -> Result<()> {
        let contents = serde_json::to_string_pretty(&self.values)
            .map_err(|err| Error::Store {
                key: key.to_string(),
                source: err.into(),
            })?;
        std::fs::write(&self.path, contents).map_err(|err| Error::Store {
            key: key.to_string(),
            source: err,
        })
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        self.persist(key)
    }
}
