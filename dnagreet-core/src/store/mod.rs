//! Visit store layer
//!
//! The greeting engine persists two string entries through the
//! [`KeyValueStore`] port:
//! - SQLite key-value table ([`SqliteStore`])
//! - In-process map ([`MemoryStore`])
//! - Storage turned off ([`DisabledStore`])

pub mod schema;
pub mod sqlite;

pub use sqlite::SqliteStore;

use crate::config::{StorageBackend, StorageConfig};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::Mutex;

/// Opaque get/set map that owns nothing about the values it holds.
///
/// `get` reports unreadable entries as absent; `set` surfaces failures so the
/// caller can decide to ignore them.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Store held in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store that behaves like browser storage switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledStore;

impl KeyValueStore for DisabledStore {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, key: &str, _value: &str) -> Result<()> {
        Err(Error::StoreUnavailable(format!(
            "storage is disabled, cannot write {}",
            key
        )))
    }
}

/// Open the store selected by configuration.
///
/// A SQLite database that cannot be opened degrades to [`DisabledStore`] so
/// the greeting still renders as a first visit.
pub fn open_configured(config: &StorageConfig) -> Box<dyn KeyValueStore> {
    match config.backend {
        StorageBackend::Memory => Box::new(MemoryStore::new()),
        StorageBackend::Disabled => Box::new(DisabledStore),
        StorageBackend::Sqlite => {
            let path = config.database_path();
            match SqliteStore::open(&path).and_then(|store| store.migrate().map(|_| store)) {
                Ok(store) => {
                    tracing::debug!(path = %path.display(), "Opened visit store");
                    Box::new(store)
                }
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Visit store unavailable, treating visit as new"
                    );
                    Box::new(DisabledStore)
                }
            }
        }
    }
}
