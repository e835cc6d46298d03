/*!
 * Key-value persistence for settings, translations, contexts and routines.
 *
 * This module provides:
 * - The `KeyValueStore` trait implemented by concrete backends
 * - `SqliteStore`, the on-disk backend
 * - `MemoryStore`, a process-local backend used by tests
 * - The `Storage` facade, which serializes values to JSON and converts
 *   every backend failure into a logged `false` or default value
 */

use log::error;
use rand::Rng;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::errors::StoreError;

pub mod memory;
pub mod schema;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Fixed keys, one per persisted collection
pub mod keys {
    pub const SETTINGS: &str = "translationSettings";
    pub const HISTORY: &str = "historyTranslations";
    pub const SAVED: &str = "savedTranslations";
    pub const USER_CONTEXTS: &str = "userContexts";
    pub const ROUTINES: &str = "routines";
    pub const THEME: &str = "theme";
    pub const SETUP_COMPLETED: &str = "setup_completed";
}

/// Raw string-valued key-value backend
pub trait KeyValueStore: Send + Sync {
    /// Store `value` under `key`, replacing any previous value
    fn put(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Fetch the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Delete `key`; deleting a missing key is not an error
    fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Whether `key` holds a value
    fn contains(&self, key: &str) -> Result<bool, StoreError>;

    /// Delete every key
    fn clear_all(&self) -> Result<(), StoreError>;
}

/// JSON facade over a `KeyValueStore`
///
/// Cloning is cheap; clones share the same backend.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn KeyValueStore>,
}

impl Storage {
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Storage backed by a fresh in-memory store
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    /// Serialize `value` and store it under `key`
    pub fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                error!("Error saving to storage ({}): {}", key, e);
                return false;
            }
        };

        match self.backend.put(key, &json) {
            Ok(()) => true,
            Err(e) => {
                error!("Error saving to storage ({}): {}", key, e);
                false
            }
        }
    }

    /// Load the value under `key`, or `None` when absent or unreadable
    pub fn load_opt<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = match self.backend.get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                error!("Error loading from storage ({}): {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                error!("Error loading from storage ({}): {}", key, e);
                None
            }
        }
    }

    /// Load the value under `key`, or `default` when absent or unreadable
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.load_opt(key).unwrap_or(default)
    }

    pub fn remove(&self, key: &str) -> bool {
        match self.backend.delete(key) {
            Ok(()) => true,
            Err(e) => {
                error!("Error removing from storage ({}): {}", key, e);
                false
            }
        }
    }

    pub fn exists(&self, key: &str) -> bool {
        self.backend.contains(key).unwrap_or_else(|e| {
            error!("Error checking storage ({}): {}", key, e);
            false
        })
    }

    pub fn clear(&self) -> bool {
        match self.backend.clear_all() {
            Ok(()) => true,
            Err(e) => {
                error!("Error clearing storage: {}", e);
                false
            }
        }
    }

    /// Generate a unique identifier for a new entity
    pub fn generate_id(&self) -> String {
        generate_id()
    }
}

/// Base-36 millisecond clock followed by a base-36 random suffix
pub fn generate_id() -> String {
    let millis = chrono::Utc::now().timestamp_millis().max(0) as u64;
    let suffix: u64 = rand::rng().random();
    format!("{}{}", to_base36(millis), to_base36(suffix))
}

fn to_base36(mut value: u64) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    if value == 0 {
        return "0".to_string();
    }

    let mut buf = Vec::new();
    while value > 0 {
        buf.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    buf.reverse();
    String::from_utf8(buf).unwrap_or_default()
}
