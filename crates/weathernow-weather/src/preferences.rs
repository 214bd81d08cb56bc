//! Persisted user preferences (city, state, unit) backed by a string
//! key-value medium.
//!
//! SQLite is the durable medium; an in-memory map is used when the database
//! can't be opened and in tests. Storage failures are logged and never fatal.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::StorageError;
use crate::types::{SubmittedQuery, TemperatureUnit};

pub const KEY_CITY: &str = "city";
pub const KEY_STATE: &str = "state";
pub const KEY_UNIT: &str = "degreeType";

/// A string key-value medium.
pub trait PreferenceBackend: Send {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// SQLite-backed preferences.
pub struct SqlitePreferences {
    conn: Connection,
}

impl SqlitePreferences {
    /// Open (or create) the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), StorageError> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            "#,
        )?;
        Ok(())
    }
}

impl PreferenceBackend for SqlitePreferences {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM preferences WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO preferences (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

/// In-memory preferences. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl PreferenceBackend for MemoryPreferences {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.lock().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Get/set access to persisted preferences.
pub struct PreferenceStore {
    backend: Box<dyn PreferenceBackend>,
}

impl PreferenceStore {
    pub fn new(backend: impl PreferenceBackend + 'static) -> Self {
        Self {
            backend: Box::new(backend),
        }
    }

    /// Open a SQLite-backed store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        Ok(Self::new(SqlitePreferences::open(path)?))
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryPreferences::default())
    }

    /// Stored value for `key`, or `default` when absent, empty or unreadable.
    pub fn get(&self, key: &str, default: &str) -> String {
        match self.backend.load(key) {
            Ok(Some(value)) if !value.is_empty() => value,
            Ok(_) => default.to_string(),
            Err(e) => {
                tracing::warn!("Failed to read preference '{}': {}", key, e);
                default.to_string()
            }
        }
    }

    /// Persist `value` under `key`, replacing any previous value.
    pub fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.backend.save(key, value).map_err(|e| {
            tracing::warn!("Failed to write preference '{}': {}", key, e);
            e
        })
    }
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore").finish_non_exhaustive()
    }
}

/// The user-editable input fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPreferences {
    pub city: String,
    pub state: String,
    pub unit: TemperatureUnit,
}

impl UserPreferences {
    pub fn load(store: &PreferenceStore) -> Self {
        Self {
            city: store.get(KEY_CITY, ""),
            state: store.get(KEY_STATE, ""),
            unit: TemperatureUnit::from_code(
                &store.get(KEY_UNIT, TemperatureUnit::default().code()),
            ),
        }
    }

    /// Snapshot the current fields as a submission.
    pub fn to_query(&self) -> SubmittedQuery {
        SubmittedQuery::new(self.city.clone(), self.state.clone())
    }
}
