use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::storage::KeyValueStorage;

/// A value mirrored into key-value storage.
///
/// The value is read once when the state is loaded; afterwards every update
/// replaces it in memory and writes the serialized form back under the same
/// key. There is no locking across processes, the last writer wins.
pub struct PersistedState<T> {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
    value: T,
}

impl<T> PersistedState<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Read `key`, falling back to `default` when it is absent or unreadable.
    pub fn load(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>, default: T) -> Self {
        let key = key.into();
        let value = match storage.get(&key) {
            Ok(Some(text)) => match serde_json::from_str::<T>(&text) {
                Ok(value) => {
                    debug!(key = %key, "Loaded persisted state");
                    value
                }
                Err(e) => {
                    warn!(key = %key, error = %e, "Stored value is unreadable, using default");
                    default
                }
            },
            Ok(None) => default,
            Err(e) => {
                warn!(key = %key, error = %e, "Failed to read storage, using default");
                default
            }
        };

        Self { storage, key, value }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Replace the value and write it back.
    ///
    /// The in-memory value is replaced even when the write fails, so reads in
    /// this session stay consistent with what the caller asked for.
    pub fn set(&mut self, value: T) -> Result<()> {
        self.value = value;
        self.write_back()
    }

    /// Derive the next value from the current one.
    pub fn update<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&T) -> T,
    {
        let next = f(&self.value);
        self.set(next)
    }

    fn write_back(&self) -> Result<()> {
        let text = serde_json::to_string(&self.value)?;
        self.storage.set(&self.key, &text)
    }
}
