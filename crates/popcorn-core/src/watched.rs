use anyhow::Result;
use popcorn_models::{WatchedEntry, WatchedSummary};
use std::sync::Arc;
use tracing::info;

use crate::persisted::PersistedState;
use crate::stats;
use crate::storage::KeyValueStorage;

/// The user's watched movies, persisted under one storage key.
///
/// Every mutation builds a new list and replaces the old one. Uniqueness by
/// id is left to the caller (see `Session::add_watched`).
pub struct WatchedList {
    state: PersistedState<Vec<WatchedEntry>>,
}

impl WatchedList {
    pub fn load(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        let state = PersistedState::load(storage, key, Vec::new());
        info!(key = state.key(), entries = state.get().len(), "Loaded watched list");
        Self { state }
    }

    pub fn entries(&self) -> &[WatchedEntry] {
        self.state.get()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    pub fn get(&self, imdb_id: &str) -> Option<&WatchedEntry> {
        self.entries().iter().find(|e| e.imdb_id == imdb_id)
    }

    pub fn contains(&self, imdb_id: &str) -> bool {
        self.get(imdb_id).is_some()
    }

    pub fn user_rating_for(&self, imdb_id: &str) -> Option<u8> {
        self.get(imdb_id).map(|e| e.user_rating)
    }

    pub fn add(&mut self, entry: WatchedEntry) -> Result<()> {
        info!(imdb_id = %entry.imdb_id, user_rating = entry.user_rating, "Adding to watched list");
        self.state.update(|watched| {
            let mut next = watched.clone();
            next.push(entry);
            next
        })
    }

    /// Drop every entry with `imdb_id`. Returns whether anything was removed.
    pub fn remove(&mut self, imdb_id: &str) -> Result<bool> {
        let before = self.len();
        self.state.update(|watched| {
            watched
                .iter()
                .filter(|e| e.imdb_id != imdb_id)
                .cloned()
                .collect()
        })?;
        let removed = self.len() != before;
        if removed {
            info!(imdb_id = imdb_id, "Removed from watched list");
        }
        Ok(removed)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.state.set(Vec::new())
    }

    pub fn summary(&self) -> WatchedSummary {
        stats::summarize(self.entries())
    }
}
