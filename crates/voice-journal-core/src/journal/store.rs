use crate::{CoreError, CoreResult, journal::JournalEntry, platform::KeyValueStore};

use std::panic::Location;

use error_location::ErrorLocation;
use tracing::{debug, error, info, instrument};

/// Storage key used by earlier releases of the journal.
pub const DEFAULT_JOURNAL_KEY: &str = "recordings";

/// Append-only journal kept as a single JSON array under one key.
///
/// # Concurrency
///
/// `append` is a read-modify-write over one key with no version check. Two
/// concurrent writers can lose each other's entries; callers must funnel
/// all appends through a single owner.
pub struct JournalStore<S> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> JournalStore<S> {
    /// Journal stored under [`DEFAULT_JOURNAL_KEY`].
    pub fn new(store: S) -> Self {
        Self::with_key(store, DEFAULT_JOURNAL_KEY)
    }

    /// Journal stored under a custom key.
    pub fn with_key(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    /// Storage key of this journal.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load every persisted entry in append order.
    ///
    /// An absent or blank value is an empty journal.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::PersistenceCorruption`] if the stored value is
    /// not a valid entry array.
    #[instrument(skip(self), fields(key = %self.key))]
    pub async fn load_all(&self) -> CoreResult<Vec<JournalEntry>> {
        let raw = self
            .store
            .get(&self.key)
            .await
            .map_err(|source| CoreError::PersistenceReadFailed {
                key: self.key.clone(),
                source,
                location: ErrorLocation::from(Location::caller()),
            })?;

        let Some(raw) = raw.filter(|r| !r.trim().is_empty()) else {
            debug!("No journal stored yet");
            return Ok(Vec::new());
        };

        let entries: Vec<JournalEntry> = serde_json::from_str(&raw).map_err(|source| {
            error!(error = %source, "Stored journal is corrupted");
            CoreError::PersistenceCorruption {
                key: self.key.clone(),
                source,
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        debug!(count = entries.len(), "Journal loaded");

        Ok(entries)
    }

    /// Append `entry` and write the whole journal back.
    ///
    /// Returns the number of entries after the append. A corrupted journal
    /// is never overwritten: the append is rejected instead.
    #[instrument(skip(self, entry), fields(key = %self.key, prompt_index = entry.prompt_index()))]
    pub async fn append(&self, entry: JournalEntry) -> CoreResult<usize> {
        let mut entries = self.load_all().await?;
        entries.push(entry);

        let serialized =
            serde_json::to_string(&entries).map_err(|source| CoreError::Serialization {
                source,
                location: ErrorLocation::from(Location::caller()),
            })?;

        self.store
            .set(&self.key, serialized)
            .await
            .map_err(|source| CoreError::PersistenceWriteFailed {
                key: self.key.clone(),
                source,
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(count = entries.len(), "Journal entry appended");

        Ok(entries.len())
    }
}
