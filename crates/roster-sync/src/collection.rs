use std::sync::Arc;

use roster_core::{KeyValueStore, Person, StorageError};

/// Key the collection is stored under unless configured otherwise.
pub const DEFAULT_STORAGE_KEY: &str = "people_data";

/// Whole-collection adapter over a key-value byte store.
///
/// The collection lives as one JSON array under a single key. Faults never
/// leave this type: a missing, unreadable or malformed blob loads as an empty
/// collection, and a failed save is logged and dropped.
pub struct PeopleStore<K: KeyValueStore> {
    backend: Arc<K>,
    key: String,
}

impl<K: KeyValueStore> PeopleStore<K> {
    pub fn new(backend: Arc<K>) -> Self {
        Self::with_key(backend, DEFAULT_STORAGE_KEY)
    }

    pub fn with_key(backend: Arc<K>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Load the full collection, degrading to empty on any fault.
    pub fn load(&self) -> Vec<Person> {
        match self.try_load() {
            Ok(people) => people,
            Err(e) => {
                tracing::warn!(key = %self.key, "Failed to read stored people, using empty collection: {}", e);
                Vec::new()
            }
        }
    }

    /// Overwrite the stored collection. Failures are logged, not returned.
    pub fn save(&self, people: &[Person]) {
        if let Err(e) = self.try_save(people) {
            tracing::error!(key = %self.key, count = people.len(), "Failed to save people: {}", e);
        }
    }

    fn try_load(&self) -> Result<Vec<Person>, StorageError> {
        match self.backend.get(&self.key)? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| StorageError::Serialization(e.to_string())),
            None => Ok(Vec::new()),
        }
    }

    fn try_save(&self, people: &[Person]) -> Result<(), StorageError> {
        let blob =
            serde_json::to_vec(people).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.backend.put(&self.key, &blob)
    }
}
