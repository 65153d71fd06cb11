use crate::error::StorageError;

/// Durable key-value byte store.
///
/// Implementations must make `put` atomic: a reader in the same process sees
/// either the previous value or the new one, never a partial write.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`. Returns Ok(None) if the key is absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Overwrite the value stored under `key`.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;
}

// In-memory implementations for testing
#[cfg(any(test, feature = "test-utils"))]
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::RwLock;

    /// In-memory key-value store for testing.
    #[derive(Default)]
    pub struct InMemoryKeyValueStore {
        values: RwLock<HashMap<String, Vec<u8>>>,
        writes: AtomicUsize,
    }

    impl InMemoryKeyValueStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Number of successful `put` calls so far.
        pub fn write_count(&self) -> usize {
            self.writes.load(Ordering::SeqCst)
        }
    }

    impl KeyValueStore for InMemoryKeyValueStore {
        fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
            Ok(self.values.read().unwrap().get(key).cloned())
        }

        fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
            self.values
                .write()
                .unwrap()
                .insert(key.to_string(), value.to_vec());
            self.writes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Store whose backend is gone: every call fails.
    #[derive(Default)]
    pub struct UnavailableKeyValueStore;

    impl KeyValueStore for UnavailableKeyValueStore {
        fn get(&self, _key: &str) -> Result<Option<Vec<u8>>, StorageError> {
            Err(StorageError::Database("storage unavailable".to_string()))
        }

        fn put(&self, _key: &str, _value: &[u8]) -> Result<(), StorageError> {
            Err(StorageError::Database("storage unavailable".to_string()))
        }
    }

}
