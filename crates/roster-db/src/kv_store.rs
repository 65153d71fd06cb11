use std::sync::Arc;

use redb::Database;

use roster_core::{KeyValueStore, StorageError};

use crate::tables::BLOBS_TABLE;

/// redb implementation of KeyValueStore.
pub struct RedbKeyValueStore {
    db: Arc<Database>,
}

impl RedbKeyValueStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Initialize the database tables.
    pub fn init_tables(db: &Database) -> Result<(), StorageError> {
        let write_txn = db
            .begin_write()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        {
            let _ = write_txn
                .open_table(BLOBS_TABLE)
                .map_err(|e| StorageError::Database(e.to_string()))?;
        }
        write_txn
            .commit()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        Ok(())
    }
}

impl KeyValueStore for RedbKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| StorageError::Database(e.to_string()))?;

        let table = read_txn
            .open_table(BLOBS_TABLE)
            .map_err(|e| StorageError::Database(e.to_string()))?;

        let value = table
            .get(key)
            .map_err(|e| StorageError::Database(e.to_string()))?
            .map(|v| v.value().to_vec());

        Ok(value)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| StorageError::Database(e.to_string()))?;

        {
            let mut table = write_txn
                .open_table(BLOBS_TABLE)
                .map_err(|e| StorageError::Database(e.to_string()))?;

            table
                .insert(key, value)
                .map_err(|e| StorageError::Database(e.to_string()))?;
        }

        // Readers see the old blob until this commit lands
        write_txn
            .commit()
            .map_err(|e| StorageError::Database(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::Person;
    use tempfile::{tempdir, TempDir};

    fn create_test_db() -> (TempDir, Arc<Database>) {
        let dir = tempdir().unwrap();
        let db = Database::create(dir.path().join("test.redb")).unwrap();
        RedbKeyValueStore::init_tables(&db).unwrap();
        (dir, Arc::new(db))
    }

    #[test]
    fn test_get_missing_key() {
        let (_dir, db) = create_test_db();
        let store = RedbKeyValueStore::new(db);

        assert!(store.get("people_data").unwrap().is_none());
    }

    #[test]
    fn test_put_and_get() {
        let (_dir, db) = create_test_db();
        let store = RedbKeyValueStore::new(db);

        let people = vec![Person::new("Ann", "a@x.com").with_id(1)];
        let blob = serde_json::to_vec(&people).unwrap();
        store.put("people_data", &blob).unwrap();

        let stored = store.get("people_data").unwrap().unwrap();
        let decoded: Vec<Person> = serde_json::from_slice(&stored).unwrap();
        assert_eq!(decoded, people);
    }

    #[test]
    fn test_put_overwrites_whole_value() {
        let (_dir, db) = create_test_db();
        let store = RedbKeyValueStore::new(db);

        store.put("people_data", b"[1,2,3,4,5,6,7,8]").unwrap();
        store.put("people_data", b"[]").unwrap();

        assert_eq!(store.get("people_data").unwrap().unwrap(), b"[]");
    }

    #[test]
    fn test_keys_are_independent() {
        let (_dir, db) = create_test_db();
        let store = RedbKeyValueStore::new(db);

        store.put("a", b"one").unwrap();
        store.put("b", b"two").unwrap();

        assert_eq!(store.get("a").unwrap().unwrap(), b"one");
        assert_eq!(store.get("b").unwrap().unwrap(), b"two");
    }

    #[test]
    fn test_value_survives_reopen() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.redb");

        {
            let db = Database::create(&path).unwrap();
            RedbKeyValueStore::init_tables(&db).unwrap();
            let store = RedbKeyValueStore::new(Arc::new(db));
            store.put("people_data", b"[]").unwrap();
        }

        let db = Database::create(&path).unwrap();
        let store = RedbKeyValueStore::new(Arc::new(db));
        assert_eq!(store.get("people_data").unwrap().unwrap(), b"[]");
    }
}
