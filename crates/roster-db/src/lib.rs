//! Roster DB - redb implementation of the key-value store trait.

pub mod kv_store;
pub mod tables;

pub use kv_store::RedbKeyValueStore;

use std::path::Path;
use std::sync::Arc;

use redb::Database;

use roster_core::StorageError;

/// Initialize a database with all required tables.
pub fn init_database(path: impl AsRef<Path>) -> Result<Arc<Database>, StorageError> {
    let db = Database::create(path).map_err(|e| StorageError::Database(e.to_string()))?;

    RedbKeyValueStore::init_tables(&db)?;

    Ok(Arc::new(db))
}
