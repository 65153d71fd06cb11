//! Roster Core - Person model, traits, and validation.
//!
//! This crate contains the domain types shared by the other Roster crates.
//! It has no dependencies on other Roster crates.

pub mod error;
pub mod person;
pub mod remote;
pub mod storage;
pub mod validation;

// Re-exports for convenience
pub use error::{RemoteError, RepositoryError, StorageError, ValidationError};
pub use person::{Address, Company, Person, PersonId};
pub use remote::RemoteSource;
pub use storage::KeyValueStore;
pub use validation::Validator;

#[cfg(any(test, feature = "test-utils"))]
pub use remote::memory::StaticRemoteSource;
#[cfg(any(test, feature = "test-utils"))]
pub use storage::memory::{InMemoryKeyValueStore, UnavailableKeyValueStore};
