use thiserror::Error;

use crate::person::PersonId;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Failures reported by a remote source.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteError {
    #[error("Person not found upstream: {0}")]
    NotFound(PersonId),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures surfaced by the data facade to its callers.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RepositoryError {
    #[error("Person not found: {0}")]
    NotFound(PersonId),

    #[error("Network error: {0}")]
    Network(String),

    #[error("No identifiers left to assign")]
    IdSpaceExhausted,
}

impl From<RemoteError> for RepositoryError {
    fn from(e: RemoteError) -> Self {
        match e {
            RemoteError::NotFound(id) => RepositoryError::NotFound(id),
            RemoteError::Network(msg) => RepositoryError::Network(msg),
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ValidationError {
    #[error("Name is required")]
    NameRequired,

    #[error("Email is required")]
    EmailRequired,

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),
}
