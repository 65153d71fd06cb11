use crate::error::RemoteError;
use crate::person::{Person, PersonId};

/// Read-only source of people living somewhere else.
///
/// Only used to seed an empty local store and to resolve lookups that miss it.
/// Nothing is ever written back.
pub trait RemoteSource: Send + Sync {
    /// Fetch the whole upstream collection.
    fn fetch_all(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Person>, RemoteError>> + Send;

    /// Fetch a single person. Fails with `RemoteError::NotFound` if upstream has no such id.
    fn fetch_one(
        &self,
        id: PersonId,
    ) -> impl std::future::Future<Output = Result<Person, RemoteError>> + Send;
}

// Scripted remote for testing
#[cfg(any(test, feature = "test-utils"))]
pub mod memory {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Remote source serving a fixed collection, or failing every call.
    pub struct StaticRemoteSource {
        people: Vec<Person>,
        failure: Option<String>,
        fetch_all_calls: AtomicUsize,
        fetch_one_calls: AtomicUsize,
    }

    impl StaticRemoteSource {
        pub fn new(people: Vec<Person>) -> Self {
            Self {
                people,
                failure: None,
                fetch_all_calls: AtomicUsize::new(0),
                fetch_one_calls: AtomicUsize::new(0),
            }
        }

        pub fn empty() -> Self {
            Self::new(Vec::new())
        }

        /// A source whose transport always fails.
        pub fn unreachable() -> Self {
            Self {
                failure: Some("connection refused".to_string()),
                ..Self::empty()
            }
        }

        pub fn fetch_all_calls(&self) -> usize {
            self.fetch_all_calls.load(Ordering::SeqCst)
        }

        pub fn fetch_one_calls(&self) -> usize {
            self.fetch_one_calls.load(Ordering::SeqCst)
        }
    }

    impl RemoteSource for StaticRemoteSource {
        async fn fetch_all(&self) -> Result<Vec<Person>, RemoteError> {
            self.fetch_all_calls.fetch_add(1, Ordering::SeqCst);
            match &self.failure {
                Some(msg) => Err(RemoteError::Network(msg.clone())),
                None => Ok(self.people.clone()),
            }
        }

        async fn fetch_one(&self, id: PersonId) -> Result<Person, RemoteError> {
            self.fetch_one_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(msg) = &self.failure {
                return Err(RemoteError::Network(msg.clone()));
            }
            self.people
                .iter()
                .find(|p| p.id == id)
                .cloned()
                .ok_or(RemoteError::NotFound(id))
        }
    }
}
