//! Roster Sync - Local-first data facade with remote seed and change feed.

pub mod cache;
pub mod collection;
pub mod remote;
pub mod repository;

pub use cache::{Snapshot, SnapshotCache, Subscription};
pub use collection::{PeopleStore, DEFAULT_STORAGE_KEY};
pub use remote::HttpRemoteSource;
pub use repository::{InitOutcome, PeopleRepository};
