use std::sync::Arc;

use roster_db::RedbKeyValueStore;
use roster_sync::{HttpRemoteSource, PeopleRepository};

pub type Repository = PeopleRepository<RedbKeyValueStore, HttpRemoteSource>;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<Repository>,
}

impl AppState {
    pub fn new(repository: Arc<Repository>) -> Self {
        Self { repository }
    }
}
