//! Roster Server - Axum JSON API over the people repository.

pub mod config;
pub mod routes;
pub mod state;

pub use config::Config;
pub use routes::create_router;
pub use state::{AppState, Repository};
