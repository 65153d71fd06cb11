pub mod events;
pub mod health;
pub mod people;

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(people::routes())
        .merge(events::routes())
        .merge(health::routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
