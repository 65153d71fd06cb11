use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use roster_core::{Person, PersonId, RepositoryError, Validator};

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/people", get(list_people).post(create_person))
        .route(
            "/api/people/{id}",
            get(get_person).put(update_person).delete(delete_person),
        )
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, error: impl ToString) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

fn repository_error(e: RepositoryError) -> Response {
    let status = match e {
        RepositoryError::NotFound(_) => StatusCode::NOT_FOUND,
        RepositoryError::Network(_) => StatusCode::BAD_GATEWAY,
        RepositoryError::IdSpaceExhausted => StatusCode::INSUFFICIENT_STORAGE,
    };
    error_response(status, e)
}

/// GET /api/people - The whole collection.
async fn list_people(State(state): State<AppState>) -> Json<Vec<Person>> {
    Json(state.repository.list_all())
}

/// GET /api/people/{id} - One person, falling back to the remote source.
async fn get_person(State(state): State<AppState>, Path(id): Path<PersonId>) -> Response {
    match state.repository.get_by_id(id).await {
        Ok(person) => Json(person).into_response(),
        Err(e) => repository_error(e),
    }
}

/// POST /api/people - Create a person; any id in the body is ignored.
async fn create_person(State(state): State<AppState>, Json(person): Json<Person>) -> Response {
    if let Err(e) = Validator::validate_person(&person) {
        return error_response(StatusCode::BAD_REQUEST, e);
    }

    match state.repository.create(person) {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => {
            tracing::error!("Failed to create person: {}", e);
            repository_error(e)
        }
    }
}

/// PUT /api/people/{id} - Replace a person, keeping the id from the path.
async fn update_person(
    State(state): State<AppState>,
    Path(id): Path<PersonId>,
    Json(person): Json<Person>,
) -> Response {
    if let Err(e) = Validator::validate_person(&person) {
        return error_response(StatusCode::BAD_REQUEST, e);
    }

    match state.repository.update(id, person) {
        Ok(updated) => Json(updated).into_response(),
        Err(e) => repository_error(e),
    }
}

/// DELETE /api/people/{id}
async fn delete_person(State(state): State<AppState>, Path(id): Path<PersonId>) -> Response {
    match state.repository.delete(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => repository_error(e),
    }
}
