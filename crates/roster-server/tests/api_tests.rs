use std::sync::Arc;

use axum::{
    body::Body,
    extract::Path,
    http::{Request, StatusCode},
    response::IntoResponse,
    routing,
    Json, Router,
};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use roster_core::Person;
use roster_db::{init_database, RedbKeyValueStore};
use roster_server::{create_router, AppState, Repository};
use roster_sync::{HttpRemoteSource, InitOutcome, PeopleRepository, PeopleStore};

fn upstream_people() -> Vec<Person> {
    vec![
        Person::new("Leanne Graham", "Sincere@april.biz").with_id(1),
        Person::new("Ervin Howell", "Shanna@melissa.tv").with_id(2),
        Person::new("Clementine Bauch", "Nathan@yesenia.net").with_id(3),
    ]
}

/// Stand up a throwaway upstream users API and return its collection URL.
async fn spawn_upstream() -> String {
    async fn get_user(Path(id): Path<u64>) -> axum::response::Response {
        match upstream_people().into_iter().find(|p| p.id == id) {
            Some(person) => Json(person).into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }

    let router = Router::new()
        .route("/users", routing::get(|| async { Json(upstream_people()) }))
        .route("/users/{id}", routing::get(get_user));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/users", addr)
}

struct TestApp {
    router: Router,
    repository: Arc<Repository>,
    _dir: TempDir,
}

/// Create a test app backed by a fresh redb file and a local upstream.
async fn create_test_app() -> TestApp {
    let dir = tempfile::tempdir().unwrap();
    let db = init_database(dir.path().join("roster.redb")).unwrap();

    let remote = HttpRemoteSource::new(spawn_upstream().await);
    let store = PeopleStore::new(Arc::new(RedbKeyValueStore::new(db)));
    let repository = Arc::new(PeopleRepository::new(store, Arc::new(remote)));

    TestApp {
        router: create_router(AppState::new(repository.clone())),
        repository,
        _dir: dir,
    }
}

/// Same, with initialization already done (store seeded from upstream).
async fn create_seeded_app() -> TestApp {
    let app = create_test_app().await;
    assert_eq!(app.repository.initialize().await, InitOutcome::Seeded(3));
    app
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_json(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

// ============================================================================
// Health endpoint tests
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app().await;

    let (status, json) = send(&app.router, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_ready_after_initialization() {
    let app = create_test_app().await;

    let (status, json) = send(&app.router, get("/ready")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["status"], "initializing");

    app.repository.initialize().await;

    let (status, _) = send(&app.router, get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
}

// ============================================================================
// Collection endpoint tests
// ============================================================================

#[tokio::test]
async fn test_list_people_after_seed() {
    let app = create_seeded_app().await;

    let (status, json) = send(&app.router, get("/api/people")).await;

    assert_eq!(status, StatusCode::OK);
    let people = json.as_array().unwrap();
    assert_eq!(people.len(), 3);
    assert_eq!(people[0]["name"], "Leanne Graham");
    assert_eq!(people[0]["address"]["city"], "");
}

#[tokio::test]
async fn test_list_people_before_seed_is_empty() {
    let app = create_test_app().await;

    let (status, json) = send(&app.router, get("/api/people")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 0);
}

// ============================================================================
// Single person endpoint tests
// ============================================================================

#[tokio::test]
async fn test_get_person_local() {
    let app = create_seeded_app().await;

    let (status, json) = send(&app.router, get("/api/people/2")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Ervin Howell");
}

#[tokio::test]
async fn test_get_person_falls_back_to_remote() {
    // Not seeded: the local store is empty, upstream has id 3
    let app = create_test_app().await;

    let (status, json) = send(&app.router, get("/api/people/3")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Clementine Bauch");

    // Not written back
    let (_, json) = send(&app.router, get("/api/people")).await;
    assert_eq!(json.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_get_person_not_found() {
    let app = create_seeded_app().await;

    let (status, json) = send(&app.router, get("/api/people/42")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json["error"].as_str().unwrap().contains("42"));
}

#[tokio::test]
async fn test_get_person_invalid_id() {
    let app = create_seeded_app().await;

    let response = app.router.clone().oneshot(get("/api/people/abc")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Create / update / delete tests
// ============================================================================

#[tokio::test]
async fn test_create_person_assigns_next_id() {
    let app = create_seeded_app().await;

    let body = serde_json::json!({
        "id": 1,
        "name": "Ann",
        "email": "a@x.com",
        "company": {"name": "Acme"}
    });
    let (status, json) = send(&app.router, with_json("POST", "/api/people", body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["id"], 4);
    assert_eq!(json["company"]["name"], "Acme");
    assert_eq!(json["address"]["street"], "");

    let (_, json) = send(&app.router, get("/api/people/4")).await;
    assert_eq!(json["name"], "Ann");
}

#[tokio::test]
async fn test_create_person_on_empty_store() {
    let app = create_test_app().await;

    let body = serde_json::json!({"name": "Ann", "email": "a@x.com"});
    let (status, json) = send(&app.router, with_json("POST", "/api/people", body)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["id"], 1);
}

#[tokio::test]
async fn test_create_person_validation() {
    let app = create_seeded_app().await;

    let missing_name = serde_json::json!({"name": " ", "email": "a@x.com"});
    let (status, json) = send(&app.router, with_json("POST", "/api/people", missing_name)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "Name is required");

    let bad_email = serde_json::json!({"name": "Ann", "email": "ann"});
    let (status, _) = send(&app.router, with_json("POST", "/api/people", bad_email)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let padded_email = serde_json::json!({"name": "Ann", "email": " a@x.com "});
    let (status, _) = send(&app.router, with_json("POST", "/api/people", padded_email)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, json) = send(&app.router, get("/api/people")).await;
    assert_eq!(json.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_update_person_keeps_path_id() {
    let app = create_seeded_app().await;

    let body = serde_json::json!({"id": 99, "name": "Renamed", "email": "r@x.com"});
    let (status, json) = send(&app.router, with_json("PUT", "/api/people/2", body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], 2);

    let (_, json) = send(&app.router, get("/api/people/2")).await;
    assert_eq!(json["name"], "Renamed");

    let (status, _) = send(&app.router, get("/api/people/99")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_missing_person() {
    let app = create_seeded_app().await;

    let body = serde_json::json!({"name": "Ann", "email": "a@x.com"});
    let (status, _) = send(&app.router, with_json("PUT", "/api/people/42", body)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_person() {
    let app = create_seeded_app().await;

    let (status, json) = send(&app.router, delete("/api/people/1")).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(json.is_null());

    let (_, json) = send(&app.router, get("/api/people")).await;
    let ids: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![2, 3]);
}

#[tokio::test]
async fn test_delete_missing_person() {
    let app = create_seeded_app().await;

    let (status, _) = send(&app.router, delete("/api/people/42")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, json) = send(&app.router, get("/api/people")).await;
    assert_eq!(json.as_array().unwrap().len(), 3);
}

// ============================================================================
// Change feed tests
// ============================================================================

async fn next_frame_text(body: &mut Body) -> String {
    loop {
        let frame = body.frame().await.unwrap().unwrap();
        if let Ok(data) = frame.into_data() {
            return String::from_utf8(data.to_vec()).unwrap();
        }
    }
}

#[tokio::test]
async fn test_events_replay_then_follow() {
    let app = create_seeded_app().await;

    let response = app
        .router
        .clone()
        .oneshot(get("/api/people/events"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let mut body = response.into_body();

    let first = next_frame_text(&mut body).await;
    assert!(first.contains("event: snapshot"));
    assert!(first.contains("Leanne Graham"));

    app.repository.delete(1).unwrap();

    let second = next_frame_text(&mut body).await;
    assert!(second.contains("event: snapshot"));
    assert!(!second.contains("Leanne Graham"));
    assert!(second.contains("Ervin Howell"));
}
