use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use roster_db::{init_database, RedbKeyValueStore};
use roster_server::{create_router, AppState, Config};
use roster_sync::{HttpRemoteSource, PeopleRepository, PeopleStore};

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            eprintln!("Optional: ROSTER_LISTEN_ADDR, ROSTER_DB_PATH, ROSTER_REMOTE_URL");
            eprintln!("Optional: ROSTER_REMOTE_TIMEOUT_SECS, ROSTER_STORAGE_KEY");
            std::process::exit(1);
        }
    };

    tracing::info!("Starting Roster server");
    tracing::info!("Listen address: {}", config.listen_addr);
    tracing::info!("Database path: {}", config.db_path.display());
    tracing::info!("Remote source: {}", config.remote_url);

    // Initialize database
    let db = match init_database(&config.db_path) {
        Ok(db) => db,
        Err(e) => {
            eprintln!("Database error: {}", e);
            std::process::exit(1);
        }
    };

    let remote = match HttpRemoteSource::with_timeout(&config.remote_url, config.remote_timeout) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Remote source error: {}", e);
            std::process::exit(1);
        }
    };

    let store = PeopleStore::with_key(Arc::new(RedbKeyValueStore::new(db)), &config.storage_key);
    let repository = Arc::new(PeopleRepository::new(store, Arc::new(remote)));

    // Load or seed in the background; requests are served meanwhile
    let initializing = repository.clone();
    tokio::spawn(async move {
        let outcome = initializing.initialize().await;
        tracing::info!("Initialization finished: {:?}", outcome);
    });

    let app = create_router(AppState::new(repository));

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server running at http://{}", config.listen_addr);

    axum::serve(listener, app).await.expect("Server error");
}
