use std::convert::Infallible;

use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures::stream::{self, Stream};

use roster_sync::Snapshot;

use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/people/events", get(people_events))
}

fn snapshot_event(snapshot: &Snapshot) -> Event {
    match Event::default().event("snapshot").json_data(snapshot.as_slice()) {
        Ok(event) => event,
        Err(e) => {
            tracing::error!("Failed to encode snapshot event: {}", e);
            Event::default().comment("snapshot encoding failed")
        }
    }
}

/// GET /api/people/events - One `snapshot` event per published collection,
/// starting with the current one.
async fn people_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = state.repository.subscribe();

    let events = stream::unfold(subscription, |mut subscription| async move {
        let snapshot = subscription.next().await?;
        Some((Ok(snapshot_event(&snapshot)), subscription))
    });

    Sse::new(events).keep_alive(KeepAlive::default())
}
