//! Replay-latest broadcast of collection snapshots.
//!
//! The cache holds the most recently published snapshot and fans every new
//! publication out to live subscribers. A subscriber first receives the
//! snapshot current at subscribe time, then each later publication in order.

use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};

use roster_core::Person;

/// A published collection state. Shared, never mutated after publishing.
pub type Snapshot = Arc<Vec<Person>>;

/// Publications a slow subscriber may fall behind by before it starts skipping.
pub const DEFAULT_CAPACITY: usize = 64;

pub struct SnapshotCache {
    latest: RwLock<Snapshot>,
    sender: broadcast::Sender<Snapshot>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            latest: RwLock::new(Arc::new(Vec::new())),
            sender,
        }
    }

    /// Replace the latest snapshot and push it to every subscriber.
    ///
    /// Returns the number of subscribers that were sent the snapshot.
    pub fn publish(&self, people: Vec<Person>) -> usize {
        let snapshot = Arc::new(people);
        let mut latest = self.latest.write().unwrap_or_else(PoisonError::into_inner);
        *latest = snapshot.clone();
        // Sent while holding the lock so subscribe() can't slip in between
        // and see the new snapshot twice or miss it.
        self.sender.send(snapshot).unwrap_or(0)
    }

    /// The most recently published snapshot, empty if nothing was published yet.
    pub fn latest(&self) -> Snapshot {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn subscribe(&self) -> Subscription {
        let latest = self.latest.read().unwrap_or_else(PoisonError::into_inner);
        Subscription {
            pending: Some(latest.clone()),
            receiver: self.sender.subscribe(),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for SnapshotCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Live feed of snapshots. Dropping it unsubscribes.
pub struct Subscription {
    pending: Option<Snapshot>,
    receiver: broadcast::Receiver<Snapshot>,
}

impl Subscription {
    /// Wait for the next snapshot. Returns None once the cache is gone.
    pub async fn next(&mut self) -> Option<Snapshot> {
        if let Some(snapshot) = self.pending.take() {
            return Some(snapshot);
        }

        loop {
            match self.receiver.recv().await {
                Ok(snapshot) => return Some(snapshot),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Snapshot subscriber lagged, skipping to oldest retained");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next snapshot if one is already waiting.
    pub fn try_next(&mut self) -> Option<Snapshot> {
        if let Some(snapshot) = self.pending.take() {
            return Some(snapshot);
        }

        loop {
            match self.receiver.try_recv() {
                Ok(snapshot) => return Some(snapshot),
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Snapshot subscriber lagged, skipping to oldest retained");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}
