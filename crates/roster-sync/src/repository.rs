use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use roster_core::{KeyValueStore, Person, PersonId, RemoteSource, RepositoryError};

use crate::cache::{Snapshot, SnapshotCache, Subscription};
use crate::collection::PeopleStore;

/// What initialization ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// The local store already held people.
    Loaded(usize),
    /// The store was empty and got seeded from the remote source.
    Seeded(usize),
    /// The seed fetch failed; the system starts out empty.
    SeedFailed(String),
    /// A mutation filled the store while the seed fetch was in flight.
    SeedSuperseded,
    /// Initialization already ran in this process.
    AlreadyInitialized,
}

/// Data facade over the local store, the remote source and the snapshot cache.
///
/// This is the only way in: callers never reach the store or the remote
/// source directly. Every mutation is load, compute, save, publish, and runs
/// under one lock so two mutations in this process never interleave. The lock
/// is never held across an await. Other processes sharing the same store are
/// not coordinated with; the last save wins.
pub struct PeopleRepository<K, R>
where
    K: KeyValueStore,
    R: RemoteSource,
{
    store: PeopleStore<K>,
    remote: Arc<R>,
    cache: SnapshotCache,
    write_lock: Mutex<()>,
    started: AtomicBool,
    ready: AtomicBool,
}

impl<K, R> PeopleRepository<K, R>
where
    K: KeyValueStore,
    R: RemoteSource,
{
    pub fn new(store: PeopleStore<K>, remote: Arc<R>) -> Self {
        Self {
            store,
            remote,
            cache: SnapshotCache::new(),
            write_lock: Mutex::new(()),
            started: AtomicBool::new(false),
            ready: AtomicBool::new(false),
        }
    }

    /// Load the local store, seeding it from the remote source when empty.
    ///
    /// Runs once per repository; later calls return `AlreadyInitialized`.
    /// Never fails: a seed error leaves the system empty and is logged.
    pub async fn initialize(&self) -> InitOutcome {
        if self.started.swap(true, Ordering::SeqCst) {
            return InitOutcome::AlreadyInitialized;
        }

        let outcome = self.load_or_seed().await;
        self.ready.store(true, Ordering::SeqCst);
        outcome
    }

    /// Whether initialization has finished, whatever its outcome.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    async fn load_or_seed(&self) -> InitOutcome {
        {
            let _guard = self.lock();
            let people = self.store.load();
            if !people.is_empty() {
                let count = people.len();
                self.cache.publish(people);
                tracing::info!(count, "Loaded people from local store");
                return InitOutcome::Loaded(count);
            }
        }

        tracing::info!("Local store empty, seeding from remote source");
        let fetched = self.remote.fetch_all().await;

        let _guard = self.lock();
        match fetched {
            Ok(people) => {
                let current = self.store.load();
                if !current.is_empty() {
                    tracing::warn!(
                        local = current.len(),
                        "Store filled during seed fetch, keeping local data"
                    );
                    self.cache.publish(current);
                    return InitOutcome::SeedSuperseded;
                }

                let people = normalize_seed(people);
                let count = people.len();
                self.store.save(&people);
                self.cache.publish(people);
                tracing::info!(count, "Seeded people from remote source");
                InitOutcome::Seeded(count)
            }
            Err(e) => {
                tracing::error!("Error loading initial data: {}", e);
                self.cache.publish(self.store.load());
                InitOutcome::SeedFailed(e.to_string())
            }
        }
    }

    /// Current durable collection. Also republishes it so observers match the store.
    pub fn list_all(&self) -> Vec<Person> {
        let _guard = self.lock();
        let people = self.store.load();
        self.cache.publish(people.clone());
        people
    }

    /// Look a person up locally, falling back to the remote source on a miss.
    ///
    /// A remote hit is returned as-is and not written to the local store.
    pub async fn get_by_id(&self, id: PersonId) -> Result<Person, RepositoryError> {
        if let Some(person) = self.store.load().into_iter().find(|p| p.id == id) {
            return Ok(person);
        }

        tracing::debug!(id, "Person not in local store, asking remote source");
        let person = self.remote.fetch_one(id).await.map_err(|e| {
            tracing::warn!(id, "Remote lookup failed: {}", e);
            RepositoryError::from(e)
        })?;
        Ok(person)
    }

    /// Store a new person under the next free id. Any id on the input is ignored.
    pub fn create(&self, person: Person) -> Result<Person, RepositoryError> {
        let _guard = self.lock();
        let mut people = self.store.load();

        let max_id = people.iter().map(|p| p.id).max().unwrap_or(0);
        let id = max_id
            .checked_add(1)
            .ok_or(RepositoryError::IdSpaceExhausted)?;

        let created = person.assigned(id);
        people.push(created.clone());

        self.commit(people);
        tracing::debug!(id, "Created person");
        Ok(created)
    }

    /// Replace the person with `id`. The stored record keeps `id` whatever the input says.
    pub fn update(&self, id: PersonId, person: Person) -> Result<Person, RepositoryError> {
        let _guard = self.lock();
        let mut people = self.store.load();

        let slot = people
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound(id))?;

        let updated = person.assigned(id);
        *slot = updated.clone();

        self.commit(people);
        tracing::debug!(id, "Updated person");
        Ok(updated)
    }

    pub fn delete(&self, id: PersonId) -> Result<(), RepositoryError> {
        let _guard = self.lock();
        let people = self.store.load();
        let before = people.len();

        let remaining: Vec<Person> = people.into_iter().filter(|p| p.id != id).collect();
        if remaining.len() == before {
            return Err(RepositoryError::NotFound(id));
        }

        self.commit(remaining);
        tracing::debug!(id, "Deleted person");
        Ok(())
    }

    /// Follow collection changes, starting with the latest snapshot.
    pub fn subscribe(&self) -> Subscription {
        self.cache.subscribe()
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Snapshot {
        self.cache.latest()
    }

    // Write first, then publish. Callers hold the write lock.
    fn commit(&self, people: Vec<Person>) {
        self.store.save(&people);
        self.cache.publish(people);
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        self.write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Make a fetched seed collection safe to store.
///
/// Records reusing an id already seen are dropped, keeping the first. Records
/// without an id get the next free ids after the largest one present.
fn normalize_seed(people: Vec<Person>) -> Vec<Person> {
    let mut seen = HashSet::new();
    let total = people.len();
    let mut next_id = people.iter().map(|p| p.id).max().unwrap_or(0);
    let mut unique = Vec::with_capacity(total);
    let mut renumbered = 0usize;

    for person in people {
        if person.has_id() {
            if seen.insert(person.id) {
                unique.push(person);
            }
            continue;
        }
        // Ids past u64::MAX cannot be handed out; such records are dropped.
        let Some(id) = next_id.checked_add(1) else {
            continue;
        };
        next_id = id;
        renumbered += 1;
        unique.push(person.assigned(id));
    }

    if unique.len() < total {
        tracing::warn!(
            dropped = total - unique.len(),
            "Dropped remote records that could not keep a unique id"
        );
    }
    if renumbered > 0 {
        tracing::warn!(renumbered, "Remote collection had records without ids");
    }
    unique
}
