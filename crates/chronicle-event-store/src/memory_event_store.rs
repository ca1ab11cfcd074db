//! In-memory implementation of the `EventStore` trait.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use uuid::Uuid;

use chronicle_core::clock::{Clock, SystemClock};
use chronicle_core::error::DomainError;
use chronicle_core::event::{NewEvent, RecordedEvent};
use chronicle_core::store::{EventStore, Snapshot, StreamMetadata, Subscriber};

/// Index structures guarded by the store's write lock.
///
/// Invariant: every recorded event appears exactly once in `all` and
/// exactly once in its entry in `streams`, in the same relative order in
/// both. `next_position` never decreases, even across stream deletions.
#[derive(Debug, Default)]
struct StoreIndex {
    /// Global append-ordered list of all events.
    all: Vec<RecordedEvent>,
    /// Per-stream event lists, in version order.
    streams: HashMap<String, Vec<RecordedEvent>>,
    /// Single-slot snapshot cache per stream.
    snapshots: HashMap<String, Snapshot>,
    /// Store-wide append sequence, assigned under the write lock.
    next_position: u64,
}

impl StoreIndex {
    fn current_version(&self, stream_id: &str) -> i64 {
        self.streams
            .get(stream_id)
            .and_then(|stream| stream.last())
            .map_or(0, |event| event.version)
    }

    /// Records one event: assigns identity and ordering, then pushes it to
    /// the tail of both the stream list and the global list.
    fn record(&mut self, stream_id: &str, event: NewEvent, now: DateTime<Utc>) -> RecordedEvent {
        self.next_position += 1;
        let stream = self.streams.entry(stream_id.to_owned()).or_default();
        let recorded = RecordedEvent {
            event_id: Uuid::new_v4(),
            event_type: event.event_type,
            stream_id: stream_id.to_owned(),
            version: stream.last().map_or(0, |last| last.version) + 1,
            global_position: self.next_position,
            data: event.data,
            metadata: event.metadata,
            created_at: now,
        };
        stream.push(recorded.clone());
        self.all.push(recorded.clone());
        recorded
    }
}

/// Sorts events chronologically, breaking `created_at` ties with the
/// global append order so the result is a total order.
fn chronological(mut events: Vec<RecordedEvent>) -> Vec<RecordedEvent> {
    events.sort_by_key(|event| (event.created_at, event.global_position));
    events
}

/// In-memory, append-only event store.
///
/// All mutating operations serialize on a single write lock so that
/// version assignment and the expected-version check are atomic; two
/// logically-concurrent appends to the same stream can never receive the
/// same version. Readers take the read lock and copy results out, so they
/// observe either the pre- or post-append state, never a torn list.
///
/// Subscriber callbacks run synchronously on the appending call stack,
/// after the event has been committed and outside the data lock, so a
/// callback may read the store. Appending or registering a subscriber
/// from inside a callback is unsupported.
pub struct MemoryEventStore {
    index: RwLock<StoreIndex>,
    subscribers: Mutex<HashMap<String, Vec<Subscriber>>>,
    clock: Arc<dyn Clock>,
}

impl MemoryEventStore {
    /// Creates a store that timestamps events with the system clock.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates a store with an injected clock, for deterministic tests or
    /// embedding.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            index: RwLock::new(StoreIndex::default()),
            subscribers: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn notify(&self, event: &RecordedEvent) {
        let subscribers = self.subscribers.lock().expect("subscriber lock poisoned");
        if let Some(list) = subscribers.get(&event.stream_id) {
            for subscriber in list {
                if let Err(error) = subscriber(event) {
                    tracing::warn!(
                        stream_id = %event.stream_id,
                        version = event.version,
                        %error,
                        "subscriber failed; append is unaffected"
                    );
                }
            }
        }
    }

    fn read_index(&self) -> std::sync::RwLockReadGuard<'_, StoreIndex> {
        self.index.read().expect("store index lock poisoned")
    }

    fn write_index(&self) -> std::sync::RwLockWriteGuard<'_, StoreIndex> {
        self.index.write().expect("store index lock poisoned")
    }
}

impl Default for MemoryEventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryEventStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryEventStore").finish_non_exhaustive()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn append(
        &self,
        stream_id: &str,
        event: NewEvent,
    ) -> Result<RecordedEvent, DomainError> {
        let recorded = {
            let mut index = self.write_index();
            index.record(stream_id, event, self.clock.now())
        };
        tracing::debug!(
            stream_id,
            version = recorded.version,
            event_type = %recorded.event_type,
            "appended event"
        );
        self.notify(&recorded);
        Ok(recorded)
    }

    async fn append_batch(
        &self,
        stream_id: &str,
        events: Vec<NewEvent>,
    ) -> Result<Vec<RecordedEvent>, DomainError> {
        let recorded: Vec<RecordedEvent> = {
            let mut index = self.write_index();
            let now = self.clock.now();
            events
                .into_iter()
                .map(|event| index.record(stream_id, event, now))
                .collect()
        };
        for event in &recorded {
            self.notify(event);
        }
        Ok(recorded)
    }

    async fn append_with_expected_version(
        &self,
        stream_id: &str,
        event: NewEvent,
        expected_version: i64,
    ) -> Result<RecordedEvent, DomainError> {
        let recorded = {
            let mut index = self.write_index();
            let actual = index.current_version(stream_id);
            if actual != expected_version {
                return Err(DomainError::ConcurrencyConflict {
                    stream_id: stream_id.to_owned(),
                    expected: expected_version,
                    actual,
                });
            }
            index.record(stream_id, event, self.clock.now())
        };
        tracing::debug!(
            stream_id,
            version = recorded.version,
            event_type = %recorded.event_type,
            "appended event at expected version"
        );
        self.notify(&recorded);
        Ok(recorded)
    }

    async fn get_stream(&self, stream_id: &str) -> Result<Vec<RecordedEvent>, DomainError> {
        Ok(self
            .read_index()
            .streams
            .get(stream_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn get_stream_from_version(
        &self,
        stream_id: &str,
        min_version: i64,
    ) -> Result<Vec<RecordedEvent>, DomainError> {
        Ok(self
            .read_index()
            .streams
            .get(stream_id)
            .map(|stream| {
                stream
                    .iter()
                    .filter(|event| event.version >= min_version)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn get_stream_version(&self, stream_id: &str) -> i64 {
        self.read_index().current_version(stream_id)
    }

    async fn stream_exists(&self, stream_id: &str) -> bool {
        self.read_index()
            .streams
            .get(stream_id)
            .is_some_and(|stream| !stream.is_empty())
    }

    async fn get_stream_metadata(&self, stream_id: &str) -> Option<StreamMetadata> {
        let index = self.read_index();
        let stream = index.streams.get(stream_id)?;
        let first = stream.first()?;
        let last = stream.last()?;
        Some(StreamMetadata {
            version: last.version,
            created_at: first.created_at,
            last_event_at: last.created_at,
        })
    }

    async fn get_all_events(&self, from_position: usize) -> Vec<RecordedEvent> {
        chronological(self.read_index().all.clone())
            .into_iter()
            .skip(from_position)
            .collect()
    }

    async fn get_events_by_type(&self, event_type: &str) -> Vec<RecordedEvent> {
        let matching = self
            .read_index()
            .all
            .iter()
            .filter(|event| event.event_type == event_type)
            .cloned()
            .collect();
        chronological(matching)
    }

    async fn get_events_in_range(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Vec<RecordedEvent> {
        let matching = self
            .read_index()
            .all
            .iter()
            .filter(|event| {
                from.is_none_or(|from| event.created_at >= from)
                    && to.is_none_or(|to| event.created_at <= to)
            })
            .cloned()
            .collect();
        chronological(matching)
    }

    async fn delete_stream(&self, stream_id: &str) -> Option<Vec<RecordedEvent>> {
        let removed = {
            let mut index = self.write_index();
            let removed = index.streams.remove(stream_id)?;
            index.all.retain(|event| event.stream_id != stream_id);
            // A recreated stream restarts at version 1, so any cached
            // snapshot version would be meaningless.
            index.snapshots.remove(stream_id);
            removed
        };
        tracing::debug!(stream_id, events = removed.len(), "deleted stream");
        Some(removed)
    }

    async fn subscribe_to_stream(&self, stream_id: &str, subscriber: Subscriber) {
        self.subscribers
            .lock()
            .expect("subscriber lock poisoned")
            .entry(stream_id.to_owned())
            .or_default()
            .push(subscriber);
    }

    async fn save_snapshot(&self, stream_id: &str, data: Value, version: i64) {
        let snapshot = Snapshot {
            data,
            version,
            taken_at: self.clock.now(),
        };
        self.write_index()
            .snapshots
            .insert(stream_id.to_owned(), snapshot);
    }

    async fn get_snapshot(&self, stream_id: &str) -> Option<Snapshot> {
        self.read_index().snapshots.get(stream_id).cloned()
    }

    async fn commit(&self) -> Result<(), DomainError> {
        Ok(())
    }
}
