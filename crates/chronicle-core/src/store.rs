//! Event store abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::DomainError;
use crate::event::{NewEvent, RecordedEvent};

/// Derived metadata for a non-empty stream.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamMetadata {
    /// Current version (event count).
    pub version: i64,
    /// Timestamp of the stream's first event.
    pub created_at: DateTime<Utc>,
    /// Timestamp of the stream's most recent event.
    pub last_event_at: DateTime<Utc>,
}

/// A cached copy of derived aggregate state, versioned against its stream.
///
/// One slot per stream, last write wins. Purely advisory: never consulted
/// by `append` or `get_stream`, and not required for correctness.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Serialized aggregate state.
    pub data: Value,
    /// The stream version the snapshot was taken at.
    pub version: i64,
    /// When the snapshot was saved.
    pub taken_at: DateTime<Utc>,
}

/// Callback invoked synchronously with each event appended to a stream.
///
/// A returned error is logged and swallowed by the store; it never rolls
/// back or otherwise affects the already-committed append.
pub type Subscriber = Box<dyn Fn(&RecordedEvent) -> Result<(), DomainError> + Send + Sync>;

/// The event store contract: an append-only, per-stream event log with
/// optimistic concurrency control, chronological cross-stream queries,
/// snapshotting, and synchronous pub/sub.
///
/// Within a stream, versions form a gapless ascending sequence `1..N`.
/// Read methods favor empty results over errors for unknown streams, so
/// hydrating a brand-new aggregate is not an error; raised errors are
/// reserved for the write-side concurrency check.
#[async_trait]
pub trait EventStore: Send + Sync {
    /// Appends an event to the stream, creating the stream on first use.
    ///
    /// The store assigns `version = current version + 1`, the event id,
    /// the global position, and the timestamp, then notifies subscribers
    /// registered on the stream with the finalized event.
    ///
    /// # Errors
    ///
    /// The in-memory store never fails this operation; the `Result` exists
    /// for durable backends.
    async fn append(&self, stream_id: &str, event: NewEvent)
    -> Result<RecordedEvent, DomainError>;

    /// Appends several events with contiguous versions, in the given order.
    ///
    /// Each event in the batch triggers its own subscriber notification,
    /// in order. An empty batch is a no-op returning an empty list.
    ///
    /// # Errors
    ///
    /// The in-memory store never fails this operation; the `Result` exists
    /// for durable backends.
    async fn append_batch(
        &self,
        stream_id: &str,
        events: Vec<NewEvent>,
    ) -> Result<Vec<RecordedEvent>, DomainError>;

    /// Appends an event only if the stream is currently at
    /// `expected_version`. `expected_version == 0` means the stream must
    /// not yet exist or be empty.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::ConcurrencyConflict`] when the stream's
    /// current version differs from `expected_version`, leaving the stream
    /// completely unmodified.
    async fn append_with_expected_version(
        &self,
        stream_id: &str,
        event: NewEvent,
        expected_version: i64,
    ) -> Result<RecordedEvent, DomainError>;

    /// Returns all events for the stream in version order. Unknown streams
    /// yield an empty list.
    ///
    /// # Errors
    ///
    /// The in-memory store never fails this operation; the `Result` exists
    /// for durable backends.
    async fn get_stream(&self, stream_id: &str) -> Result<Vec<RecordedEvent>, DomainError>;

    /// Returns the stream's events with `version >= min_version`.
    /// `min_version <= 1` is equivalent to the full stream; an unknown
    /// stream or a `min_version` past the end yields an empty list.
    ///
    /// # Errors
    ///
    /// The in-memory store never fails this operation; the `Result` exists
    /// for durable backends.
    async fn get_stream_from_version(
        &self,
        stream_id: &str,
        min_version: i64,
    ) -> Result<Vec<RecordedEvent>, DomainError>;

    /// Returns the stream's current version: 0 for an unknown or empty
    /// stream, otherwise the last event's version (= event count).
    async fn get_stream_version(&self, stream_id: &str) -> i64;

    /// Returns true iff the stream has at least one event.
    async fn stream_exists(&self, stream_id: &str) -> bool;

    /// Returns derived metadata for the stream, or `None` when unknown.
    async fn get_stream_metadata(&self, stream_id: &str) -> Option<StreamMetadata>;

    /// Returns all events across all streams in chronological order
    /// (`created_at`, ties broken by global append order), skipping the
    /// first `from_position` entries. An out-of-range position yields an
    /// empty list.
    async fn get_all_events(&self, from_position: usize) -> Vec<RecordedEvent>;

    /// Returns all events with an exact, case-sensitive type match, across
    /// all streams, in chronological order.
    async fn get_events_by_type(&self, event_type: &str) -> Vec<RecordedEvent>;

    /// Returns all events with `from <= created_at <= to`, in chronological
    /// order. A missing bound is unbounded on that side; `from > to` yields
    /// an empty list.
    async fn get_events_in_range(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Vec<RecordedEvent>;

    /// Hard-deletes the stream, removing its events from both the
    /// per-stream index and the global chronological list. Returns the
    /// previously held events, or `None` for an unknown stream.
    async fn delete_stream(&self, stream_id: &str) -> Option<Vec<RecordedEvent>>;

    /// Registers a callback invoked synchronously, in registration order,
    /// with each new event appended to exactly this stream id.
    async fn subscribe_to_stream(&self, stream_id: &str, subscriber: Subscriber);

    /// Saves a snapshot for the stream, replacing any previous one.
    async fn save_snapshot(&self, stream_id: &str, data: Value, version: i64);

    /// Returns the stream's snapshot, or `None` when none was saved.
    async fn get_snapshot(&self, stream_id: &str) -> Option<Snapshot>;

    /// Flushes buffered writes. A no-op for the in-memory store; present so
    /// a durable backend can implement batched flush semantics without
    /// changing the caller contract.
    ///
    /// # Errors
    ///
    /// The in-memory store never fails this operation; the `Result` exists
    /// for durable backends.
    async fn commit(&self) -> Result<(), DomainError>;
}
