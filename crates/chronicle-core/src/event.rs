//! Domain event records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// An event as recorded in the store.
///
/// The identity and ordering fields (`event_id`, `version`,
/// `global_position`, `created_at`) are assigned by the store at append
/// time. Callers only propose the type and payload via [`NewEvent`]. Once
/// recorded, an event is never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedEvent {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Type name for deserialization routing.
    pub event_type: String,
    /// Stream this event belongs to.
    pub stream_id: String,
    /// Monotonically increasing version within the stream, starting at 1.
    pub version: i64,
    /// Position in the store-wide append order. Strictly increasing across
    /// all streams; breaks timestamp ties in chronological queries.
    pub global_position: u64,
    /// Event payload.
    pub data: Value,
    /// Caller-supplied metadata. `Null` when none was given.
    pub metadata: Value,
    /// Timestamp assigned at append time.
    pub created_at: DateTime<Utc>,
}

/// A proposed event, before the store assigns identity and ordering.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    /// Type name for deserialization routing.
    pub event_type: String,
    /// Event payload.
    pub data: Value,
    /// Optional caller-supplied metadata.
    pub metadata: Value,
}

impl NewEvent {
    /// Creates a proposed event with the given type and payload.
    #[must_use]
    pub fn new(event_type: impl Into<String>, data: Value) -> Self {
        Self {
            event_type: event_type.into(),
            data,
            metadata: Value::Null,
        }
    }

    /// Attaches metadata to the proposed event.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }
}
