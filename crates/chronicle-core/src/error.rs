//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
///
/// Every error is reported synchronously to the direct caller of the
/// operation that detected it; the store never retries on its own.
#[derive(Debug, Error)]
pub enum DomainError {
    /// Optimistic concurrency conflict: the stream moved past the version
    /// the writer assumed. The failed write leaves the stream unmodified;
    /// callers recover by re-hydrating and retrying.
    #[error(
        "concurrency conflict on stream {stream_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        /// The stream that had the conflict.
        stream_id: String,
        /// The version the writer expected.
        expected: i64,
        /// The actual version found.
        actual: i64,
    },

    /// A stream was not found where one was required. Read paths on the
    /// in-memory store return empty results instead of raising this; it is
    /// reserved for backends that choose strict existence checks.
    #[error("stream not found: {0}")]
    StreamNotFound(String),

    /// Command validation failed against current aggregate state. Always
    /// recoverable; no event is constructed or appended.
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// `hydrate` was called on an aggregate that is already live. This is a
    /// caller lifecycle bug, not a condition to catch and retry.
    #[error("aggregate {0} is already live")]
    AlreadyLive(String),

    /// An event was replayed against a handler with no matching case.
    /// Fatal to the replay in progress — silently ignoring state-changing
    /// events is unsafe.
    #[error("unhandled event type: {0}")]
    UnhandledEventType(String),

    /// An infrastructure or deserialization error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
