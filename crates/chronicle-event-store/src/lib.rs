//! Chronicle Event Store — the in-memory event store engine.
//!
//! [`MemoryEventStore`] is the single source of truth for all events: it
//! enforces per-stream version sequencing and optimistic concurrency,
//! answers point and range queries, and dispatches synchronous pub/sub
//! notifications. Explicitly volatile: nothing survives the process.

pub mod memory_event_store;

pub use memory_event_store::MemoryEventStore;
