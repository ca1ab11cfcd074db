//! Aggregate lifecycle abstractions.
//!
//! Aggregates embed a [`Lifecycle`] value instead of inheriting a base
//! class: the generic [`hydrate`] function drives the replay through the
//! aggregate's own state-transition function.

use crate::error::DomainError;
use crate::event::RecordedEvent;
use crate::store::EventStore;

/// Lifecycle state shared by every event-sourced aggregate.
///
/// Exactly two states: not-live (initial) and live (terminal, absorbing).
/// [`hydrate`] performs the only transition. Commands must only read or
/// modify aggregate state while live.
#[derive(Debug, Default)]
pub struct Lifecycle {
    id: Option<String>,
    version: i64,
    live: bool,
}

impl Lifecycle {
    /// The stream id this aggregate is attached to, set by hydration.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// The version of the last applied event (0 before any event).
    #[must_use]
    pub fn version(&self) -> i64 {
        self.version
    }

    /// Whether the initial replay has completed.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.live
    }

    /// Records the version of an event the aggregate just applied.
    pub fn set_version(&mut self, version: i64) {
        self.version = version;
    }
}

/// Trait for aggregate roots that reconstitute from event history.
pub trait AggregateRoot: Send + Sync {
    /// Returns the aggregate's lifecycle state.
    fn lifecycle(&self) -> &Lifecycle;

    /// Returns the aggregate's lifecycle state for mutation.
    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    /// Applies an event to mutate internal state. Used during replay and
    /// when a handled command produces a new event.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnhandledEventType`] when the aggregate
    /// defines no transition for the event's type, which aborts the replay
    /// in progress.
    fn apply(&mut self, event: &RecordedEvent) -> Result<(), DomainError>;
}

/// Rebuilds the aggregate's state by replaying its stream, then marks it
/// live. May be called at most once per instance.
///
/// An unknown or empty stream hydrates to the default state and still
/// marks the aggregate live, so brand-new aggregates are not an error.
///
/// # Errors
///
/// Returns [`DomainError::AlreadyLive`] when the aggregate is already
/// live, or whatever `apply` returns for an event it cannot handle (the
/// aggregate is left not-live in that case).
pub async fn hydrate<A: AggregateRoot + ?Sized>(
    aggregate: &mut A,
    id: &str,
    store: &dyn EventStore,
) -> Result<(), DomainError> {
    if aggregate.lifecycle().is_live() {
        return Err(DomainError::AlreadyLive(id.to_owned()));
    }

    let events = store.get_stream(id).await?;
    for event in &events {
        aggregate.apply(event)?;
        aggregate.lifecycle_mut().set_version(event.version);
    }

    let lifecycle = aggregate.lifecycle_mut();
    lifecycle.id = Some(id.to_owned());
    lifecycle.live = true;
    Ok(())
}
