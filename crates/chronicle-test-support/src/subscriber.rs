//! Test subscribers — canned `Subscriber` callbacks for pub/sub tests.

use std::sync::{Arc, Mutex};

use chronicle_core::error::DomainError;
use chronicle_core::event::RecordedEvent;
use chronicle_core::store::Subscriber;

/// Returns a subscriber that records every event it receives, along with
/// a handle to the recorded events.
#[must_use]
pub fn collecting_subscriber() -> (Subscriber, Arc<Mutex<Vec<RecordedEvent>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&received);
    let subscriber: Subscriber = Box::new(move |event| {
        sink.lock().expect("sink lock poisoned").push(event.clone());
        Ok(())
    });
    (subscriber, received)
}

/// Returns a subscriber that fails on every event. The store must log and
/// swallow the error without affecting the append.
#[must_use]
pub fn failing_subscriber() -> Subscriber {
    Box::new(|event| {
        Err(DomainError::Infrastructure(format!(
            "subscriber rejected event {}",
            event.event_id
        )))
    })
}
