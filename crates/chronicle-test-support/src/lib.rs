//! Shared test mocks and utilities for the Chronicle event store.

mod clock;
mod subscriber;

pub use clock::{FixedClock, SteppingClock};
pub use subscriber::{collecting_subscriber, failing_subscriber};
