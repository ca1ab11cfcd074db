//! Test clocks — deterministic `Clock` implementations for tests.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use chronicle_core::clock::Clock;

/// A clock that always returns a fixed point in time. Useful for testing
/// timestamp-tie behavior in chronological queries.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// A clock that advances by a fixed step on every `now()` call, so each
/// appended event gets a distinct, strictly increasing timestamp.
#[derive(Debug)]
pub struct SteppingClock {
    start: DateTime<Utc>,
    step: Duration,
    ticks: Mutex<i64>,
}

impl SteppingClock {
    /// Creates a clock starting at `start` that advances by `step` per call.
    #[must_use]
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        Self {
            start,
            step,
            ticks: Mutex::new(0),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let mut ticks = self.ticks.lock().expect("tick lock poisoned");
        let now = self.start + self.step * i32::try_from(*ticks).expect("tick count overflow");
        *ticks += 1;
        now
    }
}
