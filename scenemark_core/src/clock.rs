//! Time sources used by scenes to measure frame throughput.

use std::cell::Cell;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Clock abstraction so scenes can be timed against the wall clock in real
/// runs and against a hand-driven clock in tests.
pub trait Clock {
    /// Monotonic time in seconds since an arbitrary epoch.
    fn now_secs(&self) -> f64;
}

/// Wall-clock time in milliseconds since the Unix epoch, for stamping results.
pub fn unix_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Monotonic clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_secs(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// A clock that only moves when told to.
///
/// Shared between a test and the scenes it drives through `Rc`, so the test
/// can advance time between frames and get exact FPS values back.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, secs: f64) {
        self.now.set(secs);
    }

    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }
}

impl Clock for ManualClock {
    fn now_secs(&self) -> f64 {
        self.now.get()
    }
}
