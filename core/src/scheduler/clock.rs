//! Monotonic clock abstraction.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// The host time source could not produce a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("host clock unavailable")]
pub struct ClockError;

/// Monotonic time source.
///
/// Readings are durations since some fixed origin; the engine only ever
/// compares readings, never interprets them absolutely. A failed read
/// degrades the affected toast to never-auto-dismiss instead of
/// propagating (see the orchestrator).
pub trait Clock: Send + Sync {
    fn now(&self) -> Result<Duration, ClockError>;
}

/// Production clock anchored to an [`Instant`] taken at construction.
#[derive(Debug, Clone)]
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
    fn now(&self) -> Result<Duration, ClockError> {
        Ok(self.origin.elapsed())
    }
}

/// Hand-driven clock for deterministic tests.
///
/// Clones share the same underlying reading, so a test can keep one
/// handle and give another to the engine.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
    failing: Arc<AtomicBool>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward by `ms` milliseconds.
    pub fn advance(&self, ms: u64) {
        self.millis.fetch_add(ms, Ordering::SeqCst);
    }

    /// Make subsequent reads fail (or succeed again), simulating a
    /// broken host time source.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Result<Duration, ClockError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ClockError);
        }
        Ok(Duration::from_millis(self.millis.load(Ordering::SeqCst)))
    }
}
