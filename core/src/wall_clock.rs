//! Wall-clock time source.
//!
//! RULE: nothing in the core reads the platform clock directly.
//! The calendar clock and the needs refresh both go through a WallClock,
//! so tests and fast-forward runs can substitute a manual one.

use crate::types::Timestamp;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

pub trait WallClock {
    /// Milliseconds since the Unix epoch. Never goes backwards for a
    /// given instance.
    fn now_ms(&self) -> Timestamp;
}

/// Monotonic system clock anchored to the epoch time at construction.
pub struct SystemWallClock {
    origin:   Instant,
    epoch_ms: Timestamp,
}

impl SystemWallClock {
    pub fn new() -> Self {
        Self {
            origin:   Instant::now(),
            epoch_ms: chrono::Utc::now().timestamp_millis(),
        }
    }
}

impl Default for SystemWallClock {
    fn default() -> Self { Self::new() }
}

impl WallClock for SystemWallClock {
    fn now_ms(&self) -> Timestamp {
        let elapsed = self.origin.elapsed().as_millis();
        self.epoch_ms.saturating_add(i64::try_from(elapsed).unwrap_or(i64::MAX))
    }
}

/// Settable clock. Clones share the same instant, so a test can keep one
/// handle while the calendar clock owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualWallClock {
    now: Rc<Cell<Timestamp>>,
}

impl ManualWallClock {
    pub fn starting_at(now: Timestamp) -> Self {
        Self { now: Rc::new(Cell::new(now)) }
    }

    pub fn set(&self, now: Timestamp) {
        self.now.set(now);
    }

    pub fn advance(&self, ms: i64) {
        self.now.set(self.now.get() + ms);
    }
}

impl WallClock for ManualWallClock {
    fn now_ms(&self) -> Timestamp {
        self.now.get()
    }
}
