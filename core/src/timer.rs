//! Recurring timer primitive for the cooperative run loop.
//!
//! The timer never calls back into its owner. The owner polls it with the
//! current wall-clock time and performs one tick per reported firing.
//! Each firing is re-armed one period after its own due time, and only
//! once the previous firing has been counted, so ticks never overlap.

use crate::types::Timestamp;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Schedule {
    handle:    TimerHandle,
    period_ms: i64,
    next_due:  Timestamp,
}

#[derive(Debug, Default)]
pub struct IntervalTimer {
    active:      Option<Schedule>,
    next_handle: u64,
}

impl IntervalTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a recurring timer whose first firing is one period after `now`.
    /// Replaces any schedule already armed.
    pub fn schedule(&mut self, period_ms: i64, now: Timestamp) -> TimerHandle {
        let period_ms = period_ms.max(1);
        self.next_handle += 1;
        let handle = TimerHandle(self.next_handle);
        self.active = Some(Schedule {
            handle,
            period_ms,
            next_due: now + period_ms,
        });
        log::debug!("timer {handle:?} armed: period={period_ms}ms");
        handle
    }

    /// Cancel by handle. A stale handle is ignored.
    pub fn cancel(&mut self, handle: TimerHandle) {
        if self.active.as_ref().is_some_and(|s| s.handle == handle) {
            self.active = None;
            log::debug!("timer {handle:?} cancelled");
        }
    }

    pub fn is_armed(&self) -> bool {
        self.active.is_some()
    }

    pub fn period_ms(&self) -> Option<i64> {
        self.active.as_ref().map(|s| s.period_ms)
    }

    pub fn next_due(&self) -> Option<Timestamp> {
        self.active.as_ref().map(|s| s.next_due)
    }

    /// Take the next firing if it is due at `now`, re-arming the schedule.
    pub fn fire_next(&mut self, now: Timestamp) -> bool {
        match self.active.as_mut() {
            Some(s) if s.next_due <= now => {
                s.next_due += s.period_ms;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_handle_does_not_cancel_the_new_schedule() {
        let mut timer = IntervalTimer::new();
        let old = timer.schedule(100, 0);
        let current = timer.schedule(50, 0);
        assert_ne!(old, current);

        timer.cancel(old);
        assert!(timer.is_armed());
        assert_eq!(timer.period_ms(), Some(50));

        timer.cancel(current);
        assert!(!timer.is_armed());
        assert!(!timer.fire_next(1_000));
    }

    #[test]
    fn each_firing_rearms_one_period_later() {
        let mut timer = IntervalTimer::new();
        timer.schedule(10, 0);
        assert!(!timer.fire_next(9));
        assert!(timer.fire_next(25));
        assert_eq!(timer.next_due(), Some(20));
        assert!(timer.fire_next(25));
        assert!(!timer.fire_next(25));
        assert_eq!(timer.next_due(), Some(30));
    }

    #[test]
    fn zero_period_is_raised_to_one_millisecond() {
        let mut timer = IntervalTimer::new();
        timer.schedule(0, 5);
        assert_eq!(timer.next_due(), Some(6));
    }
}
