//! Calendar clock — owns the in-game time, speed control, and the tick timer.
//!
//! One hour of simulated time passes per timer firing. The firing period is
//! `base_interval_ms / speed`; Paused has no timer at all.

use crate::{
    calendar::{Rollover, SimulatedTime},
    error::{SimError, SimResult},
    snapshot::ClockState,
    store::KeyValueStore,
    timer::{IntervalTimer, TimerHandle},
    types::{ObserverId, Timestamp},
    wall_clock::WallClock,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Real milliseconds per simulated hour at Normal speed.
pub const BASE_INTERVAL_MS: u64 = 5000;

/// Base intervals must be a multiple of this (the lcm of all speed
/// multipliers) so every tick period divides evenly and the calendar
/// stays on the same time base as need decay.
pub const BASE_INTERVAL_STEP_MS: u64 = 10;

pub const TIME_KEY:  &str = "clock.time";
pub const SPEED_KEY: &str = "clock.speed";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub enum ClockSpeed {
    Paused,     // no ticks
    Normal,     // 1 hour / 5000ms
    Fast,       // 1 hour / 2500ms
    VeryFast,   // 1 hour / 1000ms
    UltraFast,  // 1 hour / 500ms
}

impl ClockSpeed {
    pub const ALL: [ClockSpeed; 5] = [
        ClockSpeed::Paused,
        ClockSpeed::Normal,
        ClockSpeed::Fast,
        ClockSpeed::VeryFast,
        ClockSpeed::UltraFast,
    ];

    /// Simulated hours per base interval.
    pub fn multiplier(self) -> u32 {
        match self {
            ClockSpeed::Paused    => 0,
            ClockSpeed::Normal    => 1,
            ClockSpeed::Fast      => 2,
            ClockSpeed::VeryFast  => 5,
            ClockSpeed::UltraFast => 10,
        }
    }

    pub fn is_paused(self) -> bool {
        self == ClockSpeed::Paused
    }
}

impl TryFrom<u8> for ClockSpeed {
    type Error = SimError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ClockSpeed::ALL
            .into_iter()
            .find(|s| s.multiplier() == u32::from(value))
            .ok_or(SimError::InvalidSpeed { value: i64::from(value) })
    }
}

impl From<ClockSpeed> for u8 {
    fn from(speed: ClockSpeed) -> u8 {
        // Every multiplier fits in a u8.
        speed.multiplier() as u8
    }
}

impl std::str::FromStr for ClockSpeed {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s.trim().parse().map_err(|_| SimError::Deserialization {
            key:    SPEED_KEY.into(),
            reason: format!("not a number: {s:?}"),
        })?;
        u8::try_from(value)
            .map_err(|_| SimError::InvalidSpeed { value })
            .and_then(ClockSpeed::try_from)
    }
}

/// Receives the new time after every completed advance.
pub trait TickObserver {
    fn on_tick(&mut self, time: &SimulatedTime);
}

impl<F: FnMut(&SimulatedTime)> TickObserver for F {
    fn on_tick(&mut self, time: &SimulatedTime) {
        self(time)
    }
}

/// Result of a best-effort load from the key-value store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Restored,
    NoSavedState,
    /// Stored data was malformed; the clock kept its prior state.
    Discarded { reason: String },
}

pub struct CalendarClock {
    time:             SimulatedTime,
    speed:            ClockSpeed,
    base_interval_ms: u64,
    timer:            IntervalTimer,
    active:           Option<TimerHandle>,
    observers:        Vec<(ObserverId, Box<dyn TickObserver>)>,
    next_observer:    ObserverId,
    wall_clock:       Box<dyn WallClock>,
}

impl CalendarClock {
    pub fn new(wall_clock: Box<dyn WallClock>) -> Self {
        Self::with_settings(
            SimulatedTime::default(),
            ClockSpeed::Normal,
            BASE_INTERVAL_MS,
            wall_clock,
        )
    }

    pub fn with_settings(
        time: SimulatedTime,
        speed: ClockSpeed,
        base_interval_ms: u64,
        wall_clock: Box<dyn WallClock>,
    ) -> Self {
        Self {
            time,
            speed,
            base_interval_ms: base_interval_ms.max(1),
            timer: IntervalTimer::new(),
            active: None,
            observers: Vec::new(),
            next_observer: 0,
            wall_clock,
        }
    }

    /// A copy of the current time.
    pub fn time(&self) -> SimulatedTime {
        self.time
    }

    pub fn speed(&self) -> ClockSpeed {
        self.speed
    }

    pub fn base_interval_ms(&self) -> u64 {
        self.base_interval_ms
    }

    pub fn now(&self) -> Timestamp {
        self.wall_clock.now_ms()
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    /// Real milliseconds between ticks at the current speed.
    pub fn tick_period_ms(&self) -> Option<u64> {
        match self.speed.multiplier() {
            0 => None,
            m => Some((self.base_interval_ms / u64::from(m)).max(1)),
        }
    }

    /// Applies immediately: a running timer is re-armed with the new period.
    pub fn set_speed(&mut self, speed: ClockSpeed) {
        let old = self.speed;
        self.speed = speed;
        if self.active.is_some() {
            self.stop();
            if !speed.is_paused() {
                self.start();
            }
        }
        log::info!("clock speed {old:?} -> {speed:?}");
    }

    pub fn start(&mut self) {
        if self.active.is_some() {
            return;
        }
        let Some(period) = self.tick_period_ms() else {
            return;
        };
        let now = self.wall_clock.now_ms();
        let period = i64::try_from(period).unwrap_or(i64::MAX);
        self.active = Some(self.timer.schedule(period, now));
        log::info!("clock started at {} ({:?})", self.time, self.speed);
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.active.take() {
            self.timer.cancel(handle);
            log::info!("clock stopped at {}", self.time);
        }
    }

    pub fn on_tick(&mut self, observer: impl TickObserver + 'static) -> ObserverId {
        self.next_observer += 1;
        let id = self.next_observer;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Advance one hour. Observers see only the final normalized time.
    pub fn advance(&mut self) -> SimulatedTime {
        match self.time.advance_hour() {
            Rollover::None  => {}
            Rollover::Day   => log::debug!("new day: {}", self.time),
            Rollover::Month => log::debug!("new month: {}", self.time),
            Rollover::Year  => log::debug!("new year: {}", self.time),
        }
        let time = self.time;
        for (_, observer) in &mut self.observers {
            observer.on_tick(&time);
        }
        time
    }

    /// Fire every timer period that has elapsed. Returns ticks fired.
    pub fn poll(&mut self) -> u32 {
        let now = self.wall_clock.now_ms();
        let mut fired = 0;
        while self.active.is_some() && self.timer.fire_next(now) {
            self.advance();
            fired += 1;
        }
        fired
    }

    pub fn time_until_next_tick(&self) -> Option<Duration> {
        self.active?;
        let due = self.timer.next_due()?;
        let wait = (due - self.wall_clock.now_ms()).max(0);
        Some(Duration::from_millis(u64::try_from(wait).unwrap_or(0)))
    }

    pub fn state(&self) -> ClockState {
        ClockState { time: self.time, speed: self.speed }
    }

    // ── Persistence ────────────────────────────────────────────

    pub fn save_state(&self, store: &mut dyn KeyValueStore) -> SimResult<()> {
        store.set(TIME_KEY, &serde_json::to_string(&self.time)?)?;
        store.set(SPEED_KEY, &u8::from(self.speed).to_string())?;
        log::info!("clock state saved: {} {:?}", self.time, self.speed);
        Ok(())
    }

    /// Best-effort restore. Malformed data is logged and discarded;
    /// only store I/O failures are returned as errors.
    pub fn load_state(&mut self, store: &dyn KeyValueStore) -> SimResult<LoadOutcome> {
        let Some(raw_time) = store.get(TIME_KEY)? else {
            return Ok(LoadOutcome::NoSavedState);
        };
        let raw_speed = store.get(SPEED_KEY)?;

        match decode_state(&raw_time, raw_speed.as_deref(), self.speed) {
            Ok(state) => {
                self.time = state.time;
                if state.speed != self.speed {
                    self.set_speed(state.speed);
                }
                log::info!("clock state loaded: {} {:?}", self.time, self.speed);
                Ok(LoadOutcome::Restored)
            }
            Err(e @ (SimError::Deserialization { .. }
            | SimError::InvalidSpeed { .. }
            | SimError::InvalidTime { .. })) => {
                log::warn!("discarding saved clock state: {e}");
                Ok(LoadOutcome::Discarded { reason: e.to_string() })
            }
            Err(e) => Err(e),
        }
    }
}

fn decode_state(
    raw_time: &str,
    raw_speed: Option<&str>,
    current_speed: ClockSpeed,
) -> SimResult<ClockState> {
    let time: SimulatedTime =
        serde_json::from_str(raw_time).map_err(|e| SimError::Deserialization {
            key:    TIME_KEY.into(),
            reason: e.to_string(),
        })?;
    if !time.is_normalized() {
        return Err(SimError::InvalidTime {
            year:  time.year,
            month: time.month,
            day:   time.day,
            hour:  time.hour,
        });
    }
    let speed = match raw_speed {
        Some(raw) => raw.parse()?,
        None => current_speed,
    };
    Ok(ClockState { time, speed })
}
