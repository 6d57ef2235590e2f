//! Needs decay engine.
//!
//! Pure transforms over a character's need-state. The engine reads the
//! clock's speed from its caller; it never subscribes to ticks, and it
//! shares the clock's base interval so one Normal-speed interval decays
//! exactly one simulated hour.
//!
//! Decay with elapsed real time `t` ms at speed `s`:
//!   hours = (t / base_interval_ms) * s
//!   value = max(0, value - rate[kind] * hours)

use crate::{
    character::{Character, NeedKind, NEED_MAX},
    clock::{ClockSpeed, BASE_INTERVAL_MS},
    error::{SimError, SimResult},
    types::Timestamp,
};
use serde::{Deserialize, Serialize};

pub const CRITICAL_THRESHOLD: f64 = 20.0;
pub const LOW_THRESHOLD:      f64 = 40.0;
pub const MEDIUM_THRESHOLD:   f64 = 70.0;

/// Points lost per simulated hour, per need kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DecayRates {
    pub rest: f64,
    pub food: f64,
}

impl Default for DecayRates {
    fn default() -> Self {
        Self { rest: 4.0, food: 5.0 }
    }
}

impl DecayRates {
    pub fn rate(&self, kind: NeedKind) -> f64 {
        match kind {
            NeedKind::Rest => self.rest,
            NeedKind::Food => self.food,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NeedStatus {
    Critical,
    Low,
    Medium,
    High,
}

impl NeedStatus {
    pub fn label(self) -> &'static str {
        match self {
            NeedStatus::Critical => "critical",
            NeedStatus::Low      => "low",
            NeedStatus::Medium   => "medium",
            NeedStatus::High     => "high",
        }
    }
}

/// Lower bands are inclusive: exactly 20 is critical, 40 low, 70 medium.
pub fn classify(value: f64) -> NeedStatus {
    if value <= CRITICAL_THRESHOLD {
        NeedStatus::Critical
    } else if value <= LOW_THRESHOLD {
        NeedStatus::Low
    } else if value <= MEDIUM_THRESHOLD {
        NeedStatus::Medium
    } else {
        NeedStatus::High
    }
}

#[derive(Debug, Clone)]
pub struct NeedsEngine {
    rates:            DecayRates,
    base_interval_ms: u64,
}

impl Default for NeedsEngine {
    fn default() -> Self {
        Self::new(DecayRates::default(), BASE_INTERVAL_MS)
    }
}

impl NeedsEngine {
    pub fn new(rates: DecayRates, base_interval_ms: u64) -> Self {
        Self { rates, base_interval_ms: base_interval_ms.max(1) }
    }

    pub fn rates(&self) -> &DecayRates {
        &self.rates
    }

    /// Simulated hours covered by `elapsed_ms` of real time at `speed`.
    pub fn elapsed_sim_hours(&self, elapsed_ms: i64, speed: ClockSpeed) -> f64 {
        (elapsed_ms as f64 / self.base_interval_ms as f64) * f64::from(speed.multiplier())
    }

    pub fn update_needs(
        &self,
        character: &Character,
        now: Timestamp,
        speed: ClockSpeed,
    ) -> Character {
        let Some(last_update) = character.needs.last_update else {
            // First observation: nothing to measure against yet.
            let mut updated = character.clone();
            updated.needs.last_update = Some(now);
            return updated;
        };

        let elapsed_ms = now.saturating_sub(last_update);
        if speed.is_paused() || elapsed_ms <= 0 {
            return character.clone();
        }

        let hours = self.elapsed_sim_hours(elapsed_ms, speed);
        let mut updated = character.clone();
        for need in &mut updated.needs.needs {
            let decay = self.rates.rate(need.kind) * hours;
            *need = need.with_value((need.value() - decay).max(0.0));
        }
        updated.needs.last_update = Some(now);

        log::trace!(
            "needs decayed for {} over {hours:.3}h at {speed:?}",
            character.id
        );
        updated
    }

    /// Each character is evaluated independently.
    pub fn update_all(
        &self,
        characters: &[Character],
        now: Timestamp,
        speed: ClockSpeed,
    ) -> Vec<Character> {
        characters
            .iter()
            .map(|c| self.update_needs(c, now, speed))
            .collect()
    }

    /// Raise `kind` by `amount`, capped at 100. Negative amounts are rejected.
    pub fn satisfy_need(
        &self,
        character: &Character,
        kind: NeedKind,
        amount: f64,
    ) -> SimResult<Character> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(SimError::NegativeSatisfaction { amount });
        }
        let mut updated = character.clone();
        for need in updated.needs.needs.iter_mut().filter(|n| n.kind == kind) {
            *need = need.with_value((need.value() + amount).min(NEED_MAX));
        }
        Ok(updated)
    }
}
