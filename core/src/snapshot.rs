//! Snapshot serialization — the persisted clock state.
//!
//! The key-value store keeps time and speed as two separate entries;
//! ClockState is the pair in memory and in JSON form.

use crate::{calendar::SimulatedTime, clock::ClockSpeed};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClockState {
    pub time:  SimulatedTime,
    pub speed: ClockSpeed,
}
