//! Characters and their need-state.

use crate::types::{CharacterId, Timestamp};
use serde::{Deserialize, Serialize};

pub const NEED_MIN: f64 = 0.0;
pub const NEED_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum NeedKind {
    Rest,
    Food,
}

impl NeedKind {
    pub const ALL: [NeedKind; 2] = [NeedKind::Rest, NeedKind::Food];

    pub fn label(self) -> &'static str {
        match self {
            NeedKind::Rest => "rest",
            NeedKind::Food => "food",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(from = "NeedRecord")]
pub struct Need {
    pub kind: NeedKind,
    value:    f64,
}

/// Wire form of a Need; values are clamped on the way in.
#[derive(Deserialize)]
struct NeedRecord {
    kind:  NeedKind,
    value: f64,
}

impl From<NeedRecord> for Need {
    fn from(r: NeedRecord) -> Self {
        Need::new(r.kind, r.value)
    }
}

impl Need {
    /// Out-of-range values are clamped into [0, 100].
    pub fn new(kind: NeedKind, value: f64) -> Self {
        Self { kind, value: clamp_need(value) }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub(crate) fn with_value(self, value: f64) -> Self {
        Self::new(self.kind, value)
    }
}

fn clamp_need(value: f64) -> f64 {
    if value.is_nan() {
        return NEED_MIN;
    }
    value.clamp(NEED_MIN, NEED_MAX)
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NeedState {
    pub needs:       Vec<Need>,
    /// `None` until the first decay evaluation.
    pub last_update: Option<Timestamp>,
}

impl Default for NeedState {
    /// Every need full, never evaluated.
    fn default() -> Self {
        Self {
            needs: NeedKind::ALL
                .into_iter()
                .map(|kind| Need::new(kind, NEED_MAX))
                .collect(),
            last_update: None,
        }
    }
}

impl NeedState {
    pub fn get(&self, kind: NeedKind) -> Option<&Need> {
        self.needs.iter().find(|n| n.kind == kind)
    }

    /// The lowest need, if any.
    pub fn most_urgent(&self) -> Option<&Need> {
        self.needs
            .iter()
            .min_by(|a, b| a.value.total_cmp(&b.value))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Character {
    pub id:    CharacterId,
    pub name:  String,
    pub needs: NeedState,
}

impl Character {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id:    uuid::Uuid::new_v4().to_string(),
            name:  name.into(),
            needs: NeedState::default(),
        }
    }

    pub fn need(&self, kind: NeedKind) -> Option<f64> {
        self.needs.get(kind).map(Need::value)
    }

    pub fn last_update(&self) -> Option<Timestamp> {
        self.needs.last_update
    }
}
