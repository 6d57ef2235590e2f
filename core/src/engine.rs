//! The simulation engine — one clock, one needs engine, one roster.
//!
//! RULES:
//!   - The engine owns the only CalendarClock; consumers borrow it.
//!   - Needs are refreshed on demand, pulling speed and "now" from the clock.
//!   - All persistence goes through the injected KeyValueStore.

use crate::{
    character::{Character, NeedKind},
    clock::{CalendarClock, LoadOutcome},
    config::SimConfig,
    error::{SimError, SimResult},
    needs::NeedsEngine,
    store::KeyValueStore,
    types::CharacterId,
    wall_clock::{SystemWallClock, WallClock},
};

pub struct SimEngine {
    pub clock:  CalendarClock,
    pub needs:  NeedsEngine,
    characters: Vec<Character>,
    store:      Box<dyn KeyValueStore>,
}

impl SimEngine {
    pub fn new(
        config: &SimConfig,
        wall_clock: Box<dyn WallClock>,
        store: Box<dyn KeyValueStore>,
    ) -> Self {
        let clock = CalendarClock::with_settings(
            config.clock.start_time,
            config.clock.initial_speed,
            config.clock.base_interval_ms,
            wall_clock,
        );
        let needs = NeedsEngine::new(config.needs.decay_rates, config.clock.base_interval_ms);
        Self {
            clock,
            needs,
            characters: Vec::new(),
            store,
        }
    }

    /// Engine on the system wall clock. Call this outside of tests.
    pub fn build(config: &SimConfig, store: Box<dyn KeyValueStore>) -> Self {
        Self::new(config, Box::new(SystemWallClock::new()), store)
    }

    pub fn add_character(&mut self, name: impl Into<String>) -> CharacterId {
        let character = Character::new(name);
        let id = character.id.clone();
        log::debug!("character {} joined: {}", id, character.name);
        self.characters.push(character);
        id
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn character(&self, id: &str) -> Option<&Character> {
        self.characters.iter().find(|c| c.id == id)
    }

    /// Fire due ticks. Returns how many hours passed.
    pub fn poll(&mut self) -> u32 {
        self.clock.poll()
    }

    pub fn refresh_needs(&mut self) {
        let now = self.clock.now();
        let speed = self.clock.speed();
        self.characters = self.needs.update_all(&self.characters, now, speed);
    }

    pub fn satisfy(&mut self, id: &str, kind: NeedKind, amount: f64) -> SimResult<()> {
        let slot = self
            .characters
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| SimError::CharacterNotFound { id: id.to_string() })?;
        *slot = self.needs.satisfy_need(slot, kind, amount)?;
        Ok(())
    }

    pub fn save(&mut self) -> SimResult<()> {
        self.clock.save_state(self.store.as_mut())
    }

    pub fn load(&mut self) -> SimResult<LoadOutcome> {
        self.clock.load_state(self.store.as_ref())
    }
}
