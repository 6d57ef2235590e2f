//! Simulation engine tests — clock and needs wired together.

use colony_core::{
    character::NeedKind,
    clock::{ClockSpeed, LoadOutcome},
    config::SimConfig,
    engine::SimEngine,
    error::SimError,
    store::{MemoryStore, SimStore},
    wall_clock::ManualWallClock,
};

fn build(wall: &ManualWallClock) -> SimEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    SimEngine::new(
        &SimConfig::default_test(),
        Box::new(wall.clone()),
        Box::new(MemoryStore::new()),
    )
}

#[test]
fn needs_follow_the_clock_speed() {
    let wall = ManualWallClock::starting_at(0);
    let mut engine = build(&wall);
    let id = engine.add_character("Ada");

    engine.refresh_needs();
    assert_eq!(engine.character(&id).unwrap().last_update(), Some(0));

    engine.clock.start();
    wall.advance(300);
    assert_eq!(engine.poll(), 3);
    engine.refresh_needs();

    let ada = engine.character(&id).unwrap();
    assert_eq!(engine.clock.time().hour, 3);
    // Three simulated hours at 5 food/hour.
    assert_eq!(ada.need(NeedKind::Food), Some(85.0));
    assert_eq!(ada.need(NeedKind::Rest), Some(88.0));
}

#[test]
fn paused_engine_leaks_no_decay() {
    let wall = ManualWallClock::starting_at(0);
    let mut engine = build(&wall);
    let id = engine.add_character("Bram");
    engine.refresh_needs();

    engine.clock.set_speed(ClockSpeed::Paused);
    wall.advance(10_000);
    engine.refresh_needs();

    let bram = engine.character(&id).unwrap();
    assert_eq!(bram.need(NeedKind::Food), Some(100.0));
    assert_eq!(bram.last_update(), Some(0));
}

#[test]
fn satisfy_updates_the_roster() {
    let wall = ManualWallClock::starting_at(0);
    let mut engine = build(&wall);
    let id = engine.add_character("Cato");
    engine.refresh_needs();
    wall.advance(1_000);
    engine.refresh_needs();
    assert_eq!(engine.character(&id).unwrap().need(NeedKind::Food), Some(50.0));

    engine.satisfy(&id, NeedKind::Food, 30.0).unwrap();

    assert_eq!(engine.character(&id).unwrap().need(NeedKind::Food), Some(80.0));
}

#[test]
fn satisfy_unknown_character_fails() {
    let wall = ManualWallClock::starting_at(0);
    let mut engine = build(&wall);
    assert!(matches!(
        engine.satisfy("nobody", NeedKind::Rest, 10.0),
        Err(SimError::CharacterNotFound { .. })
    ));
}

#[test]
fn save_and_load_through_sqlite() {
    let store = SimStore::in_memory().expect("in-memory store");
    store.migrate().expect("migration");
    let wall = ManualWallClock::starting_at(0);
    let mut engine = SimEngine::new(
        &SimConfig::default_test(),
        Box::new(wall.clone()),
        Box::new(store),
    );

    assert_eq!(engine.load().unwrap(), LoadOutcome::NoSavedState);

    for _ in 0..30 {
        engine.clock.advance();
    }
    engine.clock.set_speed(ClockSpeed::VeryFast);
    engine.save().unwrap();

    // Move past the save point, then restore from the store.
    for _ in 0..5 {
        engine.clock.advance();
    }
    assert_eq!(engine.load().unwrap(), LoadOutcome::Restored);
    assert_eq!(engine.clock.time().day, 1);
    assert_eq!(engine.clock.time().hour, 6);
    assert_eq!(engine.clock.speed(), ClockSpeed::VeryFast);
}

#[test]
fn tick_period_and_decay_share_one_time_base() {
    let wall = ManualWallClock::starting_at(0);
    let mut engine = build(&wall);
    let base = engine.clock.base_interval_ms();
    for speed in ClockSpeed::ALL.into_iter().filter(|s| !s.is_paused()) {
        engine.clock.set_speed(speed);
        let period = engine.clock.tick_period_ms().unwrap();
        assert_eq!(period * u64::from(speed.multiplier()), base, "{speed:?}");
        // One tick's worth of real time is exactly one simulated hour of decay.
        assert_eq!(engine.needs.elapsed_sim_hours(period as i64, speed), 1.0, "{speed:?}");
    }
}
