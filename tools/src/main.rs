//! sim-runner: headless colony clock runner.
//!
//! Usage:
//!   sim-runner --hours 48 --speed 10 --db colony.db
//!   sim-runner --hours 24 --base-ms 50 --colonists 3 --json

use anyhow::Result;
use colony_core::{
    character::NeedKind,
    clock::{ClockSpeed, LoadOutcome},
    config::SimConfig,
    engine::SimEngine,
    needs::{classify, CRITICAL_THRESHOLD},
    store::SimStore,
};
use std::env;

const COLONIST_NAMES: [&str; 6] = ["Ada", "Bram", "Cato", "Dara", "Esme", "Fen"];

/// Food restored when a colonist eats.
const MEAL_AMOUNT: f64 = 40.0;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let hours = parse_arg(&args, "--hours", 24u32);
    let colonists = parse_arg(&args, "--colonists", 3usize).min(COLONIST_NAMES.len());
    let json = args.iter().any(|a| a == "--json");
    let db = args
        .windows(2)
        .find(|w| w[0] == "--db")
        .map(|w| w[1].as_str())
        .unwrap_or(":memory:");
    let data_dir = args
        .windows(2)
        .find(|w| w[0] == "--data-dir")
        .map(|w| w[1].as_str())
        .unwrap_or("./data");

    let mut config = SimConfig::load(data_dir).unwrap_or_else(|e| {
        log::warn!("{e}; using built-in defaults");
        SimConfig::default()
    });
    config.clock.base_interval_ms = parse_arg(&args, "--base-ms", config.clock.base_interval_ms);
    config.validate()?;

    let store = SimStore::open(db)?;
    store.migrate()?;

    let mut engine = SimEngine::build(&config, Box::new(store));
    match engine.load()? {
        LoadOutcome::Restored => println!("Resumed saved clock at {}", engine.clock.time()),
        LoadOutcome::NoSavedState => {}
        LoadOutcome::Discarded { reason } => println!("Ignored corrupt save: {reason}"),
    }
    if let Some(raw) = args.windows(2).find(|w| w[0] == "--speed").map(|w| w[1].as_str()) {
        let speed: ClockSpeed = raw.parse()?;
        engine.clock.set_speed(speed);
    }

    if !json {
        println!("Colony clock — sim-runner");
        println!("  hours:     {hours}");
        println!("  speed:     {:?}", engine.clock.speed());
        println!("  period:    {:?} ms", engine.clock.tick_period_ms());
        println!("  db:        {db}");
        println!("  data_dir:  {data_dir}");
        println!();
        engine.clock.on_tick(|time: &colony_core::calendar::SimulatedTime| {
            println!("[{time}]");
        });
    }

    for name in COLONIST_NAMES.iter().take(colonists) {
        engine.add_character(*name);
    }
    // First observation stamps every colonist.
    engine.refresh_needs();

    if engine.clock.speed().is_paused() {
        println!("Clock is paused; nothing to run.");
    } else {
        run_loop(&mut engine, hours, json)?;
    }

    engine.save()?;
    if json {
        let summary = serde_json::json!({
            "clock": engine.clock.state(),
            "characters": engine.characters(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&engine);
    }
    Ok(())
}

fn run_loop(engine: &mut SimEngine, hours: u32, json: bool) -> Result<()> {
    engine.clock.start();
    let mut elapsed = 0u32;
    while elapsed < hours {
        if let Some(wait) = engine.clock.time_until_next_tick() {
            std::thread::sleep(wait);
        }
        let fired = engine.poll();
        if fired == 0 {
            continue;
        }
        elapsed += fired;
        engine.refresh_needs();
        feed_the_hungry(engine, json)?;
    }
    engine.clock.stop();
    Ok(())
}

fn feed_the_hungry(engine: &mut SimEngine, json: bool) -> Result<()> {
    let hungry: Vec<(String, String)> = engine
        .characters()
        .iter()
        .filter(|c| c.need(NeedKind::Food).is_some_and(|v| v <= CRITICAL_THRESHOLD))
        .map(|c| (c.id.clone(), c.name.clone()))
        .collect();
    for (id, name) in hungry {
        engine.satisfy(&id, NeedKind::Food, MEAL_AMOUNT)?;
        if !json {
            println!("  {name} eats a meal");
        }
    }
    Ok(())
}

fn print_summary(engine: &SimEngine) {
    println!();
    println!("=== RUN SUMMARY ===");
    println!("  time:   {}", engine.clock.time());
    println!("  speed:  {:?}", engine.clock.speed());
    for c in engine.characters() {
        let needs: Vec<String> = c
            .needs
            .needs
            .iter()
            .map(|n| format!("{} {:.1} ({})", n.kind.label(), n.value(), classify(n.value()).label()))
            .collect();
        println!("  {:<6} {}", c.name, needs.join(", "));
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
