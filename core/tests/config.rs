//! Configuration loading tests.

use colony_core::{calendar::SimulatedTime, clock::ClockSpeed, config::SimConfig};
use std::fs;
use std::path::PathBuf;

fn scratch_dir(name: &str, contents: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("colony-config-{name}-{}", std::process::id()));
    fs::create_dir_all(&dir).expect("create scratch dir");
    fs::write(dir.join("sim.json"), contents).expect("write sim.json");
    dir
}

#[test]
fn bundled_data_file_loads() {
    let data_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/../data");
    let config = SimConfig::load(data_dir).expect("load data/sim.json");
    assert_eq!(config, SimConfig::default());
}

#[test]
fn partial_file_falls_back_to_defaults() {
    let dir = scratch_dir("partial", r#"{ "clock": { "initial_speed": 10 } }"#);
    let config = SimConfig::load(dir.to_str().unwrap()).unwrap();

    assert_eq!(config.clock.initial_speed, ClockSpeed::UltraFast);
    assert_eq!(config.clock.base_interval_ms, 5000);
    assert_eq!(config.clock.start_time, SimulatedTime::default());
    assert_eq!(config.needs.decay_rates.food, 5.0);
}

#[test]
fn invalid_start_time_is_rejected() {
    let dir = scratch_dir(
        "bad-start",
        r#"{ "clock": { "start_time": { "year": 5500, "month": 3, "day": 30, "hour": 0 } } }"#,
    );
    let err = SimConfig::load(dir.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("start_time"), "{err}");
}

#[test]
fn unknown_speed_is_rejected() {
    let dir = scratch_dir("bad-speed", r#"{ "clock": { "initial_speed": 4 } }"#);
    assert!(SimConfig::load(dir.to_str().unwrap()).is_err());
}

#[test]
fn missing_directory_names_the_path() {
    let err = SimConfig::load("/definitely/not/here").unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here/sim.json"), "{err}");
}

#[test]
fn negative_decay_rate_is_rejected() {
    let dir = scratch_dir(
        "negative-rate",
        r#"{ "needs": { "decay_rates": { "rest": -4.0, "food": 5.0 } } }"#,
    );
    let err = SimConfig::load(dir.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("decay rate for rest"), "{err}");
}

#[test]
fn non_finite_decay_rate_is_rejected() {
    let mut config = SimConfig::default_test();
    config.needs.decay_rates.food = f64::INFINITY;
    assert!(config.validate().is_err());

    config.needs.decay_rates.food = f64::NAN;
    assert!(config.validate().is_err());
}

#[test]
fn zero_decay_rate_is_allowed() {
    let mut config = SimConfig::default_test();
    config.needs.decay_rates.rest = 0.0;
    assert!(config.validate().is_ok());
}

#[test]
fn base_interval_must_divide_evenly_across_speeds() {
    let dir = scratch_dir("uneven-base", r#"{ "clock": { "base_interval_ms": 7 } }"#);
    let err = SimConfig::load(dir.to_str().unwrap()).unwrap_err();
    assert!(err.to_string().contains("base_interval_ms"), "{err}");

    let mut config = SimConfig::default_test();
    config.clock.base_interval_ms = 0;
    assert!(config.validate().is_err());
    config.clock.base_interval_ms = 50;
    assert!(config.validate().is_ok());
}
