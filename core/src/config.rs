use crate::{
    calendar::SimulatedTime,
    character::NeedKind,
    clock::{ClockSpeed, BASE_INTERVAL_MS, BASE_INTERVAL_STEP_MS},
    needs::DecayRates,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClockConfig {
    /// Real milliseconds per simulated hour at Normal speed.
    pub base_interval_ms: u64,
    pub start_time: SimulatedTime,
    pub initial_speed: ClockSpeed,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            base_interval_ms: BASE_INTERVAL_MS,
            start_time: SimulatedTime::default(),
            initial_speed: ClockSpeed::Normal,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NeedsConfig {
    pub decay_rates: DecayRates,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub clock: ClockConfig,
    pub needs: NeedsConfig,
}

impl SimConfig {
    /// Load from the data/ directory.
    /// In tests, use SimConfig::default_test().
    pub fn load(data_dir: &str) -> anyhow::Result<Self> {
        let path = format!("{data_dir}/sim.json");
        let content = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: SimConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Cannot parse {path}: {e}"))?;

        config
            .validate()
            .map_err(|e| anyhow::anyhow!("{path}: {e}"))?;
        log::debug!("loaded config from {path}: {config:?}");
        Ok(config)
    }

    /// Reject values that would break calendar or decay arithmetic.
    /// Call again after overriding fields from the command line.
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.clock.start_time.is_normalized() {
            anyhow::bail!("start_time {:?} is not a valid date", self.clock.start_time);
        }
        let base = self.clock.base_interval_ms;
        if base == 0 || base % BASE_INTERVAL_STEP_MS != 0 {
            anyhow::bail!(
                "base_interval_ms must be a positive multiple of {BASE_INTERVAL_STEP_MS}, got {base}"
            );
        }
        for kind in NeedKind::ALL {
            let rate = self.needs.decay_rates.rate(kind);
            if !rate.is_finite() || rate < 0.0 {
                anyhow::bail!(
                    "decay rate for {} must be a non-negative number, got {rate}",
                    kind.label()
                );
            }
        }
        Ok(())
    }

    /// Config with hardcoded defaults for use in unit tests.
    /// A 100ms base interval keeps tick arithmetic in round numbers.
    pub fn default_test() -> Self {
        Self {
            clock: ClockConfig {
                base_interval_ms: 100,
                start_time: SimulatedTime { year: 5500, month: 0, day: 0, hour: 0 },
                initial_speed: ClockSpeed::Normal,
            },
            needs: NeedsConfig {
                decay_rates: DecayRates { rest: 4.0, food: 5.0 },
            },
        }
    }
}
