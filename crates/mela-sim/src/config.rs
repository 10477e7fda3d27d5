//! Simulation configuration.

use serde::Deserialize;

/// Tunable parameters for the crowd simulation loop.
///
/// Deserialized from the engine's YAML configuration file; every field
/// has a default so an empty mapping is a valid configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SimConfig {
    /// Seed for the simulation's random number generator. A fixed seed
    /// makes a run reproducible tick for tick.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Milliseconds between simulation ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

fn default_seed() -> u64 {
    42
}

fn default_tick_interval_ms() -> u64 {
    30_000
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl SimConfig {
    /// The tick interval as a [`std::time::Duration`].
    ///
    /// Floored at one millisecond so a zero in the configuration cannot
    /// produce a busy loop.
    pub const fn tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(if self.tick_interval_ms == 0 {
            1
        } else {
            self.tick_interval_ms
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_to_an_empty_mapping() {
        let config: SimConfig = serde_json::from_str("{}").unwrap_or_default();
        assert_eq!(config.seed, 42);
        assert_eq!(config.tick_interval_ms, 30_000);
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config: SimConfig =
            serde_json::from_str(r#"{"seed": 7, "tick_interval_ms": 100}"#).unwrap_or_default();
        assert_eq!(config.seed, 7);
        assert_eq!(config.tick_interval_ms, 100);
    }

    #[test]
    fn zero_interval_is_floored() {
        let config = SimConfig {
            seed: 1,
            tick_interval_ms: 0,
        };
        assert_eq!(config.tick_interval(), std::time::Duration::from_millis(1));
    }
}
