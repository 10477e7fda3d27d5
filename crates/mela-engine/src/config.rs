//! Engine configuration, loaded from a YAML file.
//!
//! The file path comes from `MELA_CONFIG` (default `mela-config.yaml`).
//! A missing file is not an error: every section defaults, so the engine
//! runs out of the box.

use serde::Deserialize;
use tracing::info;

use mela_observer::ServerConfig;
use mela_sim::SimConfig;

use crate::error::EngineError;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "MELA_CONFIG";

/// Default configuration file path.
pub const DEFAULT_CONFIG_PATH: &str = "mela-config.yaml";

/// Complete engine configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EngineConfig {
    /// Observer HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Simulation loop settings.
    #[serde(default)]
    pub simulation: SimConfig,
}

impl EngineConfig {
    /// Load configuration from the path in `MELA_CONFIG`, falling back
    /// to `mela-config.yaml`, falling back to defaults if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if a file exists but cannot be read or parsed.
    /// An absent file is not an error.
    pub fn load() -> Result<Self, EngineError> {
        let path = std::env::var(CONFIG_ENV).unwrap_or_else(|_| String::from(DEFAULT_CONFIG_PATH));
        Self::load_from(&path)
    }

    /// Load configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if a file exists but cannot be read or parsed.
    pub fn load_from(path: &str) -> Result<Self, EngineError> {
        if !std::path::Path::new(path).exists() {
            info!(path, "No configuration file found, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_yml::from_str(&raw)?;
        info!(path, "Configuration loaded");
        Ok(config)
    }
}
