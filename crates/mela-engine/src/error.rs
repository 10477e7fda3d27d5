//! Error types for the engine binary.

use mela_observer::ServerError;

use crate::seed::SeedError;

/// Errors that can occur during engine startup or serving.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The configuration file could not be read.
    #[error("config read error: {0}")]
    ConfigRead(#[from] std::io::Error),

    /// The configuration file could not be parsed.
    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_yml::Error),

    /// Seeding the zone directory failed.
    #[error("seed error: {0}")]
    Seed(#[from] SeedError),

    /// The observer server failed to bind or serve.
    #[error("server error: {0}")]
    Server(#[from] ServerError),
}
