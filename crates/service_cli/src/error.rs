//! Error types for the CLI.

use thiserror::Error;

/// CLI error type
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file or environment error
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Run parameters rejected by the engine
    #[error("Invalid parameters: {0}")]
    Parameters(#[from] mc_engine::ConfigError),

    /// Estimation run failed
    #[error("Engine error: {0}")]
    Engine(#[from] mc_engine::EngineError),

    /// JSON output failed
    #[error("Serialisation error: {0}")]
    Serialise(#[from] serde_json::Error),
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
