//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid bind host: {0}")]
    InvalidHost(String),

    #[error("Timeout out of range: {0}")]
    InvalidTimeout(&'static str),

    #[error("API key must not be empty when set")]
    EmptyApiKey,

    #[error("final_output_min_turn must be at least 1")]
    InvalidMinTurn,

    #[error("max_turns ({max_turns}) is below final_output_min_turn ({min_turn})")]
    MaxTurnsBelowMinTurn { min_turn: u32, max_turns: u32 },

    #[error("Callback URL must use http or https")]
    InvalidCallbackUrl,

    #[error("Invalid value for {0}")]
    OutOfRange(&'static str),
}
