//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `HONEYPOT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use scam_honeypot::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {:?}", config.server.socket_addr());
//! ```

mod auth;
mod engagement;
mod error;
mod reply;
mod server;

pub use auth::AuthConfig;
pub use engagement::EngagementConfig;
pub use error::{ConfigError, ValidationError};
pub use reply::ReplyConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// rule-based honeypot on port 8000 with no API key and no callback.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// API key for protected routes
    #[serde(default)]
    pub auth: AuthConfig,

    /// Reply engine configuration (Hugging Face)
    #[serde(default)]
    pub reply: ReplyConfig,

    /// Final-output thresholds and callback
    #[serde(default)]
    pub engagement: EngagementConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `HONEYPOT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `HONEYPOT__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `HONEYPOT__REPLY__HF_API_TOKEN=...` -> `reply.hf_api_token = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("HONEYPOT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.auth.validate()?;
        self.reply.validate()?;
        self.engagement.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
