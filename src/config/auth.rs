//! API key configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::error::ValidationError;

/// Shared-secret authentication for the protected routes
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Expected `x-api-key` value; unset disables the check
    pub api_key: Option<Secret<String>>,
}

impl AuthConfig {
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }

    /// Validate authentication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        match &self.api_key {
            Some(key) if key.expose_secret().trim().is_empty() => Err(ValidationError::EmptyApiKey),
            _ => Ok(()),
        }
    }
}
