//! Reply engine configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Reply engine configuration (Hugging Face inference, with rule-based fallback)
#[derive(Debug, Clone, Deserialize)]
pub struct ReplyConfig {
    /// Hugging Face API token; unset means rule-based replies only
    pub hf_api_token: Option<Secret<String>>,

    #[serde(default = "default_model")]
    pub hf_model: String,

    #[serde(default = "default_base_url")]
    pub hf_base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_new_tokens")]
    pub max_new_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Transcript messages included in the prompt
    #[serde(default = "default_context_messages")]
    pub context_messages: usize,
}

impl ReplyConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if the Hugging Face engine is configured
    pub fn has_huggingface(&self) -> bool {
        self.hf_api_token
            .as_ref()
            .is_some_and(|t| !t.expose_secret().trim().is_empty())
    }

    /// Validate reply configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout("reply.timeout_secs"));
        }
        if self.max_new_tokens == 0 {
            return Err(ValidationError::OutOfRange("reply.max_new_tokens"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::OutOfRange("reply.temperature"));
        }
        if self.context_messages == 0 {
            return Err(ValidationError::OutOfRange("reply.context_messages"));
        }
        Ok(())
    }
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            hf_api_token: None,
            hf_model: default_model(),
            hf_base_url: default_base_url(),
            timeout_secs: default_timeout(),
            max_new_tokens: default_max_new_tokens(),
            temperature: default_temperature(),
            context_messages: default_context_messages(),
        }
    }
}

fn default_model() -> String {
    "mistralai/Mistral-7B-Instruct-v0.3".to_string()
}

fn default_base_url() -> String {
    "https://api-inference.huggingface.co/models".to_string()
}

fn default_timeout() -> u64 {
    15
}

fn default_max_new_tokens() -> u32 {
    100
}

fn default_temperature() -> f32 {
    0.7
}

fn default_context_messages() -> usize {
    6
}
