//! Engagement and final-output configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::domain::final_output::EngagementPolicy;

/// When reports are emitted and where they are delivered
#[derive(Debug, Clone, Deserialize)]
pub struct EngagementConfig {
    /// First turn that emits a progressive report
    #[serde(default = "default_min_turn")]
    pub final_output_min_turn: u32,

    /// Turn at which reports become terminal
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,

    /// Collector endpoint for emitted reports
    pub callback_url: Option<String>,

    #[serde(default = "default_callback_timeout")]
    pub callback_timeout_secs: u64,
}

impl EngagementConfig {
    pub fn policy(&self) -> EngagementPolicy {
        EngagementPolicy::new(self.final_output_min_turn, self.max_turns)
    }

    pub fn callback_timeout(&self) -> Duration {
        Duration::from_secs(self.callback_timeout_secs)
    }

    /// Validate engagement configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.final_output_min_turn == 0 {
            return Err(ValidationError::InvalidMinTurn);
        }
        if self.max_turns < self.final_output_min_turn {
            return Err(ValidationError::MaxTurnsBelowMinTurn {
                min_turn: self.final_output_min_turn,
                max_turns: self.max_turns,
            });
        }
        if let Some(url) = &self.callback_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ValidationError::InvalidCallbackUrl);
            }
        }
        if self.callback_timeout_secs == 0 || self.callback_timeout_secs > 120 {
            return Err(ValidationError::InvalidTimeout("engagement.callback_timeout_secs"));
        }
        Ok(())
    }
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            final_output_min_turn: default_min_turn(),
            max_turns: default_max_turns(),
            callback_url: None,
            callback_timeout_secs: default_callback_timeout(),
        }
    }
}

fn default_min_turn() -> u32 {
    EngagementPolicy::DEFAULT_MIN_TURN
}

fn default_max_turns() -> u32 {
    EngagementPolicy::DEFAULT_MAX_TURNS
}

fn default_callback_timeout() -> u64 {
    10
}
