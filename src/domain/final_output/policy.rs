//! When a session qualifies for a final-output report.

use serde::{Deserialize, Serialize};

/// Whether a report is an interim update or the closing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputStatus {
    Progressive,
    Terminal,
}

/// Turn thresholds for final-output emission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngagementPolicy {
    /// First turn at which a progressive report is emitted.
    pub final_output_min_turn: u32,
    /// Turn at which the report becomes terminal.
    pub max_turns: u32,
}

impl EngagementPolicy {
    pub const DEFAULT_MIN_TURN: u32 = 5;
    pub const DEFAULT_MAX_TURNS: u32 = 10;

    pub fn new(final_output_min_turn: u32, max_turns: u32) -> Self {
        Self {
            final_output_min_turn,
            max_turns,
        }
    }

    /// Status a report emitted after `turn_count` turns carries, if any.
    pub fn eligibility(&self, turn_count: u32) -> Option<OutputStatus> {
        if turn_count >= self.max_turns {
            Some(OutputStatus::Terminal)
        } else if turn_count >= self.final_output_min_turn {
            Some(OutputStatus::Progressive)
        } else {
            None
        }
    }

    /// Status for an explicit request, which is always answerable.
    pub fn status_for(&self, turn_count: u32) -> OutputStatus {
        self.eligibility(turn_count)
            .unwrap_or(OutputStatus::Progressive)
    }
}

impl Default for EngagementPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MIN_TURN, Self::DEFAULT_MAX_TURNS)
    }
}
