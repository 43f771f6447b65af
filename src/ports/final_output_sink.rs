//! Final Output Sink Port - Delivery of session reports to an external collector.

use async_trait::async_trait;

use crate::domain::final_output::FinalOutput;

/// Port for submitting final-output reports.
///
/// Delivery is best effort: callers log failures and carry on.
#[async_trait]
pub trait FinalOutputSink: Send + Sync {
    async fn submit(&self, output: &FinalOutput) -> Result<(), SinkError>;
}

/// Report delivery errors.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("network error: {0}")]
    Network(String),

    /// Collector answered with a non-success status.
    #[error("collector rejected report with status {status}")]
    Rejected { status: u16 },

    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_displays_status() {
        assert_eq!(
            SinkError::Rejected { status: 503 }.to_string(),
            "collector rejected report with status 503"
        );
    }
}
