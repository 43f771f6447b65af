//! HTTP callback sink - POSTs final-output reports to a collector URL.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::domain::final_output::FinalOutput;
use crate::ports::{FinalOutputSink, SinkError};

/// Delivers reports as JSON to a fixed URL.
#[derive(Debug, Clone)]
pub struct HttpCallbackSink {
    url: String,
    timeout: Duration,
    client: Client,
}

impl HttpCallbackSink {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, SinkError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SinkError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            timeout,
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl FinalOutputSink for HttpCallbackSink {
    async fn submit(&self, output: &FinalOutput) -> Result<(), SinkError> {
        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(output)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SinkError::Timeout {
                        timeout_secs: self.timeout.as_secs(),
                    }
                } else {
                    SinkError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Rejected {
                status: status.as_u16(),
            });
        }

        tracing::info!(
            session_id = %output.session_id,
            status = ?output.status,
            turn = output.turn_count,
            "Final output delivered"
        );
        Ok(())
    }
}
