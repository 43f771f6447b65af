//! Hugging Face Reply Engine - persona replies from a hosted instruct model.
//!
//! Calls the Hugging Face inference API with a persona system prompt and the
//! trailing conversation window, then keeps only the first line of the
//! generation.
//!
//! # Configuration
//!
//! ```ignore
//! let config = HfConfig::new(token)
//!     .with_model("mistralai/Mistral-7B-Instruct-v0.3")
//!     .with_timeout(Duration::from_secs(15));
//!
//! let engine = HuggingFaceReplyEngine::new(config)?;
//! ```

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::session::Sender;
use crate::ports::{ConversationContext, ReplyEngine, ReplyError};

/// Shortest generation accepted as a reply.
pub const MIN_REPLY_CHARS: usize = 10;
/// Longest generation accepted as a reply.
pub const MAX_REPLY_CHARS: usize = 300;

const SYSTEM_PROMPT: &str = "You are playing the role of a naive, cautious person who just \
received a suspicious message. You are not very tech savvy. Stay in character, sound worried \
but cooperative, and never reveal that you suspect a scam. Never share real OTPs, PINs, \
passwords or account numbers. Keep the other person talking by asking for their name, \
employee ID, phone number, branch, official email, website or payment details so you can \
\"verify\" them.";

/// Configuration for the Hugging Face engine.
#[derive(Debug, Clone)]
pub struct HfConfig {
    api_token: Secret<String>,
    /// Model repository id.
    pub model: String,
    /// Inference API root (default: https://api-inference.huggingface.co/models).
    pub base_url: String,
    pub timeout: Duration,
    pub max_new_tokens: u32,
    pub temperature: f32,
    /// Messages of transcript included in the prompt.
    pub context_messages: usize,
}

impl HfConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: Secret::new(api_token.into()),
            model: "mistralai/Mistral-7B-Instruct-v0.3".to_string(),
            base_url: "https://api-inference.huggingface.co/models".to_string(),
            timeout: Duration::from_secs(15),
            max_new_tokens: 100,
            temperature: 0.7,
            context_messages: 6,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_new_tokens(mut self, max_new_tokens: u32) -> Self {
        self.max_new_tokens = max_new_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_context_messages(mut self, context_messages: usize) -> Self {
        self.context_messages = context_messages;
        self
    }

    fn api_token(&self) -> &str {
        self.api_token.expose_secret()
    }
}

/// Reply engine backed by the Hugging Face inference API.
pub struct HuggingFaceReplyEngine {
    config: HfConfig,
    client: Client,
}

impl HuggingFaceReplyEngine {
    /// Creates the engine; fails only if the HTTP client cannot be built.
    pub fn new(config: HfConfig) -> Result<Self, ReplyError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ReplyError::unavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn model_url(&self) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Builds the instruct prompt from the persona and the transcript window.
    pub fn build_prompt(&self, context: &ConversationContext) -> String {
        let window = context.recent_messages.len().saturating_sub(self.config.context_messages);
        let transcript = context.recent_messages[window..]
            .iter()
            .map(|m| match m.sender {
                Sender::Scammer => format!("Scammer: {}", m.text),
                Sender::User => format!("You: {}", m.text),
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "<s>[INST] {}\n\n{}\nRespond as the person being called (1-3 sentences, ask one question): [/INST]",
            SYSTEM_PROMPT, transcript
        )
    }

    fn to_request(&self, context: &ConversationContext) -> HfRequest {
        HfRequest {
            inputs: self.build_prompt(context),
            parameters: HfParameters {
                max_new_tokens: self.config.max_new_tokens,
                temperature: self.config.temperature,
                do_sample: true,
                return_full_text: false,
            },
        }
    }

    async fn send_request(&self, request: &HfRequest) -> Result<Response, ReplyError> {
        self.client
            .post(self.model_url())
            .header("Authorization", format!("Bearer {}", self.config.api_token()))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ReplyError::Timeout {
                        timeout_secs: self.config.timeout.as_secs(),
                    }
                } else if e.is_connect() {
                    ReplyError::network(format!("Connection failed: {}", e))
                } else {
                    ReplyError::network(e.to_string())
                }
            })
    }

    async fn handle_response_status(&self, response: Response) -> Result<Response, ReplyError> {
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(30);
        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(ReplyError::AuthenticationFailed),
            429 => Err(ReplyError::rate_limited(retry_after)),
            // 503 is also returned while the model is loading
            500..=599 => Err(ReplyError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(ReplyError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }
}

/// Trims a raw generation down to a usable reply.
pub fn clean_generation(raw: &str) -> Result<String, ReplyError> {
    let first_line = raw
        .trim()
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches('"')
        .trim();

    let chars = first_line.chars().count();
    if chars < MIN_REPLY_CHARS {
        return Err(ReplyError::unusable(format!("reply too short ({} chars)", chars)));
    }
    if chars > MAX_REPLY_CHARS {
        return Err(ReplyError::unusable(format!("reply too long ({} chars)", chars)));
    }
    Ok(first_line.to_string())
}

#[async_trait]
impl ReplyEngine for HuggingFaceReplyEngine {
    async fn generate_reply(&self, context: &ConversationContext) -> Result<String, ReplyError> {
        let request = self.to_request(context);
        let response = self.send_request(&request).await?;
        let response = self.handle_response_status(response).await?;

        let generations: Vec<HfGeneration> = response
            .json()
            .await
            .map_err(|e| ReplyError::parse(format!("Failed to parse response: {}", e)))?;

        let generation = generations
            .into_iter()
            .next()
            .ok_or_else(|| ReplyError::parse("No generations in response"))?;

        clean_generation(&generation.generated_text)
    }

    fn engine_name(&self) -> &'static str {
        "huggingface"
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Inference API wire types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct HfRequest {
    inputs: String,
    parameters: HfParameters,
}

#[derive(Debug, Serialize)]
struct HfParameters {
    max_new_tokens: u32,
    temperature: f32,
    do_sample: bool,
    return_full_text: bool,
}

#[derive(Debug, Deserialize)]
struct HfGeneration {
    #[serde(default)]
    generated_text: String,
}
