//! Data Transfer Objects for the honeypot HTTP API.
//!
//! These types define the JSON request/response contracts and are separate
//! from domain types so the wire format can evolve independently.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::ProcessTurnCommand;
use crate::domain::foundation::Timestamp;
use crate::domain::session::{MessageMetadata, SessionError, Sender};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /honeypot`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoneypotRequest {
    pub session_id: String,
    pub message: IncomingMessage,
    /// Accepted for compatibility; the store keeps its own transcript.
    #[serde(default)]
    pub conversation_history: Option<Vec<Value>>,
    #[serde(default)]
    pub metadata: Option<MessageMetadata>,
}

/// The message part of a honeypot request.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub sender: String,
    pub text: String,
    /// RFC 3339 string, epoch milliseconds (string or number), or absent.
    #[serde(default)]
    pub timestamp: Option<Value>,
}

impl HoneypotRequest {
    /// Converts the request into a turn command.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an unrecognized sender or an unparseable timestamp.
    /// Everything else is validated by the session store.
    pub fn into_command(self) -> Result<ProcessTurnCommand, SessionError> {
        let sender = parse_sender(&self.message.sender)?;
        let timestamp = parse_timestamp(self.message.timestamp.as_ref())?;

        Ok(ProcessTurnCommand {
            session_id: self.session_id,
            sender,
            text: self.message.text,
            timestamp,
            metadata: self.metadata,
        })
    }
}

fn parse_sender(raw: &str) -> Result<Sender, SessionError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "scammer" => Ok(Sender::Scammer),
        "user" => Ok(Sender::User),
        other => Err(SessionError::invalid_input(
            "sender",
            format!("unknown sender '{}'", other),
        )),
    }
}

fn parse_timestamp(raw: Option<&Value>) -> Result<Option<Timestamp>, SessionError> {
    let invalid = || SessionError::invalid_input("timestamp", "expected RFC 3339 or epoch milliseconds");

    match raw {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Timestamp::parse_lenient(s).map(Some).ok_or_else(invalid),
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().and_then(float_millis))
            .and_then(Timestamp::from_unix_millis)
            .map(Some)
            .ok_or_else(invalid),
        Some(_) => Err(invalid()),
    }
}

/// Whole milliseconds from a JSON float; `None` unless finite and within `i64`.
fn float_millis(f: f64) -> Option<i64> {
    const LIMIT: f64 = 9_223_372_036_854_775_807.0;
    if f.is_finite() && f.abs() < LIMIT {
        Some(f.trunc() as i64)
    } else {
        None
    }
}

/// Body of `POST /final-output`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalOutputRequest {
    pub session_id: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoneypotResponse {
    pub status: String,
    pub reply: String,
}

impl HoneypotResponse {
    pub fn success(reply: impl Into<String>) -> Self {
        Self {
            status: "success".to_string(),
            reply: reply.into(),
        }
    }
}

/// Service banner for `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootResponse {
    pub message: String,
    pub version: String,
    pub status: String,
}

impl Default for RootResponse {
    fn default() -> Self {
        Self {
            message: "Honeypot API Running".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            status: "active".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Timestamp::now().to_rfc3339(),
        }
    }
}

/// Standard error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}
