//! Reply Engine Port - Interface for persona reply generation.
//!
//! The session store hands a reply engine a read-only view of the
//! conversation after a turn's intelligence has been merged and consumes
//! the produced reply text. Engines may be rule-based or LLM-backed.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoEngine;
//!
//! #[async_trait]
//! impl ReplyEngine for EchoEngine {
//!     async fn generate_reply(&self, context: &ConversationContext) -> Result<String, ReplyError> {
//!         Ok(format!("You said: {}", context.latest_message))
//!     }
//!
//!     fn engine_name(&self) -> &'static str {
//!         "echo"
//!     }
//! }
//! ```

use async_trait::async_trait;
use std::collections::BTreeSet;

use crate::domain::classification::{RedFlag, ScamCategory};
use crate::domain::foundation::{SessionId, TraceId};
use crate::domain::intelligence::IntelligenceLedger;
use crate::domain::session::{ConversationMessage, MessageMetadata, SessionState};

/// Port for generating the persona's next reply.
#[async_trait]
pub trait ReplyEngine: Send + Sync {
    /// Produce the next reply for the conversation.
    async fn generate_reply(&self, context: &ConversationContext) -> Result<String, ReplyError>;

    /// Short identifier used in logs.
    fn engine_name(&self) -> &'static str;
}

/// Conversation view supplied to a reply engine.
#[derive(Debug, Clone)]
pub struct ConversationContext {
    pub session_id: SessionId,
    /// Turn number of the message being answered.
    pub turn: u32,
    /// Text of the scammer message being answered.
    pub latest_message: String,
    /// Trailing window of the transcript, oldest first.
    pub recent_messages: Vec<ConversationMessage>,
    /// Replies already sent in this session.
    pub previous_replies: Vec<String>,
    pub scam_category: Option<ScamCategory>,
    pub scam_detected: bool,
    pub red_flags: BTreeSet<RedFlag>,
    pub intelligence: IntelligenceLedger,
    pub metadata: Option<MessageMetadata>,
    /// Trace ID for correlating engine calls with the turn.
    pub trace_id: TraceId,
}

impl ConversationContext {
    /// Snapshot of `state` with the last `window` messages.
    pub fn from_state(
        state: &SessionState,
        latest_message: impl Into<String>,
        window: usize,
        trace_id: TraceId,
    ) -> Self {
        Self {
            session_id: state.id().clone(),
            turn: state.turn_count(),
            latest_message: latest_message.into(),
            recent_messages: state.recent_messages(window).to_vec(),
            previous_replies: state.sent_replies().map(str::to_string).collect(),
            scam_category: state.scam_category(),
            scam_detected: state.scam_detected(),
            red_flags: state.red_flags().clone(),
            intelligence: state.intelligence().clone(),
            metadata: state.metadata().cloned(),
            trace_id,
        }
    }
}

/// Reply generation errors.
#[derive(Debug, thiserror::Error)]
pub enum ReplyError {
    /// Rate limited by the backing service.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Backing service is unavailable or not configured.
    #[error("reply engine unavailable: {message}")]
    Unavailable { message: String },

    /// API token rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse the service response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Generated text failed quality checks.
    #[error("unusable reply: {0}")]
    Unusable(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },
}

impl ReplyError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn unusable(message: impl Into<String>) -> Self {
        Self::Unusable(message.into())
    }

    /// Returns true if a retry against the same engine could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ReplyError::RateLimited { .. }
                | ReplyError::Unavailable { .. }
                | ReplyError::Network(_)
                | ReplyError::Timeout { .. }
        )
    }
}
