//! Conversation messages and incoming-message validation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Timestamp, ValidationError};

/// Longest accepted message text, in characters.
pub const MAX_MESSAGE_LENGTH: usize = 10_000;

/// Author of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// The suspected scammer (incoming).
    Scammer,
    /// Our persona (outgoing reply).
    User,
}

impl Sender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sender::Scammer => "scammer",
            Sender::User => "user",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in a session transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationMessage {
    pub sender: Sender,
    pub text: String,
    pub timestamp: Timestamp,
}

impl ConversationMessage {
    /// Validates and builds an incoming scammer message.
    ///
    /// # Errors
    ///
    /// - `InvalidFormat` if `sender` is not the scammer
    /// - `EmptyField` if the text is empty or whitespace
    /// - `TooLong` if the text exceeds [`MAX_MESSAGE_LENGTH`] characters
    pub fn incoming(
        sender: Sender,
        text: impl Into<String>,
        timestamp: Timestamp,
    ) -> Result<Self, ValidationError> {
        if sender != Sender::Scammer {
            return Err(ValidationError::invalid_format(
                "sender",
                format!("expected 'scammer', got '{}'", sender),
            ));
        }
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ValidationError::empty_field("text"));
        }
        let length = text.chars().count();
        if length > MAX_MESSAGE_LENGTH {
            return Err(ValidationError::too_long("text", MAX_MESSAGE_LENGTH, length));
        }
        Ok(Self {
            sender,
            text,
            timestamp,
        })
    }

    /// Builds an outgoing persona reply.
    pub fn reply(text: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            timestamp,
        }
    }
}

/// Optional channel details supplied with a message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageMetadata {
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub locale: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incoming_accepts_scammer_text() {
        let msg = ConversationMessage::incoming(Sender::Scammer, "hello", Timestamp::now()).unwrap();
        assert_eq!(msg.sender, Sender::Scammer);
        assert_eq!(msg.text, "hello");
    }

    #[test]
    fn incoming_rejects_user_sender() {
        let err = ConversationMessage::incoming(Sender::User, "hello", Timestamp::now()).unwrap_err();
        assert_eq!(err.field(), "sender");
    }

    #[test]
    fn incoming_rejects_blank_text() {
        let err = ConversationMessage::incoming(Sender::Scammer, "  \n", Timestamp::now()).unwrap_err();
        assert!(matches!(err, ValidationError::EmptyField { .. }));
    }

    #[test]
    fn incoming_enforces_length_in_characters() {
        let at_limit = "₹".repeat(MAX_MESSAGE_LENGTH);
        assert!(ConversationMessage::incoming(Sender::Scammer, at_limit, Timestamp::now()).is_ok());

        let over = "a".repeat(MAX_MESSAGE_LENGTH + 1);
        let err = ConversationMessage::incoming(Sender::Scammer, over, Timestamp::now()).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { .. }));
    }

    #[test]
    fn sender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Sender::Scammer).unwrap(), "\"scammer\"");
        let parsed: Sender = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(parsed, Sender::User);
    }
}
