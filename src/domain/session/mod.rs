//! Session module - per-conversation honeypot state.

mod errors;
mod message;
mod state;

pub use errors::SessionError;
pub use message::{ConversationMessage, MessageMetadata, Sender, MAX_MESSAGE_LENGTH};
pub use state::SessionState;
