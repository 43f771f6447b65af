//! Application layer - orchestrates domain operations across ports.
//!
//! The session store is the single owner of conversation state. Transport
//! adapters receive it by injection and never touch `SessionState` mutably.

pub mod session_store;

pub use session_store::{
    ProcessTurnCommand, SessionStore, TurnOutcome, DEFAULT_CONTEXT_MESSAGES, FALLBACK_REPLY,
};
