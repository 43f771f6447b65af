//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types
//! that form the vocabulary of the honeypot domain.

mod errors;
mod ids;
mod timestamp;

pub use errors::{ErrorCode, ValidationError};
pub use ids::{SessionId, TraceId, MAX_SESSION_ID_LENGTH};
pub use timestamp::Timestamp;
