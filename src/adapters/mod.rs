//! Adapters - Implementations of ports and the HTTP transport.
//!
//! - `reply` - Reply engines (rule-based persona, Hugging Face, fallback, mock)
//! - `callback` - Final-output delivery over HTTP
//! - `http` - Axum router, handlers, and middleware

pub mod callback;
pub mod http;
pub mod reply;
