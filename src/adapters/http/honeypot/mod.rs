//! HTTP adapter for honeypot endpoints.
//!
//! Exposes the session store via REST API:
//! - `GET /` - Service banner
//! - `GET /health` - Health check
//! - `POST /honeypot` - Process one scammer message, reply as the persona
//! - `POST /final-output` - Report for a session on demand
//! - `GET /session/:id` - Session snapshot for debugging

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{HoneypotApiError, HoneypotAppState};
pub use routes::honeypot_router;
