//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the core and the outside world. Adapters implement these ports.
//!
//! - `ReplyEngine` - Persona reply generation (rule-based or LLM-backed)
//! - `FinalOutputSink` - Delivery of session reports to a collector

mod final_output_sink;
mod reply_engine;

pub use final_output_sink::{FinalOutputSink, SinkError};
pub use reply_engine::{ConversationContext, ReplyEngine, ReplyError};
