//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `intelligence` - Entity extraction and the per-session intelligence ledger
//! - `classification` - Red-flag detection and scam categorization
//! - `session` - Conversation state and messages
//! - `final_output` - Session summary reports and emission policy

pub mod classification;
pub mod final_output;
pub mod foundation;
pub mod intelligence;
pub mod session;
