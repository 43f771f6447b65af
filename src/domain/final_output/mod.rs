//! Final-output module - session summary reports and emission policy.

mod builder;
mod policy;

pub use builder::{ExtractedIntelligence, FinalOutput, FinalOutputBuilder};
pub use policy::{EngagementPolicy, OutputStatus};
