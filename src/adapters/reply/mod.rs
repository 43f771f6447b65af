//! Reply engine adapters.

mod fallback;
mod huggingface;
mod mock;
mod rule_based;

pub use fallback::FallbackReplyEngine;
pub use huggingface::{clean_generation, HfConfig, HuggingFaceReplyEngine};
pub use mock::MockReplyEngine;
pub use rule_based::{ReplyBucket, RuleBasedReplyEngine};
