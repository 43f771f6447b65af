//! Classification domain module.
//!
//! Keyword red-flag detection and rule-based scam categorization with a
//! refinement policy that only ever makes a session's category more specific.

mod category;
mod engine;
mod red_flag;

pub use category::{
    infer_category, CategoryRule, Condition, ScamCategory, CATEGORY_RULES, CATEGORY_RULES_VERSION,
};
pub use engine::{Classification, ClassificationEngine};
pub use red_flag::{RedFlag, RedFlagRule, RED_FLAG_RULES};
