//! ClassificationEngine - red-flag detection and category inference.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeSet;

use super::category::{infer_category, ScamCategory};
use super::red_flag::{RedFlag, RedFlagRule, RED_FLAG_RULES};
use crate::domain::intelligence::IntelligenceLedger;

/// Result of classifying one turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Category after applying the refinement policy to the prior one.
    pub category: ScamCategory,
    /// Flags raised by this turn's text that were not already present.
    pub new_red_flags: BTreeSet<RedFlag>,
}

struct CompiledFlagRule {
    flag: RedFlag,
    regex: Regex,
}

/// Stateless classifier over accumulated session evidence.
pub struct ClassificationEngine {
    rules: Vec<CompiledFlagRule>,
}

impl ClassificationEngine {
    pub fn new() -> Self {
        Self::from_rules(RED_FLAG_RULES)
    }

    /// Compiles a custom rule table. Rules that fail to compile are skipped.
    pub fn from_rules(rules: &[RedFlagRule]) -> Self {
        let rules = rules
            .iter()
            .filter_map(|rule| match Regex::new(rule.pattern) {
                Ok(regex) => Some(CompiledFlagRule {
                    flag: rule.flag,
                    regex,
                }),
                Err(e) => {
                    tracing::warn!(flag = %rule.flag, error = %e, "Red flag rule failed to compile; rule disabled");
                    None
                }
            })
            .collect();
        Self { rules }
    }

    /// Flags triggered by `text` alone.
    pub fn detect_red_flags(&self, text: &str) -> BTreeSet<RedFlag> {
        self.rules
            .iter()
            .filter(|rule| rule.regex.is_match(text))
            .map(|rule| rule.flag)
            .collect()
    }

    /// Classifies a turn.
    ///
    /// `entities` must already include this turn's merged entities;
    /// `red_flags_so_far` are the flags accumulated before this turn.
    pub fn classify(
        &self,
        prior: Option<ScamCategory>,
        entities: &IntelligenceLedger,
        red_flags_so_far: &BTreeSet<RedFlag>,
        new_text: &str,
    ) -> Classification {
        let new_red_flags: BTreeSet<RedFlag> = self
            .detect_red_flags(new_text)
            .difference(red_flags_so_far)
            .copied()
            .collect();

        let all_flags: BTreeSet<RedFlag> = red_flags_so_far.union(&new_red_flags).copied().collect();
        let inferred = infer_category(entities, &all_flags);

        Classification {
            category: ScamCategory::refine(prior, inferred),
            new_red_flags,
        }
    }
}

impl Default for ClassificationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ClassificationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassificationEngine")
            .field("active_rules", &self.rules.len())
            .finish()
    }
}
