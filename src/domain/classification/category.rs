//! Scam categories, their specificity tree, and the ordered inference rules.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::red_flag::RedFlag;
use crate::domain::intelligence::{EntityKind, IntelligenceLedger};

/// Scam category.
///
/// Categories form a tree rooted at `Unknown`:
///
/// ```text
/// unknown
/// └── fraud
///     ├── bank_fraud
///     │   └── upi_fraud
///     ├── phishing
///     ├── tech_support
///     ├── lottery_scam
///     └── insurance_fraud
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScamCategory {
    Unknown,
    Fraud,
    BankFraud,
    UpiFraud,
    Phishing,
    TechSupport,
    LotteryScam,
    InsuranceFraud,
}

impl ScamCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScamCategory::Unknown => "unknown",
            ScamCategory::Fraud => "fraud",
            ScamCategory::BankFraud => "bank_fraud",
            ScamCategory::UpiFraud => "upi_fraud",
            ScamCategory::Phishing => "phishing",
            ScamCategory::TechSupport => "tech_support",
            ScamCategory::LotteryScam => "lottery_scam",
            ScamCategory::InsuranceFraud => "insurance_fraud",
        }
    }

    /// Parent in the specificity tree; `None` for the root.
    pub fn parent(&self) -> Option<ScamCategory> {
        match self {
            ScamCategory::Unknown => None,
            ScamCategory::Fraud => Some(ScamCategory::Unknown),
            ScamCategory::BankFraud
            | ScamCategory::Phishing
            | ScamCategory::TechSupport
            | ScamCategory::LotteryScam
            | ScamCategory::InsuranceFraud => Some(ScamCategory::Fraud),
            ScamCategory::UpiFraud => Some(ScamCategory::BankFraud),
        }
    }

    /// True if `self` lies strictly below `ancestor` in the tree.
    pub fn is_strict_descendant_of(&self, ancestor: ScamCategory) -> bool {
        let mut current = self.parent();
        while let Some(category) = current {
            if category == ancestor {
                return true;
            }
            current = category.parent();
        }
        false
    }

    /// Applies the refinement policy: a known category only moves to a
    /// strict descendant, never sideways or back up.
    pub fn refine(prior: Option<ScamCategory>, inferred: ScamCategory) -> ScamCategory {
        match prior {
            None | Some(ScamCategory::Unknown) => inferred,
            Some(prior) if inferred.is_strict_descendant_of(prior) => inferred,
            Some(prior) => prior,
        }
    }

    pub fn is_known(&self) -> bool {
        *self != ScamCategory::Unknown
    }
}

impl fmt::Display for ScamCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition of a category rule, evaluated against accumulated state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    AnyEntity(&'static [EntityKind]),
    AnyFlag(&'static [RedFlag]),
    AllFlags(&'static [RedFlag]),
    AnyEntityOrFlag(&'static [EntityKind], &'static [RedFlag]),
    EntityAndFlag(&'static [EntityKind], &'static [RedFlag]),
    Always,
}

impl Condition {
    pub fn holds(&self, ledger: &IntelligenceLedger, flags: &BTreeSet<RedFlag>) -> bool {
        let any_entity = |kinds: &[EntityKind]| kinds.iter().any(|k| ledger.has(*k));
        let any_flag = |wanted: &[RedFlag]| wanted.iter().any(|f| flags.contains(f));
        match *self {
            Condition::AnyEntity(kinds) => any_entity(kinds),
            Condition::AnyFlag(wanted) => any_flag(wanted),
            Condition::AllFlags(wanted) => wanted.iter().all(|f| flags.contains(f)),
            Condition::AnyEntityOrFlag(kinds, wanted) => any_entity(kinds) || any_flag(wanted),
            Condition::EntityAndFlag(kinds, wanted) => any_entity(kinds) && any_flag(wanted),
            Condition::Always => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryRule {
    pub condition: Condition,
    pub category: ScamCategory,
}

/// Bumped whenever [`CATEGORY_RULES`] changes meaning.
pub const CATEGORY_RULES_VERSION: u32 = 2;

const BANK_IDENTIFIERS: &[EntityKind] = &[EntityKind::BankAccount, EntityKind::IfscCode];

/// Ordered category rules; the first rule whose condition holds wins.
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        condition: Condition::AnyEntity(&[EntityKind::UpiId]),
        category: ScamCategory::UpiFraud,
    },
    CategoryRule {
        condition: Condition::AnyEntityOrFlag(
            &[EntityKind::PhishingLink],
            &[RedFlag::SuspiciousLink],
        ),
        category: ScamCategory::Phishing,
    },
    CategoryRule {
        condition: Condition::AnyFlag(&[RedFlag::RemoteAccess]),
        category: ScamCategory::TechSupport,
    },
    CategoryRule {
        condition: Condition::AllFlags(&[RedFlag::Impersonation, RedFlag::TechSupportPretext]),
        category: ScamCategory::TechSupport,
    },
    CategoryRule {
        condition: Condition::AnyFlag(&[RedFlag::InsurancePretext]),
        category: ScamCategory::InsuranceFraud,
    },
    CategoryRule {
        condition: Condition::EntityAndFlag(BANK_IDENTIFIERS, &[RedFlag::PaymentRequest]),
        category: ScamCategory::BankFraud,
    },
    CategoryRule {
        condition: Condition::AnyFlag(&[RedFlag::OtpRequest, RedFlag::CredentialRequest]),
        category: ScamCategory::BankFraud,
    },
    CategoryRule {
        condition: Condition::AnyFlag(&[RedFlag::RewardLure]),
        category: ScamCategory::LotteryScam,
    },
    CategoryRule {
        condition: Condition::AnyEntity(BANK_IDENTIFIERS),
        category: ScamCategory::BankFraud,
    },
    CategoryRule {
        condition: Condition::AnyFlag(&[
            RedFlag::Urgency,
            RedFlag::ThreatOfConsequence,
            RedFlag::Impersonation,
            RedFlag::PaymentRequest,
        ]),
        category: ScamCategory::Fraud,
    },
    CategoryRule {
        condition: Condition::Always,
        category: ScamCategory::Unknown,
    },
];

/// Category of the first matching rule.
pub fn infer_category(ledger: &IntelligenceLedger, flags: &BTreeSet<RedFlag>) -> ScamCategory {
    CATEGORY_RULES
        .iter()
        .find(|rule| rule.condition.holds(ledger, flags))
        .map(|rule| rule.category)
        .unwrap_or(ScamCategory::Unknown)
}
