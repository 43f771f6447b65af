//! Declarative extraction rule table and disambiguation exclusions.
//!
//! Every rule runs independently against the full message text. Overlaps
//! between kinds are resolved afterwards by [`EXCLUSIONS`], which is
//! evaluated against the complete pre-exclusion candidate set.

use super::entity::EntityKind;

/// One extraction rule: a pattern and the capture group holding the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleDefinition {
    pub kind: EntityKind,
    pub pattern: &'static str,
    /// Capture group to extract; `0` is the whole match.
    pub group: usize,
}

impl RuleDefinition {
    pub const fn new(kind: EntityKind, pattern: &'static str, group: usize) -> Self {
        Self {
            kind,
            pattern,
            group,
        }
    }
}

/// Reasons a candidate of one kind is dropped in the post-pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    /// Span intersects a candidate of the given kind.
    Overlaps(EntityKind),
    /// Span lies inside (or equals) a candidate span of the given kind.
    WithinSpanOf(EntityKind),
    /// Span lies inside a strictly longer candidate span of the given kind.
    StrictlyWithinSpanOf(EntityKind),
    /// Digits equal the digits of a candidate of the given kind.
    SameDigitsAs(EntityKind),
    /// Digits alone form a recognized mobile number.
    LooksLikeMobile,
    /// Immediately preceded by `+` in the text.
    PrecededByPlus,
    /// Immediately followed by a decimal fraction in the text.
    FollowedByDecimal,
    /// `handle@domain` where the bare domain is a mailbox provider.
    MailProviderDomain,
}

/// Default rule table, evaluated in order.
pub const DEFAULT_RULES: &[RuleDefinition] = &[
    // phone
    RuleDefinition::new(
        EntityKind::Phone,
        r"\+[0-9]{1,3}(?:[-\s]?[0-9]{2,5}){2,4}\b",
        0,
    ),
    RuleDefinition::new(EntityKind::Phone, r"\b(?:0|91)?[6-9][0-9]{9}\b", 0),
    RuleDefinition::new(EntityKind::Phone, r"\b[6-9][0-9]{4}[-\s][0-9]{5}\b", 0),
    RuleDefinition::new(EntityKind::Phone, r"\b0[0-9]{10}\b", 0),
    // bank account
    RuleDefinition::new(EntityKind::BankAccount, r"\b[0-9]{9,18}\b", 0),
    // upi
    RuleDefinition::new(
        EntityKind::UpiId,
        r"\b[A-Za-z0-9][A-Za-z0-9._-]+@[A-Za-z][A-Za-z0-9]+\b",
        0,
    ),
    // email
    RuleDefinition::new(
        EntityKind::Email,
        r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9-]+(?:\.[A-Za-z0-9-]+)*\.[A-Za-z]{2,}\b",
        0,
    ),
    // links
    RuleDefinition::new(EntityKind::PhishingLink, r#"(?i)\bhttps?://[^\s<>"']+"#, 0),
    RuleDefinition::new(EntityKind::PhishingLink, r#"(?i)\bwww\.[^\s<>"']+"#, 0),
    RuleDefinition::new(
        EntityKind::PhishingLink,
        r"(?i)\b(?:bit\.ly|tinyurl\.com|t\.co|goo\.gl)/[A-Za-z0-9_-]+",
        0,
    ),
    // otp
    RuleDefinition::new(
        EntityKind::OtpCode,
        r"(?i)\b(?:otp|one[- ]time password|verification code|code|pin)\b[^0-9]{0,20}?([0-9]{4,8})\b",
        1,
    ),
    RuleDefinition::new(
        EntityKind::OtpCode,
        r"(?i)\b([0-9]{4,8})\s+is\s+your\s+(?:otp|code|pin)\b",
        1,
    ),
    // amount
    RuleDefinition::new(
        EntityKind::Amount,
        r"(?i)(?:₹|\brs\.?|\binr)\s?([0-9][0-9,]*(?:\.[0-9]{1,2})?)",
        1,
    ),
    RuleDefinition::new(
        EntityKind::Amount,
        r"(?i)\b([0-9][0-9,]*(?:\.[0-9]{1,2})?)\s?(?:rupees|rs|inr)\b",
        1,
    ),
    // person name
    RuleDefinition::new(
        EntityKind::PersonName,
        r"\b(?i:my name is|this is|i am|i'm|speaking with|myself)\s+([A-Z][a-z]+(?:\s+[A-Z][a-z]+)?)",
        1,
    ),
    // ifsc
    RuleDefinition::new(EntityKind::IfscCode, r"\b[A-Z]{4}0[A-Z0-9]{6}\b", 0),
    // case / reference identifiers
    RuleDefinition::new(EntityKind::CaseId, r"\b[A-Z]{2,5}-[0-9]{3,10}\b", 0),
    RuleDefinition::new(
        EntityKind::CaseId,
        r"(?i)\b(?:case|reference|ref|txn|order|policy|ticket|tkt|complaint)\s*(?:no\.?|number|id)?\s*[:#]?\s*([A-Z0-9][A-Z0-9-]{3,14})\b",
        1,
    ),
];

/// Post-pass exclusions as `(victim kind, reason)`.
pub const EXCLUSIONS: &[(EntityKind, Exclusion)] = &[
    (EntityKind::BankAccount, Exclusion::Overlaps(EntityKind::Phone)),
    (EntityKind::BankAccount, Exclusion::SameDigitsAs(EntityKind::Phone)),
    (EntityKind::BankAccount, Exclusion::LooksLikeMobile),
    (EntityKind::BankAccount, Exclusion::Overlaps(EntityKind::Amount)),
    (EntityKind::BankAccount, Exclusion::PrecededByPlus),
    (EntityKind::BankAccount, Exclusion::FollowedByDecimal),
    (EntityKind::BankAccount, Exclusion::StrictlyWithinSpanOf(EntityKind::CaseId)),
    (EntityKind::BankAccount, Exclusion::WithinSpanOf(EntityKind::PhishingLink)),
    (EntityKind::Phone, Exclusion::WithinSpanOf(EntityKind::PhishingLink)),
    (EntityKind::UpiId, Exclusion::Overlaps(EntityKind::Email)),
    (EntityKind::UpiId, Exclusion::MailProviderDomain),
    (EntityKind::UpiId, Exclusion::WithinSpanOf(EntityKind::PhishingLink)),
    (EntityKind::Email, Exclusion::WithinSpanOf(EntityKind::PhishingLink)),
    (EntityKind::PhishingLink, Exclusion::StrictlyWithinSpanOf(EntityKind::PhishingLink)),
    (EntityKind::CaseId, Exclusion::Overlaps(EntityKind::Phone)),
    (EntityKind::CaseId, Exclusion::Overlaps(EntityKind::IfscCode)),
    (EntityKind::CaseId, Exclusion::WithinSpanOf(EntityKind::BankAccount)),
];
