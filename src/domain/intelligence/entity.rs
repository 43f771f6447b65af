//! Entity kinds and per-message extraction results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of intelligence extracted from scammer messages.
///
/// Declaration order is the canonical order used when grouping output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntityKind {
    Phone,
    BankAccount,
    UpiId,
    Email,
    PhishingLink,
    OtpCode,
    Amount,
    PersonName,
    IfscCode,
    CaseId,
}

impl EntityKind {
    /// All kinds in canonical order.
    pub const ALL: [EntityKind; 10] = [
        EntityKind::Phone,
        EntityKind::BankAccount,
        EntityKind::UpiId,
        EntityKind::Email,
        EntityKind::PhishingLink,
        EntityKind::OtpCode,
        EntityKind::Amount,
        EntityKind::PersonName,
        EntityKind::IfscCode,
        EntityKind::CaseId,
    ];

    /// Wire name of a single value of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Phone => "phone",
            EntityKind::BankAccount => "bankAccount",
            EntityKind::UpiId => "upiId",
            EntityKind::Email => "email",
            EntityKind::PhishingLink => "phishingLink",
            EntityKind::OtpCode => "otpCode",
            EntityKind::Amount => "amount",
            EntityKind::PersonName => "personName",
            EntityKind::IfscCode => "ifscCode",
            EntityKind::CaseId => "caseId",
        }
    }

    /// Key under which values of this kind are grouped in the final output.
    pub fn output_key(&self) -> &'static str {
        match self {
            EntityKind::Phone => "phoneNumbers",
            EntityKind::BankAccount => "bankAccounts",
            EntityKind::UpiId => "upiIds",
            EntityKind::Email => "emailAddresses",
            EntityKind::PhishingLink => "phishingLinks",
            EntityKind::OtpCode => "otpCodes",
            EntityKind::Amount => "amounts",
            EntityKind::PersonName => "personNames",
            EntityKind::IfscCode => "ifscCodes",
            EntityKind::CaseId => "caseIds",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A normalized entity found in a single message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedEntity {
    pub kind: EntityKind,
    /// Normalized value used for deduplication.
    pub value: String,
    /// Text span as it appeared in the message (first occurrence).
    pub raw: String,
}

impl ExtractedEntity {
    pub fn new(kind: EntityKind, value: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            raw: raw.into(),
        }
    }
}

/// Distinct entities extracted from one message, ordered by kind then value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExtractionResult {
    entities: Vec<ExtractedEntity>,
}

impl ExtractionResult {
    /// Builds a result from entities that are already distinct and ordered.
    pub(crate) fn from_sorted(entities: Vec<ExtractedEntity>) -> Self {
        Self { entities }
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExtractedEntity> {
        self.entities.iter()
    }

    /// Normalized values of one kind.
    pub fn values(&self, kind: EntityKind) -> Vec<&str> {
        self.entities
            .iter()
            .filter(|e| e.kind == kind)
            .map(|e| e.value.as_str())
            .collect()
    }

    /// True if a value of the given kind was extracted.
    pub fn contains(&self, kind: EntityKind, value: &str) -> bool {
        self.entities
            .iter()
            .any(|e| e.kind == kind && e.value == value)
    }

    pub fn into_vec(self) -> Vec<ExtractedEntity> {
        self.entities
    }
}

impl IntoIterator for ExtractionResult {
    type Item = ExtractedEntity;
    type IntoIter = std::vec::IntoIter<ExtractedEntity>;

    fn into_iter(self) -> Self::IntoIter {
        self.entities.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_kind_serializes_camel_case() {
        let json = serde_json::to_string(&EntityKind::BankAccount).unwrap();
        assert_eq!(json, "\"bankAccount\"");
        let json = serde_json::to_string(&EntityKind::UpiId).unwrap();
        assert_eq!(json, "\"upiId\"");
    }

    #[test]
    fn entity_kind_display_matches_wire_name() {
        for kind in EntityKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind));
        }
    }

    #[test]
    fn output_keys_are_unique() {
        let mut keys: Vec<_> = EntityKind::ALL.iter().map(|k| k.output_key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), EntityKind::ALL.len());
    }

    #[test]
    fn extraction_result_filters_by_kind() {
        let result = ExtractionResult::from_sorted(vec![
            ExtractedEntity::new(EntityKind::Phone, "9876543210", "9876543210"),
            ExtractedEntity::new(EntityKind::UpiId, "rahul@upi", "rahul@upi"),
        ]);
        assert_eq!(result.values(EntityKind::Phone), vec!["9876543210"]);
        assert!(result.contains(EntityKind::UpiId, "rahul@upi"));
        assert!(!result.contains(EntityKind::Email, "rahul@upi"));
    }
}
