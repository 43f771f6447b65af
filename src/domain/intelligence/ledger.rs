//! Accumulated, union-only intelligence for one session.

use serde::Serialize;
use std::collections::BTreeMap;

use super::entity::{EntityKind, ExtractedEntity};

/// One distinct value of a kind, with where and when it was first seen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRecord {
    pub value: String,
    pub raw: String,
    pub first_seen_turn: u32,
}

/// Per-kind records ordered by first-seen turn, then value.
///
/// Records are only ever added. Re-recording a known value keeps the
/// original record, so earlier turns win.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct IntelligenceLedger {
    entries: BTreeMap<EntityKind, Vec<EntityRecord>>,
}

impl IntelligenceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an entity seen at `turn`. Returns `true` if it was new.
    pub fn record(&mut self, entity: &ExtractedEntity, turn: u32) -> bool {
        if self.contains(entity.kind, &entity.value) {
            return false;
        }
        let records = self.entries.entry(entity.kind).or_default();
        let position = records
            .partition_point(|r| (r.first_seen_turn, r.value.as_str()) < (turn, entity.value.as_str()));
        records.insert(
            position,
            EntityRecord {
                value: entity.value.clone(),
                raw: entity.raw.clone(),
                first_seen_turn: turn,
            },
        );
        true
    }

    pub fn contains(&self, kind: EntityKind, value: &str) -> bool {
        self.entries
            .get(&kind)
            .is_some_and(|records| records.iter().any(|r| r.value == value))
    }

    pub fn records(&self, kind: EntityKind) -> &[EntityRecord] {
        self.entries.get(&kind).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Values of one kind in first-seen order.
    pub fn values(&self, kind: EntityKind) -> Vec<String> {
        self.records(kind).iter().map(|r| r.value.clone()).collect()
    }

    pub fn has(&self, kind: EntityKind) -> bool {
        !self.records(kind).is_empty()
    }

    /// Kinds with at least one record, in canonical order.
    pub fn kinds_present(&self) -> impl Iterator<Item = EntityKind> + '_ {
        self.entries
            .iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(kind, _)| *kind)
    }

    /// Total number of records across all kinds.
    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if every record of `other` is also present here.
    pub fn is_superset_of(&self, other: &IntelligenceLedger) -> bool {
        other.entries.iter().all(|(kind, records)| {
            records.iter().all(|r| self.contains(*kind, &r.value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn phone(value: &str) -> ExtractedEntity {
        ExtractedEntity::new(EntityKind::Phone, value, value)
    }

    #[test]
    fn record_reports_new_values_only() {
        let mut ledger = IntelligenceLedger::new();
        assert!(ledger.record(&phone("9876543210"), 1));
        assert!(!ledger.record(&phone("9876543210"), 2));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn resubmission_keeps_earlier_turn() {
        let mut ledger = IntelligenceLedger::new();
        ledger.record(&phone("9876543210"), 1);
        ledger.record(&phone("9876543210"), 3);
        assert_eq!(ledger.records(EntityKind::Phone)[0].first_seen_turn, 1);
    }

    #[test]
    fn values_are_ordered_by_turn_then_value() {
        let mut ledger = IntelligenceLedger::new();
        ledger.record(&phone("9999999999"), 1);
        ledger.record(&phone("7000000000"), 2);
        ledger.record(&phone("8000000000"), 1);
        assert_eq!(
            ledger.values(EntityKind::Phone),
            vec!["8000000000", "9999999999", "7000000000"]
        );
    }

    #[test]
    fn kinds_present_follows_canonical_order() {
        let mut ledger = IntelligenceLedger::new();
        ledger.record(&ExtractedEntity::new(EntityKind::UpiId, "a@upi", "a@upi"), 1);
        ledger.record(&phone("9876543210"), 2);
        let kinds: Vec<_> = ledger.kinds_present().collect();
        assert_eq!(kinds, vec![EntityKind::Phone, EntityKind::UpiId]);
    }

    #[test]
    fn empty_ledger_has_nothing() {
        let ledger = IntelligenceLedger::new();
        assert!(ledger.is_empty());
        assert!(!ledger.has(EntityKind::Phone));
        assert!(ledger.records(EntityKind::Phone).is_empty());
    }

    proptest! {
        #[test]
        fn recording_never_shrinks(values in proptest::collection::vec("[6-9][0-9]{9}", 0..20)) {
            let mut ledger = IntelligenceLedger::new();
            for (turn, value) in values.iter().enumerate() {
                let before = ledger.clone();
                ledger.record(&phone(value), turn as u32 + 1);
                prop_assert!(ledger.is_superset_of(&before));
                prop_assert!(ledger.contains(EntityKind::Phone, value));
            }
        }
    }
}
