//! Per-session conversation state.
//!
//! Mutators are crate-private: the only way to reach a `&mut SessionState`
//! for a live session is through the session store's per-session lock.

use serde::Serialize;
use std::collections::BTreeSet;

use super::message::{ConversationMessage, MessageMetadata};
use crate::domain::classification::{Classification, RedFlag, ScamCategory};
use crate::domain::foundation::{SessionId, Timestamp};
use crate::domain::intelligence::{ExtractedEntity, ExtractionResult, IntelligenceLedger};

/// Accumulated state of one honeypot conversation.
///
/// # Invariants
///
/// - `intelligence` and `red_flags` only grow
/// - `turn_count` grows by exactly one per processed scammer message
/// - once known, `scam_category` only moves to a more specific category
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    id: SessionId,
    turn_count: u32,
    messages: Vec<ConversationMessage>,
    intelligence: IntelligenceLedger,
    red_flags: BTreeSet<RedFlag>,
    scam_category: Option<ScamCategory>,
    last_final_output_turn: u32,
    questions_asked: u32,
    metadata: Option<MessageMetadata>,
    created_at: Timestamp,
    last_activity_at: Timestamp,
}

impl SessionState {
    /// Creates an empty session first seen at `now`.
    pub fn new(id: SessionId, now: Timestamp) -> Self {
        Self {
            id,
            turn_count: 0,
            messages: Vec::new(),
            intelligence: IntelligenceLedger::new(),
            red_flags: BTreeSet::new(),
            scam_category: None,
            last_final_output_turn: 0,
            questions_asked: 0,
            metadata: None,
            created_at: now,
            last_activity_at: now,
        }
    }

    // ═══════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn messages(&self) -> &[ConversationMessage] {
        &self.messages
    }

    /// Last `n` messages in transcript order.
    pub fn recent_messages(&self, n: usize) -> &[ConversationMessage] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    pub fn intelligence(&self) -> &IntelligenceLedger {
        &self.intelligence
    }

    pub fn red_flags(&self) -> &BTreeSet<RedFlag> {
        &self.red_flags
    }

    pub fn scam_category(&self) -> Option<ScamCategory> {
        self.scam_category
    }

    pub fn last_final_output_turn(&self) -> u32 {
        self.last_final_output_turn
    }

    /// Questions our persona has asked so far.
    pub fn questions_asked(&self) -> u32 {
        self.questions_asked
    }

    pub fn metadata(&self) -> Option<&MessageMetadata> {
        self.metadata.as_ref()
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn last_activity_at(&self) -> Timestamp {
        self.last_activity_at
    }

    /// A scam is detected once the category is known or any flag is raised.
    pub fn scam_detected(&self) -> bool {
        self.scam_category.is_some_and(|c| c.is_known()) || !self.red_flags.is_empty()
    }

    /// Replies already sent by our persona.
    pub fn sent_replies(&self) -> impl Iterator<Item = &str> {
        self.messages
            .iter()
            .filter(|m| m.sender == super::message::Sender::User)
            .map(|m| m.text.as_str())
    }

    // ═══════════════════════════════════════════════════════════════════
    // Merge steps
    // ═══════════════════════════════════════════════════════════════════

    pub(crate) fn append_message(&mut self, message: ConversationMessage) {
        self.messages.push(message);
    }

    /// Merges entities tagged with `turn`. Returns those not seen before.
    pub(crate) fn merge_entities(
        &mut self,
        extracted: &ExtractionResult,
        turn: u32,
    ) -> Vec<ExtractedEntity> {
        extracted
            .iter()
            .filter(|entity| self.intelligence.record(entity, turn))
            .cloned()
            .collect()
    }

    /// Unions new flags and applies the already-refined category.
    pub(crate) fn apply_classification(&mut self, classification: &Classification) {
        self.red_flags.extend(classification.new_red_flags.iter().copied());
        self.scam_category = Some(ScamCategory::refine(
            self.scam_category,
            classification.category,
        ));
    }

    /// Increments the turn counter and returns the new value.
    pub(crate) fn advance_turn(&mut self) -> u32 {
        self.turn_count += 1;
        self.turn_count
    }

    pub(crate) fn record_reply(&mut self, reply: &str, at: Timestamp) {
        self.questions_asked += reply.matches('?').count() as u32;
        self.messages.push(ConversationMessage::reply(reply, at));
    }

    pub(crate) fn set_metadata(&mut self, metadata: MessageMetadata) {
        self.metadata = Some(metadata);
    }

    /// Moves `last_activity_at` forward; never backwards.
    pub(crate) fn touch(&mut self, at: Timestamp) {
        if at > self.last_activity_at {
            self.last_activity_at = at;
        }
    }

    pub(crate) fn mark_final_output(&mut self, turn: u32) {
        self.last_final_output_turn = turn;
    }
}
