//! SessionStore - per-session serialized turn processing.
//!
//! Each session lives in its own slot. A turn holds the slot's writer lock
//! from validation through the reply call, so two turns of one session never
//! interleave while turns of different sessions run in parallel. Readers see
//! the snapshot published at the end of the last completed turn.
//!
//! A turn is applied to a working copy and committed in one step after the
//! reply is known. A turn whose future is dropped part way (request timeout,
//! client disconnect) leaves no trace in the session.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::domain::final_output::{EngagementPolicy, FinalOutput, FinalOutputBuilder};
use crate::domain::foundation::{SessionId, Timestamp, TraceId};
use crate::domain::classification::ClassificationEngine;
use crate::domain::intelligence::{ExtractedEntity, ExtractionEngine, ExtractionResult};
use crate::domain::session::{
    ConversationMessage, MessageMetadata, Sender, SessionError, SessionState,
};
use crate::ports::{ConversationContext, ReplyEngine};

/// Reply used when the reply engine fails.
pub const FALLBACK_REPLY: &str =
    "Sorry, I did not understand. Can you please explain again what I need to do?";

/// Default number of trailing messages handed to the reply engine.
pub const DEFAULT_CONTEXT_MESSAGES: usize = 6;

/// One incoming scammer message, as received from the transport.
#[derive(Debug, Clone)]
pub struct ProcessTurnCommand {
    pub session_id: String,
    pub sender: Sender,
    pub text: String,
    /// Client-supplied send time; defaults to the processing time.
    pub timestamp: Option<Timestamp>,
    pub metadata: Option<MessageMetadata>,
}

impl ProcessTurnCommand {
    /// Scammer message with no timestamp or metadata.
    pub fn scammer(session_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            sender: Sender::Scammer,
            text: text.into(),
            timestamp: None,
            metadata: None,
        }
    }

    pub fn with_timestamp(mut self, timestamp: Timestamp) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn with_metadata(mut self, metadata: MessageMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}

/// Result of a processed turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub reply: String,
    /// Everything extracted from this turn's message.
    pub extracted_this_turn: ExtractionResult,
    /// Entities this turn added to the session.
    pub newly_recorded: Vec<ExtractedEntity>,
    /// State published at the end of the turn.
    pub snapshot: SessionState,
    /// Present when the turn qualifies for a report.
    pub final_output: Option<FinalOutput>,
}

struct SessionSlot {
    /// Held for the whole of a turn.
    state: Mutex<SessionState>,
    /// Last fully processed state.
    published: RwLock<SessionState>,
}

impl SessionSlot {
    fn new(state: SessionState) -> Self {
        Self {
            published: RwLock::new(state.clone()),
            state: Mutex::new(state),
        }
    }
}

/// Owns every session and serializes access per session.
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, Arc<SessionSlot>>>,
    extractor: ExtractionEngine,
    classifier: ClassificationEngine,
    reply_engine: Arc<dyn ReplyEngine>,
    policy: EngagementPolicy,
    context_messages: usize,
}

impl SessionStore {
    pub fn new(reply_engine: Arc<dyn ReplyEngine>, policy: EngagementPolicy) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            extractor: ExtractionEngine::new(),
            classifier: ClassificationEngine::new(),
            reply_engine,
            policy,
            context_messages: DEFAULT_CONTEXT_MESSAGES,
        }
    }

    /// Sets how many trailing messages the reply engine sees.
    pub fn with_context_messages(mut self, n: usize) -> Self {
        self.context_messages = n;
        self
    }

    pub fn with_extractor(mut self, extractor: ExtractionEngine) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn policy(&self) -> &EngagementPolicy {
        &self.policy
    }

    /// Processes one scammer message end to end.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the session id or message fails validation; no
    ///   session is created or modified in that case
    pub async fn process_turn(&self, command: ProcessTurnCommand) -> Result<TurnOutcome, SessionError> {
        let received_at = Timestamp::now();
        let session_id = SessionId::new(command.session_id)?;
        let message = ConversationMessage::incoming(
            command.sender,
            command.text,
            command.timestamp.unwrap_or(received_at),
        )?;

        let slot = self.slot_for(&session_id, received_at).await;
        let mut guard = slot.state.lock().await;
        let trace_id = TraceId::new();

        // The turn runs on a copy. Dropping this future at any await below
        // leaves the locked state and the published snapshot untouched.
        let mut state = guard.clone();

        let text = message.text.clone();
        state.append_message(message);
        if let Some(metadata) = command.metadata {
            state.set_metadata(metadata);
        }

        let extracted = self.extractor.extract(&text);
        let turn = state.turn_count() + 1;
        let newly_recorded = state.merge_entities(&extracted, turn);

        let classification = self.classifier.classify(
            state.scam_category(),
            state.intelligence(),
            state.red_flags(),
            &text,
        );
        state.apply_classification(&classification);
        state.advance_turn();

        tracing::debug!(
            session_id = %session_id,
            turn,
            extracted = extracted.len(),
            new_entities = newly_recorded.len(),
            new_flags = classification.new_red_flags.len(),
            category = %classification.category,
            "Merged turn intelligence"
        );

        let context = ConversationContext::from_state(&state, text, self.context_messages, trace_id);
        let reply = match self.reply_engine.generate_reply(&context).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(
                    session_id = %session_id,
                    trace_id = %trace_id,
                    engine = self.reply_engine.engine_name(),
                    error = %e,
                    "Reply engine failed; using fallback reply"
                );
                FALLBACK_REPLY.to_string()
            }
        };

        let replied_at = Timestamp::now();
        state.record_reply(&reply, replied_at);
        state.touch(replied_at);

        let final_output = self.policy.eligibility(turn).map(|_| {
            state.mark_final_output(turn);
            FinalOutputBuilder::build(&state, &self.policy)
        });

        let mut published = slot.published.write().await;
        let snapshot = state;
        *guard = snapshot.clone();
        *published = snapshot.clone();
        drop(published);
        drop(guard);

        tracing::info!(
            session_id = %session_id,
            turn,
            scam_detected = snapshot.scam_detected(),
            final_output = final_output.is_some(),
            "Processed turn"
        );

        Ok(TurnOutcome {
            reply,
            extracted_this_turn: extracted,
            newly_recorded,
            snapshot,
            final_output,
        })
    }

    /// Last published state of a session.
    pub async fn get_session(&self, id: &SessionId) -> Result<SessionState, SessionError> {
        let slot = self.existing_slot(id).await?;
        let state = slot.published.read().await.clone();
        Ok(state)
    }

    /// Builds a report for a session at whatever turn it has reached.
    pub async fn final_output(&self, id: &SessionId) -> Result<FinalOutput, SessionError> {
        let state = self.get_session(id).await?;
        Ok(FinalOutputBuilder::build(&state, &self.policy))
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    async fn existing_slot(&self, id: &SessionId) -> Result<Arc<SessionSlot>, SessionError> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::unknown_session(id.clone()))
    }

    /// Fetches a slot, creating it under the write lock on first touch.
    async fn slot_for(&self, id: &SessionId, now: Timestamp) -> Arc<SessionSlot> {
        if let Some(slot) = self.sessions.read().await.get(id) {
            return Arc::clone(slot);
        }
        let mut sessions = self.sessions.write().await;
        let slot = sessions.entry(id.clone()).or_insert_with(|| {
            tracing::info!(session_id = %id, "Created session");
            Arc::new(SessionSlot::new(SessionState::new(id.clone(), now)))
        });
        Arc::clone(slot)
    }
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("reply_engine", &self.reply_engine.engine_name())
            .field("policy", &self.policy)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::reply::MockReplyEngine;
    use crate::domain::classification::{RedFlag, ScamCategory};
    use crate::domain::final_output::OutputStatus;
    use crate::domain::intelligence::EntityKind;
    use crate::ports::ReplyError;
    use std::time::Duration;

    fn store_with(engine: MockReplyEngine) -> SessionStore {
        SessionStore::new(Arc::new(engine), EngagementPolicy::default())
    }

    fn store() -> SessionStore {
        store_with(MockReplyEngine::new().with_default_response("Who is this?"))
    }

    fn id(raw: &str) -> SessionId {
        SessionId::new(raw).unwrap()
    }

    #[tokio::test]
    async fn first_turn_creates_session() {
        let store = store();
        let outcome = store
            .process_turn(ProcessTurnCommand::scammer("s1", "Hello"))
            .await
            .unwrap();
        assert_eq!(outcome.reply, "Who is this?");
        assert_eq!(outcome.snapshot.turn_count(), 1);
        assert_eq!(outcome.snapshot.messages().len(), 2);
        assert_eq!(store.session_count().await, 1);
    }

    #[tokio::test]
    async fn invalid_input_touches_nothing() {
        let store = store();
        let cases = vec![
            ProcessTurnCommand::scammer("", "hello"),
            ProcessTurnCommand::scammer("s1", "   "),
            ProcessTurnCommand::scammer("s1", "x".repeat(10_001)),
            ProcessTurnCommand {
                sender: Sender::User,
                ..ProcessTurnCommand::scammer("s1", "hello")
            },
        ];
        for command in cases {
            let err = store.process_turn(command).await.unwrap_err();
            assert!(matches!(err, SessionError::InvalidInput { .. }));
        }
        assert_eq!(store.session_count().await, 0);
    }

    #[tokio::test]
    async fn invalid_input_does_not_advance_existing_session() {
        let store = store();
        store
            .process_turn(ProcessTurnCommand::scammer("s1", "hello"))
            .await
            .unwrap();
        let _ = store.process_turn(ProcessTurnCommand::scammer("s1", "")).await;
        assert_eq!(store.get_session(&id("s1")).await.unwrap().turn_count(), 1);
    }

    #[tokio::test]
    async fn unknown_session_is_reported() {
        let store = store();
        let err = store.get_session(&id("missing")).await.unwrap_err();
        assert_eq!(err, SessionError::UnknownSession(id("missing")));
        assert!(store.final_output(&id("missing")).await.is_err());
    }

    #[tokio::test]
    async fn reply_failure_uses_fallback_and_keeps_merge() {
        let engine = MockReplyEngine::new().with_error(ReplyError::unavailable("down"));
        let store = store_with(engine);
        let outcome = store
            .process_turn(ProcessTurnCommand::scammer("s1", "call 9876543210"))
            .await
            .unwrap();
        assert_eq!(outcome.reply, FALLBACK_REPLY);
        assert!(outcome.snapshot.intelligence().contains(EntityKind::Phone, "9876543210"));
        assert_eq!(outcome.snapshot.turn_count(), 1);
    }

    #[tokio::test]
    async fn resubmission_keeps_first_seen_turn() {
        let store = store();
        store
            .process_turn(ProcessTurnCommand::scammer("s1", "call 9876543210"))
            .await
            .unwrap();
        let outcome = store
            .process_turn(ProcessTurnCommand::scammer("s1", "again 9876543210"))
            .await
            .unwrap();
        assert!(outcome.newly_recorded.is_empty());
        assert_eq!(
            outcome.snapshot.intelligence().records(EntityKind::Phone)[0].first_seen_turn,
            1
        );
    }

    #[tokio::test]
    async fn reply_engine_sees_merged_context() {
        let engine = MockReplyEngine::new().with_default_response("ok?");
        let probe = engine.clone();
        let store = store_with(engine);
        store
            .process_turn(ProcessTurnCommand::scammer("s1", "Send OTP to 9876543210 immediately"))
            .await
            .unwrap();

        let calls = probe.get_calls();
        assert_eq!(calls.len(), 1);
        let context = &calls[0];
        assert_eq!(context.turn, 1);
        assert!(context.intelligence.contains(EntityKind::Phone, "9876543210"));
        assert!(context.red_flags.contains(&RedFlag::OtpRequest));
        assert_eq!(context.latest_message, "Send OTP to 9876543210 immediately");
    }

    #[tokio::test]
    async fn final_output_starts_at_turn_five() {
        let store = store();
        let early_turns = [
            "Send OTP to 9876543210 immediately".to_string(),
            "Pay to rahul@upi".to_string(),
            "message 3".to_string(),
            "message 4".to_string(),
        ];
        for (i, text) in early_turns.into_iter().enumerate() {
            let outcome = store
                .process_turn(ProcessTurnCommand::scammer("s1", text))
                .await
                .unwrap();
            assert!(outcome.final_output.is_none(), "turn {}", i + 1);
        }
        let outcome = store
            .process_turn(ProcessTurnCommand::scammer("s1", "message 5"))
            .await
            .unwrap();
        let output = outcome.final_output.expect("turn 5 emits");
        assert_eq!(output.status, OutputStatus::Progressive);
        assert_eq!(output.turn_count, 5);
        assert_eq!(outcome.snapshot.last_final_output_turn(), 5);

        // Everything gathered before the first report is disclosed in it.
        assert_eq!(output.extracted_intelligence.phone_numbers, vec!["9876543210"]);
        assert_eq!(output.extracted_intelligence.upi_ids, vec!["rahul@upi"]);
        assert!(output.red_flags.contains(&RedFlag::Urgency));
        assert!(output.red_flags.contains(&RedFlag::OtpRequest));
        assert!(output.scam_detected);
    }

    #[tokio::test]
    async fn dropped_turn_leaves_session_untouched() {
        let engine = MockReplyEngine::new()
            .with_default_response("Which bank is this?")
            .with_delay(Duration::from_millis(200));
        let store = store_with(engine);

        let timed_out = tokio::time::timeout(
            Duration::from_millis(50),
            store.process_turn(ProcessTurnCommand::scammer("c", "call 9876543210")),
        )
        .await;
        assert!(timed_out.is_err());

        let after_drop = store.get_session(&id("c")).await.unwrap();
        assert_eq!(after_drop.turn_count(), 0);
        assert!(after_drop.messages().is_empty());
        assert!(!after_drop.intelligence().has(EntityKind::Phone));

        let outcome = store
            .process_turn(ProcessTurnCommand::scammer("c", "hello"))
            .await
            .unwrap();
        let snapshot = &outcome.snapshot;
        assert_eq!(snapshot.turn_count(), 1);
        let senders: Vec<Sender> = snapshot.messages().iter().map(|m| m.sender).collect();
        assert_eq!(senders, vec![Sender::Scammer, Sender::User]);
        assert!(!snapshot.intelligence().has(EntityKind::Phone));
    }

    #[tokio::test]
    async fn final_output_turns_terminal_at_max_turns() {
        let store = SessionStore::new(
            Arc::new(MockReplyEngine::new().with_default_response("hmm")),
            EngagementPolicy::new(2, 3),
        );
        let mut last = None;
        for turn in 1..=3 {
            last = store
                .process_turn(ProcessTurnCommand::scammer("s1", format!("turn {}", turn)))
                .await
                .unwrap()
                .final_output;
        }
        let output = last.unwrap();
        assert_eq!(output.status, OutputStatus::Terminal);
        assert!(output.is_final);
    }

    #[tokio::test]
    async fn explicit_final_output_available_on_turn_one() {
        let store = store();
        store
            .process_turn(ProcessTurnCommand::scammer("s1", "hello"))
            .await
            .unwrap();
        let output = store.final_output(&id("s1")).await.unwrap();
        assert_eq!(output.turn_count, 1);
        assert_eq!(output.status, OutputStatus::Progressive);
    }

    #[tokio::test]
    async fn end_to_end_bank_then_upi_fraud() {
        let store = store();
        let first = store
            .process_turn(ProcessTurnCommand::scammer(
                "e2e",
                "Your account is blocked, send OTP to 9876543210 immediately",
            ))
            .await
            .unwrap();
        let snapshot = &first.snapshot;
        assert_eq!(
            snapshot.red_flags().iter().copied().collect::<Vec<_>>(),
            vec![RedFlag::Urgency, RedFlag::OtpRequest]
        );
        assert_eq!(snapshot.intelligence().values(EntityKind::Phone), vec!["9876543210"]);
        assert_eq!(snapshot.scam_category(), Some(ScamCategory::BankFraud));

        let second = store
            .process_turn(ProcessTurnCommand::scammer(
                "e2e",
                "Transfer to rahul@upi now or account will be suspended",
            ))
            .await
            .unwrap();
        let snapshot = &second.snapshot;
        assert_eq!(snapshot.intelligence().values(EntityKind::UpiId), vec!["rahul@upi"]);
        assert!(snapshot.red_flags().contains(&RedFlag::ThreatOfConsequence));
        assert!(snapshot.red_flags().is_superset(first.snapshot.red_flags()));
        assert_eq!(snapshot.scam_category(), Some(ScamCategory::UpiFraud));

        let third = store
            .process_turn(ProcessTurnCommand::scammer("e2e", "Hello? Are you there?"))
            .await
            .unwrap();
        assert_eq!(third.snapshot.scam_category(), Some(ScamCategory::UpiFraud));
    }

    #[tokio::test]
    async fn concurrent_turns_on_one_session_are_serialized() {
        let engine = MockReplyEngine::new()
            .with_default_response("wait")
            .with_delay(Duration::from_millis(50));
        let store = Arc::new(store_with(engine));

        let a = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .process_turn(ProcessTurnCommand::scammer("shared", "call 9876543210"))
                    .await
            })
        };
        let b = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .process_turn(ProcessTurnCommand::scammer("shared", "pay to rahul@upi"))
                    .await
            })
        };
        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let state = store.get_session(&id("shared")).await.unwrap();
        assert_eq!(state.turn_count(), 2);
        assert_eq!(state.messages().len(), 4);
        assert!(state.intelligence().contains(EntityKind::Phone, "9876543210"));
        assert!(state.intelligence().contains(EntityKind::UpiId, "rahul@upi"));

        let mut turns: Vec<u32> = [EntityKind::Phone, EntityKind::UpiId]
            .iter()
            .map(|k| state.intelligence().records(*k)[0].first_seen_turn)
            .collect();
        turns.sort_unstable();
        assert_eq!(turns, vec![1, 2]);
    }

    #[tokio::test]
    async fn concurrent_first_touch_creates_one_session() {
        let store = Arc::new(store());
        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .process_turn(ProcessTurnCommand::scammer("burst", format!("hello {}", i)))
                        .await
                })
            })
            .collect();
        for handle in futures::future::join_all(handles).await {
            handle.unwrap().unwrap();
        }
        assert_eq!(store.session_count().await, 1);
        assert_eq!(store.get_session(&id("burst")).await.unwrap().turn_count(), 16);
    }

    #[tokio::test]
    async fn different_sessions_proceed_in_parallel() {
        let engine = MockReplyEngine::new()
            .with_default_response("hi")
            .with_delay(Duration::from_millis(100));
        let store = Arc::new(store_with(engine));
        let started = std::time::Instant::now();
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .process_turn(ProcessTurnCommand::scammer(format!("p{}", i), "hello"))
                        .await
                })
            })
            .collect();
        for handle in futures::future::join_all(handles).await {
            handle.unwrap().unwrap();
        }
        assert!(started.elapsed() < Duration::from_millis(350));
        assert_eq!(store.session_count().await, 4);
    }

    #[tokio::test]
    async fn readers_never_see_a_half_processed_turn() {
        let engine = MockReplyEngine::new()
            .with_default_response("slow")
            .with_delay(Duration::from_millis(80));
        let store = Arc::new(store_with(engine));
        store
            .process_turn(ProcessTurnCommand::scammer("r", "first"))
            .await
            .unwrap();

        let writer = {
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                store
                    .process_turn(ProcessTurnCommand::scammer("r", "call 9876543210"))
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        // Mid-turn: the phone is merged in the working copy but not published.
        let mid = store.get_session(&id("r")).await.unwrap();
        assert_eq!(mid.turn_count(), 1);
        assert_eq!(mid.messages().len(), 2);
        assert!(!mid.intelligence().has(EntityKind::Phone));

        writer.await.unwrap().unwrap();
        let done = store.get_session(&id("r")).await.unwrap();
        assert_eq!(done.turn_count(), 2);
        assert!(done.intelligence().has(EntityKind::Phone));
    }
}
