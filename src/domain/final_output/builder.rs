//! FinalOutputBuilder - pure projection of session state into a report.

use serde::{Deserialize, Serialize};

use super::policy::{EngagementPolicy, OutputStatus};
use crate::domain::classification::RedFlag;
use crate::domain::foundation::SessionId;
use crate::domain::intelligence::{EntityKind, IntelligenceLedger};
use crate::domain::session::SessionState;

/// Upper bound on the reported confidence.
const MAX_CONFIDENCE: f64 = 0.99;
const BASE_CONFIDENCE: f64 = 0.5;
const PER_FLAG: f64 = 0.08;
const PER_ENTITY_KIND: f64 = 0.05;

/// Intelligence grouped per kind, each list in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedIntelligence {
    pub phone_numbers: Vec<String>,
    pub bank_accounts: Vec<String>,
    pub upi_ids: Vec<String>,
    pub phishing_links: Vec<String>,
    pub email_addresses: Vec<String>,
    pub otp_codes: Vec<String>,
    pub amounts: Vec<String>,
    pub person_names: Vec<String>,
    pub ifsc_codes: Vec<String>,
    pub case_ids: Vec<String>,
}

impl ExtractedIntelligence {
    pub fn from_ledger(ledger: &IntelligenceLedger) -> Self {
        Self {
            phone_numbers: ledger.values(EntityKind::Phone),
            bank_accounts: ledger.values(EntityKind::BankAccount),
            upi_ids: ledger.values(EntityKind::UpiId),
            phishing_links: ledger.values(EntityKind::PhishingLink),
            email_addresses: ledger.values(EntityKind::Email),
            otp_codes: ledger.values(EntityKind::OtpCode),
            amounts: ledger.values(EntityKind::Amount),
            person_names: ledger.values(EntityKind::PersonName),
            ifsc_codes: ledger.values(EntityKind::IfscCode),
            case_ids: ledger.values(EntityKind::CaseId),
        }
    }
}

/// Summary report for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalOutput {
    pub session_id: SessionId,
    pub scam_detected: bool,
    pub scam_type: String,
    pub confidence_level: f64,
    pub total_messages_exchanged: usize,
    pub turn_count: u32,
    pub engagement_duration_seconds: i64,
    pub extracted_intelligence: ExtractedIntelligence,
    pub red_flags: Vec<RedFlag>,
    pub status: OutputStatus,
    pub is_final: bool,
    pub agent_notes: String,
}

/// Builds [`FinalOutput`] reports from session snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct FinalOutputBuilder;

impl FinalOutputBuilder {
    /// Builds a report. Identical snapshots always produce identical reports.
    pub fn build(state: &SessionState, policy: &EngagementPolicy) -> FinalOutput {
        let status = policy.status_for(state.turn_count());
        let scam_detected = state.scam_detected();
        let red_flags: Vec<RedFlag> = state.red_flags().iter().copied().collect();
        let kinds_present = state.intelligence().kinds_present().count();

        let scam_type = match state.scam_category() {
            _ if !scam_detected => "none".to_string(),
            Some(category) => category.to_string(),
            None => "unknown".to_string(),
        };

        let duration = state
            .last_activity_at()
            .duration_since(&state.created_at())
            .num_seconds()
            .max(1);

        FinalOutput {
            session_id: state.id().clone(),
            scam_detected,
            confidence_level: confidence(scam_detected, red_flags.len(), kinds_present),
            total_messages_exchanged: state.messages().len(),
            turn_count: state.turn_count(),
            engagement_duration_seconds: duration,
            extracted_intelligence: ExtractedIntelligence::from_ledger(state.intelligence()),
            agent_notes: agent_notes(state, &scam_type, &red_flags),
            scam_type,
            red_flags,
            status,
            is_final: status == OutputStatus::Terminal,
        }
    }
}

fn confidence(scam_detected: bool, flags: usize, kinds: usize) -> f64 {
    if !scam_detected {
        return 0.0;
    }
    let raw = BASE_CONFIDENCE + PER_FLAG * flags as f64 + PER_ENTITY_KIND * kinds as f64;
    (raw.min(MAX_CONFIDENCE) * 100.0).round() / 100.0
}

fn agent_notes(state: &SessionState, scam_type: &str, red_flags: &[RedFlag]) -> String {
    if !state.scam_detected() {
        return format!(
            "No scam indicators detected across {} turn(s). Persona asked {} question(s).",
            state.turn_count(),
            state.questions_asked()
        );
    }

    let flags = if red_flags.is_empty() {
        "none".to_string()
    } else {
        red_flags
            .iter()
            .map(RedFlag::describe)
            .collect::<Vec<_>>()
            .join(", ")
    };

    let gathered: Vec<String> = state
        .intelligence()
        .kinds_present()
        .map(|kind| format!("{} {}", state.intelligence().records(kind).len(), kind))
        .collect();
    let gathered = if gathered.is_empty() {
        "no identifiers yet".to_string()
    } else {
        gathered.join(", ")
    };

    format!(
        "Scam type detected: {}. Red flags identified: {}. Intelligence gathered: {}. \
         Persona asked {} question(s) over {} turn(s) and {} message(s).",
        scam_type,
        flags,
        gathered,
        state.questions_asked(),
        state.turn_count(),
        state.messages().len()
    )
}
