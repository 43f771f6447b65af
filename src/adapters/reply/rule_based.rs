//! Rule-based persona reply engine.
//!
//! Picks a canned reply for a naive, cautious victim persona. The bucket is
//! chosen from keywords in the latest scammer message and the turn number;
//! within a bucket the first reply not yet used in the session is taken,
//! starting at an offset derived from the turn so selection is deterministic.

use async_trait::async_trait;

use crate::ports::{ConversationContext, ReplyEngine, ReplyError};

/// Reply bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyBucket {
    Early,
    Mid,
    Late,
    Otp,
    Upi,
    Link,
    Account,
    Benign,
}

impl ReplyBucket {
    fn replies(&self) -> &'static [&'static str] {
        match self {
            ReplyBucket::Early => EARLY,
            ReplyBucket::Mid => MID,
            ReplyBucket::Late => LATE,
            ReplyBucket::Otp => OTP,
            ReplyBucket::Upi => UPI,
            ReplyBucket::Link => LINK,
            ReplyBucket::Account => ACCOUNT,
            ReplyBucket::Benign => BENIGN,
        }
    }

    /// Stage bucket for a 1-based turn.
    fn for_stage(turn: u32) -> Self {
        match turn.saturating_sub(1) {
            0..=2 => ReplyBucket::Early,
            3..=5 => ReplyBucket::Mid,
            _ => ReplyBucket::Late,
        }
    }
}

const EARLY: &[&str] = &[
    "Oh my, this sounds serious! Can you please tell me your name and employee ID so I can note it down?",
    "I'm really worried now. Can you share your official phone number so I can call you back to verify?",
    "This is concerning. Which branch are you calling from? I want to make sure this is legitimate.",
    "Oh no, what should I do? Can you please give me a reference number for this case?",
    "I want to cooperate but I'm scared. Can you tell me your department and designation first?",
];

const MID: &[&str] = &[
    "I understand the urgency, but my family told me to always verify. Can you share your official email ID?",
    "Can you give me your supervisor's name and number? I'd like to confirm before sharing anything.",
    "What is the official website where I can check this myself? I want to be careful.",
    "My son told me to never share OTP on phone. Can you send me an official letter instead?",
    "I'm at home right now. Can I visit the nearest branch to resolve this? Which branch should I go to?",
];

const LATE: &[&str] = &[
    "I've been noting everything down. Can you give me the full address of your office for my records?",
    "Before we proceed, can you spell out your full name and share your direct extension number?",
    "My neighbor said I should ask for documentation. Can you email me proof at my email address?",
    "I want to help but this has taken so long. Can you share one more verification detail for my safety?",
    "I'll cooperate but I'm writing everything down. What is your company's registered address?",
];

const OTP: &[&str] = &[
    "I'm not sure what an OTP is. Can you explain the process? And why do you need it exactly?",
    "My phone is showing some numbers. But first, can you verify my account number to prove who you are?",
    "I received something on my phone. But my daughter said I should never share it. Can you explain why it's needed?",
];

const UPI: &[&str] = &[
    "I'm not very familiar with UPI. Can you share your official UPI ID first so I know where to send?",
    "My son usually handles UPI payments. Can you tell me your registered business name on UPI?",
    "Which UPI app should I use? And can you confirm your registered phone number with the UPI account?",
];

const LINK: &[&str] = &[
    "I'm worried about clicking links. Can you tell me the official website domain so I can type it manually?",
    "The link looks different from what I usually see. Can you confirm this is the official company website?",
    "My antivirus is warning me about this link. Can you send it from your official email address instead?",
];

const ACCOUNT: &[&str] = &[
    "I don't remember my full account number. Which branch opened my account? Can you verify from your end?",
    "Before I share anything, can you tell me the last transaction on my account to prove you have access?",
    "My account details are with my spouse. Can you share your reference number and I'll call back?",
];

const BENIGN: &[&str] = &[
    "Hello! Yes, I'm doing well, thank you. How can I help you?",
    "Sure, that sounds nice. What did you have in mind?",
    "Thank you for reaching out. Could you tell me more about what you need?",
    "I'm good, thanks for asking! What's going on?",
    "That sounds great! Let me know the details.",
];

/// Substrings that make a message look like a scam attempt.
const SCAM_SIGNALS: &[&str] = &[
    "otp", "verify", "urgent", "blocked", "suspended", "kyc", "fraud", "security", "transaction",
    "click", "link", "immediately", "expired", "penalty", "legal", "arrest", "fee", "charge",
    "transfer", "pin", "password", "cvv", "compromised", "won", "prize", "lottery", "cashback",
    "offer", "claim", "reward", "congratulations", "selected", "http", "www", "bank", "account",
    "warning", "fast", "act now", "last chance", "final", "expire", "hurry", "reference",
    "department", "officer", "employee",
];

/// Bucket order tried when the chosen bucket is used up.
const OVERFLOW: [ReplyBucket; 3] = [ReplyBucket::Mid, ReplyBucket::Late, ReplyBucket::Early];

/// Deterministic persona reply engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleBasedReplyEngine;

impl RuleBasedReplyEngine {
    pub fn new() -> Self {
        Self
    }

    /// Bucket for a message, ignoring session history.
    pub fn classify_message(text: &str, turn: u32) -> ReplyBucket {
        let t = text.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|n| t.contains(n));

        if !has(SCAM_SIGNALS) {
            return ReplyBucket::Benign;
        }
        if has(&["otp", "one time", "verification code"]) {
            ReplyBucket::Otp
        } else if has(&["upi", "paytm", "gpay", "phonepe"]) {
            ReplyBucket::Upi
        } else if has(&["link", "click", "http", "www", "url"]) {
            ReplyBucket::Link
        } else if has(&["account", "bank", "balance", "transfer"]) {
            ReplyBucket::Account
        } else {
            ReplyBucket::for_stage(turn)
        }
    }

    /// Bucket for the turn in `context`; a detected scam never gets a benign reply.
    pub fn select_bucket(context: &ConversationContext) -> ReplyBucket {
        match Self::classify_message(&context.latest_message, context.turn) {
            ReplyBucket::Benign if context.scam_detected => ReplyBucket::for_stage(context.turn),
            bucket => bucket,
        }
    }

    /// Chooses a reply that has not been sent in this session yet.
    pub fn choose(context: &ConversationContext) -> &'static str {
        let bucket = Self::select_bucket(context);
        let used = |reply: &&str| context.previous_replies.iter().any(|r| r == reply);
        let offset = context.turn as usize;

        let pick = |candidates: &'static [&'static str]| -> Option<&'static str> {
            let fresh: Vec<&'static str> = candidates.iter().copied().filter(|r| !used(r)).collect();
            if fresh.is_empty() {
                None
            } else {
                Some(fresh[offset % fresh.len()])
            }
        };

        pick(bucket.replies())
            .or_else(|| {
                OVERFLOW
                    .iter()
                    .filter(|b| **b != bucket)
                    .find_map(|b| pick(b.replies()))
            })
            .unwrap_or_else(|| {
                let replies = bucket.replies();
                replies[offset % replies.len()]
            })
    }
}

#[async_trait]
impl ReplyEngine for RuleBasedReplyEngine {
    async fn generate_reply(&self, context: &ConversationContext) -> Result<String, ReplyError> {
        Ok(Self::choose(context).to_string())
    }

    fn engine_name(&self) -> &'static str {
        "rule_based"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::classification::RedFlag;
    use crate::domain::foundation::{SessionId, Timestamp, TraceId};
    use crate::domain::session::SessionState;

    fn context(text: &str, turn: u32) -> ConversationContext {
        let state = SessionState::new(SessionId::new("persona").unwrap(), Timestamp::now());
        let mut context = ConversationContext::from_state(&state, text, 6, TraceId::new());
        context.turn = turn;
        context
    }

    #[test]
    fn keyword_buckets() {
        assert_eq!(RuleBasedReplyEngine::classify_message("Share your OTP", 1), ReplyBucket::Otp);
        assert_eq!(RuleBasedReplyEngine::classify_message("Pay via PhonePe urgent", 1), ReplyBucket::Upi);
        assert_eq!(RuleBasedReplyEngine::classify_message("Click here", 1), ReplyBucket::Link);
        assert_eq!(RuleBasedReplyEngine::classify_message("Your bank account", 1), ReplyBucket::Account);
        assert_eq!(RuleBasedReplyEngine::classify_message("Hi, how are you?", 1), ReplyBucket::Benign);
    }

    #[test]
    fn stage_buckets_follow_turn() {
        let text = "This is the fraud department";
        assert_eq!(RuleBasedReplyEngine::classify_message(text, 1), ReplyBucket::Early);
        assert_eq!(RuleBasedReplyEngine::classify_message(text, 4), ReplyBucket::Mid);
        assert_eq!(RuleBasedReplyEngine::classify_message(text, 7), ReplyBucket::Late);
    }

    #[test]
    fn detected_scam_never_gets_benign_reply() {
        let mut ctx = context("ok thanks", 2);
        ctx.scam_detected = true;
        ctx.red_flags.insert(RedFlag::Urgency);
        assert_eq!(RuleBasedReplyEngine::select_bucket(&ctx), ReplyBucket::Early);
        assert!(!BENIGN.contains(&RuleBasedReplyEngine::choose(&ctx)));
    }

    #[test]
    fn choice_is_deterministic() {
        let ctx = context("Send OTP now", 3);
        assert_eq!(RuleBasedReplyEngine::choose(&ctx), RuleBasedReplyEngine::choose(&ctx));
    }

    #[test]
    fn never_repeats_a_used_reply() {
        let mut ctx = context("Send OTP now", 1);
        let mut seen = Vec::new();
        for turn in 1..=12 {
            ctx.turn = turn;
            let reply = RuleBasedReplyEngine::choose(&ctx).to_string();
            assert!(!seen.contains(&reply), "repeated at turn {}: {}", turn, reply);
            seen.push(reply.clone());
            ctx.previous_replies.push(reply);
        }
    }

    #[tokio::test]
    async fn engine_always_succeeds() {
        let reply = RuleBasedReplyEngine::new()
            .generate_reply(&context("hello", 1))
            .await
            .unwrap();
        assert!(BENIGN.contains(&reply.as_str()));
    }
}
