//! Behavioral red flags and the keyword rules that trigger them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A behavioral warning sign observed in scammer messages.
///
/// Declaration order is the order flags are reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RedFlag {
    Urgency,
    OtpRequest,
    SuspiciousLink,
    Impersonation,
    PaymentRequest,
    ThreatOfConsequence,
    CredentialRequest,
    RewardLure,
    RemoteAccess,
    TechSupportPretext,
    InsurancePretext,
}

impl RedFlag {
    pub const ALL: [RedFlag; 11] = [
        RedFlag::Urgency,
        RedFlag::OtpRequest,
        RedFlag::SuspiciousLink,
        RedFlag::Impersonation,
        RedFlag::PaymentRequest,
        RedFlag::ThreatOfConsequence,
        RedFlag::CredentialRequest,
        RedFlag::RewardLure,
        RedFlag::RemoteAccess,
        RedFlag::TechSupportPretext,
        RedFlag::InsurancePretext,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RedFlag::Urgency => "urgency",
            RedFlag::OtpRequest => "otpRequest",
            RedFlag::SuspiciousLink => "suspiciousLink",
            RedFlag::Impersonation => "impersonation",
            RedFlag::PaymentRequest => "paymentRequest",
            RedFlag::ThreatOfConsequence => "threatOfConsequence",
            RedFlag::CredentialRequest => "credentialRequest",
            RedFlag::RewardLure => "rewardLure",
            RedFlag::RemoteAccess => "remoteAccess",
            RedFlag::TechSupportPretext => "techSupportPretext",
            RedFlag::InsurancePretext => "insurancePretext",
        }
    }

    /// Human-readable phrase used in agent notes.
    pub fn describe(&self) -> &'static str {
        match self {
            RedFlag::Urgency => "artificial urgency",
            RedFlag::OtpRequest => "OTP solicitation",
            RedFlag::SuspiciousLink => "suspicious link",
            RedFlag::Impersonation => "impersonation of an institution",
            RedFlag::PaymentRequest => "payment demand",
            RedFlag::ThreatOfConsequence => "threats of consequences",
            RedFlag::CredentialRequest => "credential harvesting",
            RedFlag::RewardLure => "reward bait",
            RedFlag::RemoteAccess => "remote-access request",
            RedFlag::TechSupportPretext => "fake technical-support story",
            RedFlag::InsurancePretext => "insurance policy pretext",
        }
    }
}

impl fmt::Display for RedFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A keyword pattern that raises one red flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RedFlagRule {
    pub flag: RedFlag,
    pub pattern: &'static str,
}

impl RedFlagRule {
    pub const fn new(flag: RedFlag, pattern: &'static str) -> Self {
        Self { flag, pattern }
    }
}

/// Default red-flag rules. All patterns are case-insensitive.
pub const RED_FLAG_RULES: &[RedFlagRule] = &[
    RedFlagRule::new(
        RedFlag::Urgency,
        r"(?i)\b(?:urgent(?:ly)?|immediately|right now|right away|asap|hurry|quickly|now|last chance|limited time|expir(?:e|es|ing)|today itself|within [0-9]+ (?:minutes?|mins?|hours?|hrs?))\b",
    ),
    RedFlagRule::new(
        RedFlag::OtpRequest,
        r"(?i)\b(?:share|send|tell|give|provide|enter|forward|read out|confirm)\b[^.?!]{0,30}?\b(?:otp|one[- ]time password|verification code|sms code)\b",
    ),
    RedFlagRule::new(
        RedFlag::OtpRequest,
        r"(?i)\b(?:otp|verification code)\b[^.?!]{0,30}?\b(?:share|send|tell|give|provide|forward)\b",
    ),
    RedFlagRule::new(
        RedFlag::SuspiciousLink,
        r"(?i)\b(?:click|tap|open|visit)\b[^.?!]{0,30}?\b(?:link|url|website|site|here)\b",
    ),
    RedFlagRule::new(
        RedFlag::SuspiciousLink,
        r"(?i)(?:\bhttps?://|\bwww\.|\bbit\.ly/|\btinyurl\.com/|\bgoo\.gl/)",
    ),
    RedFlagRule::new(
        RedFlag::Impersonation,
        r"(?i)\b(?:from|calling from|this is|i am|we are|on behalf of)\b[^.?!]{0,25}?\b(?:sbi|hdfc|icici|axis|pnb|kotak|rbi|reserve bank|bank|police|cyber ?cell|customs|income tax|trai|cbi|amazon|flipkart|paytm|phonepe|customer care|fraud department|head office|microsoft|windows|apple|tech(?:nical)? support|help ?desk|it department)\b",
    ),
    RedFlagRule::new(
        RedFlag::Impersonation,
        r"(?i)\b(?:bank|police|cyber ?crime|customs|tax) (?:officer|official|inspector|manager|executive|department)\b",
    ),
    RedFlagRule::new(
        RedFlag::PaymentRequest,
        r"(?i)\b(?:transfer|pay|deposit|send money|send rs|make (?:a |the )?payment|processing fee|registration fee|service charge|charges)\b",
    ),
    RedFlagRule::new(
        RedFlag::ThreatOfConsequence,
        r"(?i)\b(?:will|would|shall|going to) (?:be |get )?(?:blocked|suspended|frozen|closed|deactivated|terminated|cancelled|seized|arrested|penali[sz]ed)\b",
    ),
    RedFlagRule::new(
        RedFlag::ThreatOfConsequence,
        r"(?i)\b(?:arrest(?:ed)?|legal action|police case|fir|penalty|court|warrant|jail)\b",
    ),
    RedFlagRule::new(
        RedFlag::CredentialRequest,
        r"(?i)\b(?:password|passcode|cvv|card number|card details|atm pin|upi pin|mpin|net ?banking|login (?:id|details|credentials)|user ?id|aadhaa?r|pan (?:card|number))\b",
    ),
    RedFlagRule::new(
        RedFlag::RewardLure,
        r"(?i)\b(?:won|winner|prize|lottery|reward|cashback|lucky draw|jackpot|gift|selected|bonus|claim your)\b",
    ),
    RedFlagRule::new(
        RedFlag::RemoteAccess,
        r"(?i)\b(?:anydesk|teamviewer|quick ?support|rustdesk|remote access|screen ?shar(?:e|ing)|(?:install|download) (?:the |this )?app)\b",
    ),
    RedFlagRule::new(
        RedFlag::TechSupportPretext,
        r"(?i)\b(?:microsoft|windows (?:support|security|defender|licen[cs]e)|apple support|tech(?:nical)? support|help ?desk|it support|virus(?:es)?|malware|trojan|spyware|licen[cs]e (?:key|has expired|expired)|(?:computer|laptop|pc|system|device) (?:is|has been|got) (?:infected|hacked|compromised))\b",
    ),
    RedFlagRule::new(
        RedFlag::InsurancePretext,
        r"(?i)\b(?:insurance|insurer|irdai|lic|premium|sum assured|maturity amount|claim settlement|(?:your|the|insurance|lic) policy|policy (?:number|no|lapsed|lapse|expired|renewal|bonus|maturity))\b",
    ),
];
