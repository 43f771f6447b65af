//! Kind-specific normalization of raw pattern matches.
//!
//! A normalizer returns `None` when the raw span does not survive
//! normalization (e.g. a phone match with an implausible digit count),
//! which drops the candidate.

use super::entity::EntityKind;

/// Shortest international number kept (digits, country code included).
const MIN_INTERNATIONAL_DIGITS: usize = 10;
/// Longest international number kept (E.164 limit is 15, minus slack for the +).
const MAX_INTERNATIONAL_DIGITS: usize = 13;

/// Well-known mailbox providers; `handle@provider` without a TLD is a
/// truncated email address rather than a payment handle.
pub(crate) const MAIL_PROVIDERS: &[&str] = &[
    "gmail", "yahoo", "hotmail", "outlook", "protonmail", "icloud", "aol", "mail", "zoho",
    "yandex", "live", "msn", "rediffmail", "gmx", "inbox", "fastmail", "tutanota", "pm", "hey",
];

/// Capitalized words that follow "this is"/"I am" without being a name.
const NAME_STOPWORDS: &[&str] = &[
    "Account", "Bank", "Calling", "Customer", "Department", "From", "Going", "Happy", "Here",
    "Just", "Madam", "Mr", "Mrs", "Ms", "Not", "Officer", "Really", "Sir", "Sorry", "Sure",
    "The", "Urgent", "Very", "Worried", "Your",
];

pub(crate) fn normalize(kind: EntityKind, raw: &str) -> Option<String> {
    match kind {
        EntityKind::Phone => phone(raw),
        EntityKind::BankAccount | EntityKind::OtpCode => non_empty(ascii_digits(raw)),
        EntityKind::UpiId => non_empty(raw.trim().to_ascii_lowercase()),
        EntityKind::Email => email(raw),
        EntityKind::PhishingLink => link(raw),
        EntityKind::Amount => amount(raw),
        EntityKind::PersonName => person_name(raw),
        EntityKind::IfscCode => non_empty(raw.trim().to_ascii_uppercase()),
        EntityKind::CaseId => case_id(raw),
    }
}

/// ASCII digits of a span, separators dropped.
pub(crate) fn ascii_digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// True for a digit string shaped like an Indian mobile number, with or
/// without the `91` country code or a `0` trunk prefix.
pub(crate) fn looks_like_mobile(digits: &str) -> bool {
    let starts_mobile = |s: &str| matches!(s.as_bytes().first(), Some(b'6'..=b'9'));
    match digits.len() {
        10 => starts_mobile(digits),
        11 => digits.starts_with('0') && starts_mobile(&digits[1..]),
        12 => digits.starts_with("91") && starts_mobile(&digits[2..]),
        _ => false,
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

fn phone(raw: &str) -> Option<String> {
    let digits = ascii_digits(raw);
    let international = raw.trim_start().starts_with('+');
    match digits.len() {
        12 if digits.starts_with("91") => Some(digits[2..].to_string()),
        11 if digits.starts_with('0') => Some(digits[1..].to_string()),
        10 => Some(digits),
        n if international && (MIN_INTERNATIONAL_DIGITS..=MAX_INTERNATIONAL_DIGITS).contains(&n) => {
            Some(format!("+{}", digits))
        }
        _ => None,
    }
}

fn email(raw: &str) -> Option<String> {
    let (local, domain) = raw.trim().split_once('@')?;
    if local.is_empty() || domain.is_empty() {
        return None;
    }
    Some(format!("{}@{}", local, domain.to_ascii_lowercase()))
}

fn link(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches(['.', ',', ';', ':', '!', '?', ')', ']']);
    let (scheme, rest) = match trimmed.find("://") {
        Some(idx) => (Some(&trimmed[..idx]), &trimmed[idx + 3..]),
        None => (None, trimmed),
    };
    let host_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let (host, tail) = rest.split_at(host_end);
    if !host.contains('.') || host.ends_with('.') {
        return None;
    }
    let host = host.to_ascii_lowercase();
    Some(match scheme {
        Some(scheme) => format!("{}://{}{}", scheme.to_ascii_lowercase(), host, tail),
        None => format!("{}{}", host, tail),
    })
}

fn amount(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .trim_end_matches([',', '.'])
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let value = match cleaned.split_once('.') {
        Some((whole, frac)) if frac.chars().all(|c| c == '0') => whole.to_string(),
        _ => cleaned,
    };
    let value = value.trim_start_matches('0');
    if value.is_empty() || value.starts_with('.') {
        return None;
    }
    Some(value.to_string())
}

fn person_name(raw: &str) -> Option<String> {
    let mut words = Vec::new();
    for word in raw.split_whitespace() {
        if NAME_STOPWORDS.contains(&word) {
            break;
        }
        let mut chars = word.chars();
        let first = chars.next()?;
        words.push(format!(
            "{}{}",
            first.to_uppercase(),
            chars.as_str().to_lowercase()
        ));
    }
    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

fn case_id(raw: &str) -> Option<String> {
    let upper = raw.trim().to_ascii_uppercase();
    if upper.len() < 5 || !upper.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let mut out = String::with_capacity(upper.len());
    let mut pending_sep = false;
    for c in upper.chars() {
        if c.is_whitespace() || matches!(c, ':' | '#' | '.' | '-') {
            pending_sep = !out.is_empty();
        } else {
            if pending_sep {
                out.push('-');
                pending_sep = false;
            }
            out.push(c);
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_strips_indian_country_code() {
        assert_eq!(phone("+91-98765 43210").as_deref(), Some("9876543210"));
        assert_eq!(phone("919876543210").as_deref(), Some("9876543210"));
        assert_eq!(phone("09876543210").as_deref(), Some("9876543210"));
    }

    #[test]
    fn phone_keeps_other_international_numbers() {
        assert_eq!(phone("+1 415 555 0100").as_deref(), Some("+14155550100"));
    }

    #[test]
    fn phone_rejects_implausible_lengths() {
        assert!(phone("12345").is_none());
        assert!(phone("+1234567").is_none());
    }

    #[test]
    fn looks_like_mobile_recognizes_prefixes() {
        assert!(looks_like_mobile("9876543210"));
        assert!(looks_like_mobile("919876543210"));
        assert!(looks_like_mobile("09876543210"));
        assert!(!looks_like_mobile("1234567890"));
        assert!(!looks_like_mobile("912345678901"));
        assert!(!looks_like_mobile("123456789012"));
    }

    #[test]
    fn email_lowercases_domain_only() {
        assert_eq!(
            email("Rahul.K@GMail.Com").as_deref(),
            Some("Rahul.K@gmail.com")
        );
    }

    #[test]
    fn link_trims_punctuation_and_lowercases_host() {
        assert_eq!(
            link("HTTPS://Secure-SBI.Example.com/Verify?id=1).").as_deref(),
            Some("https://secure-sbi.example.com/Verify?id=1")
        );
        assert_eq!(
            link("www.Fake-KYC.in,").as_deref(),
            Some("www.fake-kyc.in")
        );
    }

    #[test]
    fn link_requires_dotted_host() {
        assert!(link("http://localhost").is_none());
        assert!(link("www.").is_none());
    }

    #[test]
    fn amount_drops_separators_and_zero_cents() {
        assert_eq!(amount("1,00,000").as_deref(), Some("100000"));
        assert_eq!(amount("5000.00").as_deref(), Some("5000"));
        assert_eq!(amount("49.50").as_deref(), Some("49.50"));
        assert_eq!(amount("2,500,").as_deref(), Some("2500"));
        assert!(amount("0").is_none());
    }

    #[test]
    fn person_name_stops_at_stopword() {
        assert_eq!(person_name("Rahul Sharma").as_deref(), Some("Rahul Sharma"));
        assert_eq!(person_name("Rahul From").as_deref(), Some("Rahul"));
        assert!(person_name("Calling").is_none());
    }

    #[test]
    fn case_id_collapses_separators() {
        assert_eq!(case_id("Case No: 45678").as_deref(), Some("CASE-NO-45678"));
        assert_eq!(case_id("SBI-12345").as_deref(), Some("SBI-12345"));
        assert!(case_id("REFERENCE number").is_none());
    }
}
