//! ExtractionEngine - pure text to entity extraction.

use regex::Regex;
use std::collections::BTreeMap;
use std::ops::Range;

use super::entity::{EntityKind, ExtractedEntity, ExtractionResult};
use super::normalize::{ascii_digits, looks_like_mobile, normalize, MAIL_PROVIDERS};
use super::rules::{Exclusion, RuleDefinition, DEFAULT_RULES, EXCLUSIONS};

struct CompiledRule {
    kind: EntityKind,
    regex: Regex,
    group: usize,
}

/// A normalized match before disambiguation.
#[derive(Debug)]
struct Candidate<'t> {
    kind: EntityKind,
    span: Range<usize>,
    raw: &'t str,
    value: String,
}

/// Stateless extractor driven by a compiled rule table.
///
/// Rules that fail to compile are disabled individually, so a bad pattern
/// silences its own kind without affecting the others.
pub struct ExtractionEngine {
    rules: Vec<CompiledRule>,
}

impl ExtractionEngine {
    /// Creates an engine over [`DEFAULT_RULES`].
    pub fn new() -> Self {
        Self::from_definitions(DEFAULT_RULES)
    }

    pub fn from_definitions(definitions: &[RuleDefinition]) -> Self {
        let rules = definitions
            .iter()
            .filter_map(|def| match Regex::new(def.pattern) {
                Ok(regex) if def.group < regex.captures_len() => Some(CompiledRule {
                    kind: def.kind,
                    regex,
                    group: def.group,
                }),
                Ok(_) => {
                    tracing::warn!(
                        kind = %def.kind,
                        group = def.group,
                        "Extraction rule references a missing capture group; rule disabled"
                    );
                    None
                }
                Err(e) => {
                    tracing::warn!(
                        kind = %def.kind,
                        error = %e,
                        "Extraction rule failed to compile; rule disabled"
                    );
                    None
                }
            })
            .collect();
        Self { rules }
    }

    /// Number of rules that compiled and are active.
    pub fn active_rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Extracts distinct normalized entities from one message.
    ///
    /// Never fails; unrecognizable input yields an empty result.
    pub fn extract(&self, text: &str) -> ExtractionResult {
        if text.trim().is_empty() {
            return ExtractionResult::default();
        }

        let candidates = self.collect_candidates(text);

        let mut survivors: Vec<&Candidate<'_>> = candidates
            .iter()
            .filter(|c| !is_excluded(c, &candidates, text))
            .collect();
        survivors.sort_by_key(|c| (c.span.start, c.span.end));

        let mut distinct: BTreeMap<(EntityKind, &str), &str> = BTreeMap::new();
        for candidate in survivors {
            distinct
                .entry((candidate.kind, candidate.value.as_str()))
                .or_insert(candidate.raw);
        }

        ExtractionResult::from_sorted(
            distinct
                .into_iter()
                .map(|((kind, value), raw)| ExtractedEntity::new(kind, value, raw))
                .collect(),
        )
    }

    fn collect_candidates<'t>(&self, text: &'t str) -> Vec<Candidate<'t>> {
        let mut candidates = Vec::new();
        for rule in &self.rules {
            for caps in rule.regex.captures_iter(text) {
                let Some(m) = caps.get(rule.group) else {
                    continue;
                };
                if let Some(value) = normalize(rule.kind, m.as_str()) {
                    candidates.push(Candidate {
                        kind: rule.kind,
                        span: m.range(),
                        raw: m.as_str(),
                        value,
                    });
                }
            }
        }
        candidates
    }
}

impl Default for ExtractionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ExtractionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionEngine")
            .field("active_rules", &self.rules.len())
            .finish()
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

fn within(inner: &Range<usize>, outer: &Range<usize>) -> bool {
    outer.start <= inner.start && inner.end <= outer.end
}

fn is_excluded(candidate: &Candidate<'_>, all: &[Candidate<'_>], text: &str) -> bool {
    let of_kind = |kind: EntityKind| all.iter().filter(move |c| c.kind == kind);

    EXCLUSIONS
        .iter()
        .filter(|(victim, _)| *victim == candidate.kind)
        .any(|(_, reason)| match *reason {
            Exclusion::Overlaps(kind) => of_kind(kind).any(|o| overlaps(&candidate.span, &o.span)),
            Exclusion::WithinSpanOf(kind) => of_kind(kind)
                .any(|o| !std::ptr::eq(o, candidate) && within(&candidate.span, &o.span)),
            Exclusion::StrictlyWithinSpanOf(kind) => of_kind(kind).any(|o| {
                within(&candidate.span, &o.span) && o.span.len() > candidate.span.len()
            }),
            Exclusion::SameDigitsAs(kind) => {
                let digits = ascii_digits(&candidate.value);
                of_kind(kind).any(|o| ascii_digits(&o.value) == digits || ascii_digits(o.raw) == digits)
            }
            Exclusion::LooksLikeMobile => looks_like_mobile(&ascii_digits(&candidate.value)),
            Exclusion::PrecededByPlus => text[..candidate.span.start].ends_with('+'),
            Exclusion::FollowedByDecimal => {
                let mut rest = text[candidate.span.end..].chars();
                rest.next() == Some('.') && rest.next().is_some_and(|c| c.is_ascii_digit())
            }
            Exclusion::MailProviderDomain => candidate
                .value
                .rsplit_once('@')
                .is_some_and(|(_, domain)| MAIL_PROVIDERS.contains(&domain)),
        })
}
