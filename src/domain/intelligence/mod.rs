//! Intelligence domain module.
//!
//! Pattern-driven extraction of scammer identifiers (phones, accounts,
//! payment handles, links, ...) from raw message text, plus the
//! append-only ledger that accumulates them across a session.

mod entity;
mod extractor;
mod ledger;
mod normalize;
mod rules;

pub use entity::{EntityKind, ExtractedEntity, ExtractionResult};
pub use extractor::ExtractionEngine;
pub use ledger::{EntityRecord, IntelligenceLedger};
pub use rules::{Exclusion, RuleDefinition, DEFAULT_RULES, EXCLUSIONS};
