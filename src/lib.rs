// Production-quality lints
#![warn(
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
// Deny truly dangerous patterns
#![deny(clippy::mem_forget)]
// Allow common patterns in library code
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! # Dealgauge — rule-based assessment engine
//!
//! Dealgauge classifies structured input against an ordered rule table and
//! produces a [`Verdict`]: an outcome label, a bounded confidence score, a
//! rendered rationale, and a ranked action list.
//!
//! ## Core Concept
//!
//! A **table** declares typed input attributes, optional boolean **signals**
//! derived from free text, and an ordered list of **rules**. Evaluation is
//! first-match-wins: rule order *is* the priority order, and the single
//! trailing rule without a predicate is the fallback that makes every table
//! total. Tables are data (YAML or JSON), so adding an assessment domain
//! means writing a document, not code.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use dealgauge::{assess, builtin};
//! use std::collections::HashMap;
//!
//! let table = builtin::deal_health();
//!
//! let mut raw = HashMap::new();
//! raw.insert("decision_maker_identified".into(), "No".into());
//! raw.insert("days_since_interaction".into(), "9".into());
//!
//! let verdict = assess(&table, &raw)?;
//! assert_eq!(verdict.outcome, "Likely Lost");
//! assert_eq!(verdict.confidence, 15);
//! for action in &verdict.actions {
//!     println!("- {}", action);
//! }
//! ```
//!
//! ## Table Format
//!
//! Tables use YAML with CEL (Common Expression Language) for predicates:
//!
//! ```yaml
//! id: renewal_risk
//! inputs:
//!   - name: tier
//!     type: enum
//!     values: ["Gold", "Silver"]
//!   - name: open_tickets
//!     type: int
//!   - name: complaints
//!     type: text
//! signals:
//!   - name: complaints_present
//!     from: complaints
//!     detector:
//!       kind: non_empty
//! rules:
//!   - id: churning
//!     when: "complaints_present && open_tickets > 3"
//!     outcome: "At Risk"
//!     confidence: 35
//!     rationale: "Open complaints (\"{{ complaints | excerpt(30) }}\") with {{ open_tickets }} tickets pending."
//!     actions:
//!       - "Escalate open tickets to support leadership."
//!   - id: steady
//!     outcome: "Stable"
//!     confidence: 70
//!     rationale: "No churn indicators for this {{ tier }} account."
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! raw map ──► normalize ──► AssessmentInput ──► evaluate ──► Verdict
//!                │                                  │
//!                └─ signals (TextSignal)            └─ templates (MiniJinja)
//! ```
//!
//! Every step is a pure function over immutable input. The engine holds no
//! state between calls; concurrent evaluations over a shared table need no
//! coordination. Malformed tables never evaluate: the fallback invariant,
//! confidence bounds, and predicate references are all checked when the
//! [`RuleTable`] is constructed.

// Core modules
pub mod builtin;
pub mod cel;
pub mod error;
pub mod eval;
pub mod normalize;
pub mod signal;
pub mod table;
pub mod templates;

// Re-exports
pub use cel::{CelValue, Predicate};
pub use error::{Error, Result};
pub use eval::{assess, evaluate, Verdict};
pub use normalize::{normalize, AssessmentInput, AttrValue};
pub use signal::{Detector, DetectorDef, SignalDef, TextSignal};
pub use table::{ActionDef, FieldDef, FieldKind, RuleDef, RuleTable, TableDef, CONFIDENCE_MAX};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
