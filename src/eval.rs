//! Assessment evaluation
//!
//! [`evaluate`] runs a validated table against normalized attributes:
//! rules are consulted in declaration order and the first whose predicate
//! holds produces the [`Verdict`]. Evaluation is pure and deterministic;
//! identical input and table always yield an identical verdict.

use crate::cel::Predicate;
use crate::error::{Error, Result};
use crate::normalize::{normalize, AssessmentInput};
use crate::table::{RuleTable, CONFIDENCE_MAX};
use crate::templates;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The immutable result of one evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Verdict {
    /// Table that produced this verdict
    pub table_id: String,

    /// Rule that matched
    pub rule_id: String,

    /// Classification label
    pub outcome: String,

    /// Confidence, as a proportion of [`CONFIDENCE_MAX`]
    pub confidence: u8,

    /// Rendered rationale text
    pub rationale: String,

    /// Rendered recommendations, most urgent first
    pub actions: Vec<String>,
}

impl Verdict {
    /// Human-readable report
    pub fn to_report(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Assessment: {}\n", self.table_id));
        out.push_str(&format!(
            "Outcome: {} ({}/{} confidence, rule {})\n\n",
            self.outcome, self.confidence, CONFIDENCE_MAX, self.rule_id
        ));
        out.push_str(&self.rationale);
        out.push('\n');
        if !self.actions.is_empty() {
            out.push_str("\nNext actions:\n");
            for (i, action) in self.actions.iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", i + 1, action));
            }
        }
        out
    }
}

/// Evaluate `table` against `input`, first match wins.
///
/// `Error::NoMatch` is unreachable for a table that passed construction;
/// it would indicate the fallback invariant was bypassed.
pub fn evaluate(table: &RuleTable, input: &AssessmentInput) -> Result<Verdict> {
    let vars = input.cel_vars();

    for rule in table.rules() {
        let matched = match &rule.when {
            None => true,
            Some(expr) => Predicate::eval_bool(expr, &vars)?,
        };
        if !matched {
            continue;
        }

        let rationale = templates::render(&rule.rationale, input)?;
        let actions = templates::render_actions(rule, input, &vars)?;

        return Ok(Verdict {
            table_id: table.id().to_string(),
            rule_id: rule.id.clone(),
            outcome: rule.outcome.clone(),
            confidence: rule.confidence,
            rationale,
            actions,
        });
    }

    Err(Error::NoMatch)
}

/// Normalize raw string input and evaluate it in one step
pub fn assess(table: &RuleTable, raw: &HashMap<String, String>) -> Result<Verdict> {
    let input = normalize(table, raw)?;
    evaluate(table, &input)
}
