//! Attribute normalization
//!
//! Raw form input arrives as a string-keyed map. [`normalize`] coerces it
//! against a table's declared schema into a fully-populated, typed
//! [`AssessmentInput`]: every declared input and signal carries a value
//! before evaluation, so predicates never see an undefined attribute.
//!
//! Coercion rules:
//! - int: trim and parse; empty or unparsable input falls back to the
//!   field's default (0 when none is declared) and is never an error
//! - text: trim; empty is a valid, distinguishable value
//! - enum: trim; missing/empty falls back to the default; any other value
//!   outside the allowed set is an [`Error::InvalidAttribute`]
//! - unknown raw keys are ignored (the form collaborator owns its extras)

use crate::cel::CelValue;
use crate::error::{Error, Result};
use crate::signal::TextSignal;
use crate::table::{FieldDef, FieldKind, RuleTable};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// A typed attribute value
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Text(String),
    Int(i64),
    Flag(bool),
}

impl AttrValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            AttrValue::Flag(b) => Some(*b),
            _ => None,
        }
    }

    fn to_cel(&self) -> CelValue {
        match self {
            AttrValue::Text(s) => CelValue::String(Arc::new(s.clone())),
            AttrValue::Int(i) => CelValue::Int(*i),
            AttrValue::Flag(b) => CelValue::Bool(*b),
        }
    }
}

/// Normalized, fully-populated attribute bindings for one evaluation.
///
/// Owned by the caller; the engine never retains one across calls.
// BTreeMap keeps attribute order stable, so serialized verdict context and
// repeated evaluations are bit-identical.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AssessmentInput {
    values: BTreeMap<String, AttrValue>,
}

impl AssessmentInput {
    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.values.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AttrValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Variable bindings for predicate evaluation
    pub fn cel_vars(&self) -> HashMap<String, CelValue> {
        self.values
            .iter()
            .map(|(name, value)| (name.clone(), value.to_cel()))
            .collect()
    }
}

fn int_default(field: &FieldDef) -> i64 {
    field
        .default
        .as_deref()
        .and_then(|d| d.trim().parse().ok())
        .unwrap_or(0)
}

fn enum_default(field: &FieldDef, allowed: &[String]) -> String {
    field
        .default
        .clone()
        .or_else(|| allowed.first().cloned())
        .unwrap_or_default()
}

/// Coerce raw string input into typed attributes for `table`, then derive
/// the table's signals from the normalized text values. Pure function.
pub fn normalize(table: &RuleTable, raw: &HashMap<String, String>) -> Result<AssessmentInput> {
    let mut values = BTreeMap::new();

    for field in table.inputs() {
        let trimmed = raw.get(&field.name).map(|s| s.trim());
        let value = match field.kind {
            FieldKind::Text => {
                let text = match trimmed {
                    Some(t) => t.to_string(),
                    None => field.default.clone().unwrap_or_default(),
                };
                AttrValue::Text(text)
            }
            FieldKind::Int => {
                let n = trimmed
                    .and_then(|t| t.parse().ok())
                    .unwrap_or_else(|| int_default(field));
                AttrValue::Int(n)
            }
            FieldKind::Enum => {
                // Construction guarantees enum fields carry their value set.
                let allowed = field.values.as_deref().unwrap_or_default();
                let text = match trimmed {
                    None | Some("") => enum_default(field, allowed),
                    Some(t) => {
                        if !allowed.iter().any(|v| v == t) {
                            return Err(Error::InvalidAttribute {
                                field: field.name.clone(),
                                value: t.to_string(),
                                allowed: allowed.to_vec(),
                            });
                        }
                        t.to_string()
                    }
                };
                AttrValue::Text(text)
            }
        };
        values.insert(field.name.clone(), value);
    }

    let flags: Vec<(String, bool)> = table
        .signals()
        .map(|(sig, det)| {
            let text = values
                .get(&sig.from)
                .and_then(|v| v.as_text())
                .unwrap_or_default();
            (sig.name.clone(), det.detect(text))
        })
        .collect();
    for (name, flag) in flags {
        values.insert(name, AttrValue::Flag(flag));
    }

    Ok(AssessmentInput { values })
}
