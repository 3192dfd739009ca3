//! Rule table types - the core data model
//!
//! A `RuleTable` defines one assessment domain as an ordered list of rules.
//! Each rule has an id, a CEL predicate, a categorical outcome, a bounded
//! confidence value, and rationale/action templates. Rule order is priority
//! order: evaluation is first-match-wins, never best-match.
//!
//! A rule with no `when` clause always matches. Exactly one such fallback
//! rule must exist and it must be last; this makes every constructed table
//! total. The invariant is checked here, at construction, so evaluation can
//! rely on it.
//!
//! ## Example table
//!
//! ```yaml
//! id: renewal_risk
//! name: "Renewal Risk"
//! inputs:
//!   - name: tier
//!     type: enum
//!     values: ["Gold", "Silver"]
//!   - name: open_tickets
//!     type: int
//!     default: "0"
//! rules:
//!   - id: churning
//!     when: "tier == 'Silver' && open_tickets > 3"
//!     outcome: "At Risk"
//!     confidence: 35
//!     rationale: "{{ open_tickets }} unresolved tickets on a {{ tier }} account."
//!     actions:
//!       - "Escalate open tickets to support leadership."
//!   - id: steady
//!     outcome: "Stable"
//!     confidence: 70
//!     rationale: "No churn indicators for this {{ tier }} account."
//! ```

use crate::cel::Predicate;
use crate::error::{Error, Result};
use crate::signal::{Detector, SignalDef};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Highest expressible confidence; verdict confidence is a proportion of this.
pub const CONFIDENCE_MAX: u8 = 100;

/// A complete table definition, as parsed from YAML or JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[schemars(title = "Dealgauge Table", description = "First-match-wins assessment table")]
pub struct TableDef {
    /// Unique identifier
    pub id: String,

    /// Human-readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Input attribute declarations
    #[serde(default)]
    pub inputs: Vec<FieldDef>,

    /// Boolean attributes derived from text inputs
    #[serde(default)]
    pub signals: Vec<SignalDef>,

    /// Decision rules, in priority order
    #[serde(default)]
    pub rules: Vec<RuleDef>,
}

/// An input attribute declaration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FieldDef {
    /// Attribute name
    pub name: String,

    /// Attribute kind
    #[serde(rename = "type")]
    pub kind: FieldKind,

    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// For enum fields: the allowed values
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<String>>,

    /// Default used when the raw input omits the field or fails to parse.
    /// Absent: int fields default to 0, text to "", enums to their first value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// Attribute kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Closed categorical set; values outside it are rejected
    #[serde(rename = "enum")]
    Enum,
    /// Integer; unparsable raw input falls back to the default
    Int,
    /// Free text; empty is a valid, distinguishable value
    Text,
}

/// A decision rule
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RuleDef {
    /// Rule identifier
    pub id: String,

    /// CEL predicate over the attribute bindings. Omitted = always true;
    /// the single trailing rule without a predicate is the table's fallback.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,

    /// Categorical classification this rule assigns
    pub outcome: String,

    /// Confidence score, 0..=CONFIDENCE_MAX
    pub confidence: u8,

    /// Rationale template, rendered against the attribute bindings
    pub rationale: String,

    /// Recommendation templates, most urgent first; order is preserved
    #[serde(default)]
    pub actions: Vec<ActionDef>,

    /// Description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl RuleDef {
    /// Whether this rule matches unconditionally
    pub fn is_fallback(&self) -> bool {
        self.when.is_none()
    }
}

/// An action template - a bare string, or one gated on a predicate
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ActionDef {
    /// Always included
    Text(String),
    /// Included only when the CEL predicate holds
    Conditional { text: String, when: String },
}

impl ActionDef {
    pub fn text(&self) -> &str {
        match self {
            ActionDef::Text(t) => t,
            ActionDef::Conditional { text, .. } => text,
        }
    }

    pub fn when(&self) -> Option<&str> {
        match self {
            ActionDef::Text(_) => None,
            ActionDef::Conditional { when, .. } => Some(when),
        }
    }
}

impl TableDef {
    /// Parse a table definition from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_norway::from_str(yaml).map_err(|e| Error::TableParse(e.to_string()))
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String> {
        serde_norway::to_string(self).map_err(|e| Error::TableParse(e.to_string()))
    }

    /// Parse a table definition from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::TableParse(e.to_string()))
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::TableParse(e.to_string()))
    }

    /// All attribute names visible to predicates: inputs then signals
    pub fn attribute_names(&self) -> Vec<&str> {
        self.inputs
            .iter()
            .map(|f| f.name.as_str())
            .chain(self.signals.iter().map(|s| s.name.as_str()))
            .collect()
    }

    /// Get a field declaration by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.inputs.iter().find(|f| f.name == name)
    }

    /// Structural problems with this definition; empty means constructible
    pub fn problems(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.id.is_empty() {
            errors.push("table id is required".into());
        }

        if self.inputs.is_empty() {
            errors.push("at least one input is required".into());
        }

        if self.rules.is_empty() {
            errors.push("at least one rule is required".into());
        }

        let mut seen_fields = HashSet::new();
        for field in &self.inputs {
            if !seen_fields.insert(field.name.as_str()) {
                errors.push(format!("duplicate field name: {}", field.name));
            }
            match field.kind {
                FieldKind::Enum => match &field.values {
                    None => errors.push(format!(
                        "enum field `{}` must declare its allowed values",
                        field.name
                    )),
                    Some(values) if values.is_empty() => errors.push(format!(
                        "enum field `{}` must declare its allowed values",
                        field.name
                    )),
                    Some(values) => {
                        if let Some(default) = &field.default {
                            if !values.contains(default) {
                                errors.push(format!(
                                    "default \"{}\" for enum field `{}` is not one of {:?}",
                                    default, field.name, values
                                ));
                            }
                        }
                    }
                },
                FieldKind::Int => {
                    if let Some(default) = &field.default {
                        if default.trim().parse::<i64>().is_err() {
                            errors.push(format!(
                                "default \"{}\" for int field `{}` is not an integer",
                                default, field.name
                            ));
                        }
                    }
                }
                FieldKind::Text => {}
            }
        }

        for signal in &self.signals {
            if !seen_fields.insert(signal.name.as_str()) {
                errors.push(format!(
                    "signal `{}` collides with another attribute name",
                    signal.name
                ));
            }
            match self.field(&signal.from) {
                Some(f) if f.kind == FieldKind::Text => {}
                Some(_) => errors.push(format!(
                    "signal `{}` must read a text field, but `{}` is not text",
                    signal.name, signal.from
                )),
                None => errors.push(format!(
                    "signal `{}` reads unknown field `{}`",
                    signal.name, signal.from
                )),
            }
            if let Err(e) = signal.detector.compile() {
                errors.push(e.to_string());
            }
        }

        let names = self.attribute_names();
        let mut seen_rules = HashSet::new();
        let mut fallbacks = Vec::new();
        for (idx, rule) in self.rules.iter().enumerate() {
            if !seen_rules.insert(rule.id.as_str()) {
                errors.push(format!("duplicate rule id: {}", rule.id));
            }
            if rule.confidence > CONFIDENCE_MAX {
                errors.push(format!(
                    "rule `{}` confidence {} exceeds {}",
                    rule.id, rule.confidence, CONFIDENCE_MAX
                ));
            }
            match &rule.when {
                None => fallbacks.push(idx),
                Some(expr) if expr.trim() == "true" => errors.push(format!(
                    "rule `{}`: encode the fallback by omitting `when`, not with a literal true",
                    rule.id
                )),
                Some(expr) => {
                    if let Err(e) = Predicate::validate_variables(expr, &names) {
                        errors.push(format!("rule `{}`: {}", rule.id, e));
                    }
                }
            }
            for action in &rule.actions {
                if let Some(expr) = action.when() {
                    if let Err(e) = Predicate::validate_variables(expr, &names) {
                        errors.push(format!("rule `{}` action: {}", rule.id, e));
                    }
                }
            }
        }

        if !self.rules.is_empty() {
            match fallbacks.as_slice() {
                [] => errors.push("no fallback rule: exactly one rule must omit `when`".into()),
                [last] if *last == self.rules.len() - 1 => {}
                [idx] => errors.push(format!(
                    "fallback rule `{}` must be last; rules after it can never match",
                    self.rules[*idx].id
                )),
                many => errors.push(format!(
                    "multiple fallback rules: {}",
                    many.iter()
                        .map(|i| self.rules[*i].id.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                )),
            }
        }

        errors
    }
}

/// A validated table, ready for evaluation.
///
/// Construction enforces every structural invariant; holders of a `RuleTable`
/// may assume totality (the fallback exists) and that every predicate parses
/// and references only declared attributes.
#[derive(Debug, Clone)]
pub struct RuleTable {
    def: TableDef,
    detectors: Vec<Detector>,
}

impl RuleTable {
    /// Validate a definition and seal it into an evaluable table
    pub fn new(def: TableDef) -> Result<Self> {
        let problems = def.problems();
        if !problems.is_empty() {
            return Err(Error::MalformedTable(problems.join("; ")));
        }
        let detectors = def
            .signals
            .iter()
            .map(|s| s.detector.compile())
            .collect::<Result<Vec<_>>>()?;
        Ok(RuleTable { def, detectors })
    }

    /// Parse and validate a YAML table document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::new(TableDef::from_yaml(yaml)?)
    }

    /// Parse and validate a JSON table document
    pub fn from_json(json: &str) -> Result<Self> {
        Self::new(TableDef::from_json(json)?)
    }

    pub fn id(&self) -> &str {
        &self.def.id
    }

    pub fn def(&self) -> &TableDef {
        &self.def
    }

    pub fn rules(&self) -> &[RuleDef] {
        &self.def.rules
    }

    pub fn inputs(&self) -> &[FieldDef] {
        &self.def.inputs
    }

    /// Signal declarations paired with their compiled detectors
    pub fn signals(&self) -> impl Iterator<Item = (&SignalDef, &Detector)> {
        self.def.signals.iter().zip(self.detectors.iter())
    }

    /// Get a rule by id
    pub fn rule(&self, id: &str) -> Option<&RuleDef> {
        self.def.rules.iter().find(|r| r.id == id)
    }

    /// Content hash for change detection
    pub fn hash(&self) -> String {
        use sha2::{Digest, Sha256};
        let content = self.def.to_yaml().unwrap_or_default();
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        format!("sha256:{}", hex::encode(&hasher.finalize()[..8]))
    }
}
