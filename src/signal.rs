//! Free-text signal detection
//!
//! Rule predicates operate on typed attributes only. Free text enters the
//! predicate layer through *signals*: boolean attributes derived from a text
//! field by a detector. The detector sits behind the [`TextSignal`] trait so
//! the bundled heuristics (presence, keywords, patterns, length thresholds)
//! can be replaced by a real classifier without touching any rule table.

use crate::error::{Error, Result};
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Detects a boolean signal in a free-text value.
pub trait TextSignal {
    fn detect(&self, text: &str) -> bool;
}

/// Detector configuration as written in a table definition.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DetectorDef {
    /// True when the trimmed text is non-empty.
    NonEmpty,
    /// True when any of the keywords occurs in the text, case-insensitively.
    Keyword { any_of: Vec<String> },
    /// True when the regular expression matches anywhere in the text.
    Pattern { regex: String },
    /// True when the text has fewer than `chars` characters.
    ShorterThan { chars: usize },
    /// True when the text has more than `chars` characters.
    LongerThan { chars: usize },
}

impl DetectorDef {
    /// Compile into a runnable detector. Fails only on an invalid regex,
    /// which table construction treats as a malformed-table error.
    pub fn compile(&self) -> Result<Detector> {
        match self {
            DetectorDef::NonEmpty => Ok(Detector::NonEmpty),
            DetectorDef::Keyword { any_of } => Ok(Detector::Keyword {
                needles: any_of.iter().map(|k| k.to_lowercase()).collect(),
            }),
            DetectorDef::Pattern { regex } => {
                let re = Regex::new(regex).map_err(|e| {
                    Error::MalformedTable(format!("invalid signal pattern `{}`: {}", regex, e))
                })?;
                Ok(Detector::Pattern { re })
            }
            DetectorDef::ShorterThan { chars } => Ok(Detector::ShorterThan { chars: *chars }),
            DetectorDef::LongerThan { chars } => Ok(Detector::LongerThan { chars: *chars }),
        }
    }
}

/// A compiled, runnable signal detector.
#[derive(Debug, Clone)]
pub enum Detector {
    NonEmpty,
    Keyword { needles: Vec<String> },
    Pattern { re: Regex },
    ShorterThan { chars: usize },
    LongerThan { chars: usize },
}

impl TextSignal for Detector {
    fn detect(&self, text: &str) -> bool {
        match self {
            Detector::NonEmpty => !text.trim().is_empty(),
            Detector::Keyword { needles } => {
                let haystack = text.to_lowercase();
                needles.iter().any(|n| haystack.contains(n))
            }
            Detector::Pattern { re } => re.is_match(text),
            Detector::ShorterThan { chars } => text.chars().count() < *chars,
            Detector::LongerThan { chars } => text.chars().count() > *chars,
        }
    }
}

/// A derived boolean attribute: `name` is computed from text field `from`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SignalDef {
    /// Attribute name the signal is bound to in predicates
    pub name: String,

    /// Name of the text field the detector reads
    pub from: String,

    /// Detector configuration
    pub detector: DetectorDef,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
