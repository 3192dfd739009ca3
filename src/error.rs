//! Error types for dealgauge

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Dealgauge errors
#[derive(Error, Debug)]
pub enum Error {
    /// A categorical attribute received a value outside its declared set.
    /// Recoverable: the caller re-prompts and retries with corrected input.
    #[error("invalid value for attribute `{field}`: got \"{value}\", expected one of {allowed:?}")]
    InvalidAttribute {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    /// A table definition violates a structural invariant. Raised at
    /// construction time; a table that fails here is never evaluated.
    #[error("malformed rule table: {0}")]
    MalformedTable(String),

    /// Evaluation exhausted the rule list. Unreachable for a table that
    /// passed construction (the fallback rule is asserted there).
    #[error("no rule matched; the table's fallback invariant is broken")]
    NoMatch,

    #[error("table parse error: {0}")]
    TableParse(String),

    #[error("predicate parse error: {0}")]
    PredicateParse(String),

    #[error("predicate evaluation error: {0}")]
    PredicateEval(String),

    #[error("template render error: {0}")]
    TemplateRender(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Other(s.to_string())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Other(s)
    }
}
