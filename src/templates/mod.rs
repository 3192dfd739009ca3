//! Template-based rationale and action rendering
//!
//! Rule tables carry MiniJinja templates for rationale and action texts.
//! Templates render against the full normalized attribute bindings, so
//! `{{ property_type }}` or `{{ objections | excerpt(30) }}` interpolate
//! directly. Rendering is the last step of an evaluation; it performs no
//! I/O and holds no state beyond the process-wide filter registry.

pub mod filters;

use crate::cel::{CelValue, Predicate};
use crate::error::{Error, Result};
use crate::normalize::AssessmentInput;
use crate::table::RuleDef;
use minijinja::Environment;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Template engine singleton
static ENGINE: OnceLock<Environment<'static>> = OnceLock::new();

fn init_engine() -> Environment<'static> {
    let mut env = Environment::new();
    filters::register_filters(&mut env);
    env
}

/// Get the global template engine
pub fn engine() -> &'static Environment<'static> {
    ENGINE.get_or_init(init_engine)
}

/// Render one template string against the attribute bindings
pub fn render(template: &str, input: &AssessmentInput) -> Result<String> {
    engine()
        .render_str(template, input)
        .map_err(|e| Error::TemplateRender(e.to_string()))
}

/// Render a rule's action templates in declared order.
///
/// Conditional actions whose predicate does not hold are skipped, never
/// reordered; the surviving sequence keeps the template-declared ranking.
pub fn render_actions(
    rule: &RuleDef,
    input: &AssessmentInput,
    vars: &HashMap<String, CelValue>,
) -> Result<Vec<String>> {
    let mut out = Vec::with_capacity(rule.actions.len());
    for action in &rule.actions {
        if let Some(expr) = action.when() {
            if !Predicate::eval_bool(expr, vars)? {
                continue;
            }
        }
        out.push(render(action.text(), input)?);
    }
    Ok(out)
}
