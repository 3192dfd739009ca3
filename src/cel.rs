//! CEL (Common Expression Language) parsing and evaluation
//!
//! Rule predicates are CEL expressions over the normalized attribute bindings.
//! This module:
//! - Parses CEL strings to AST (using cel-parser) for syntax and variable checks
//! - Evaluates CEL expressions at runtime (using cel-interpreter)
//!
//! Parsing happens once, at table construction; evaluation happens per call.

use crate::error::{Error, Result};
use std::collections::HashMap;

pub use cel_parser::Expression as CelExpr;
use cel_parser::{parse, Member};

use cel_interpreter::{Context, Program, Value};

/// Re-export cel-interpreter Value for use in evaluation
pub use cel_interpreter::Value as CelValue;

/// CEL predicate helper - parses, validates, and evaluates expressions
pub struct Predicate;

impl Predicate {
    /// Parse a CEL expression string to AST
    pub fn parse(expr: &str) -> Result<CelExpr> {
        parse(expr).map_err(|e| Error::PredicateParse(format!("{}: {:?}", expr, e)))
    }

    /// Check if a string is a valid CEL expression
    /// Uses cel-parser for validation (cel-interpreter's parser panics on syntax errors)
    pub fn is_valid(expr: &str) -> bool {
        parse(expr).is_ok()
    }

    /// Evaluate a CEL expression with the given variable bindings
    pub fn eval(expr: &str, vars: &HashMap<String, CelValue>) -> Result<CelValue> {
        let program = Program::compile(expr)
            .map_err(|e| Error::PredicateParse(format!("{}: {:?}", expr, e)))?;

        let mut context = Context::default();
        for (name, value) in vars {
            context.add_variable_from_value(name.clone(), value.clone());
        }

        program
            .execute(&context)
            .map_err(|e| Error::PredicateEval(format!("{}: {:?}", expr, e)))
    }

    /// Evaluate a CEL expression and require a bool result
    pub fn eval_bool(expr: &str, vars: &HashMap<String, CelValue>) -> Result<bool> {
        let result = Self::eval(expr, vars)?;
        match result {
            Value::Bool(b) => Ok(b),
            other => Err(Error::PredicateEval(format!(
                "expected bool result from `{}`, got {:?}",
                expr, other
            ))),
        }
    }

    /// Extract all variable names referenced in a CEL expression
    pub fn extract_variables(expr: &str) -> Result<Vec<String>> {
        let ast = Self::parse(expr)?;
        let mut vars = Vec::new();
        Self::collect_variables(&ast, &mut vars);
        vars.sort();
        vars.dedup();
        Ok(vars)
    }

    /// Recursively collect variable names from CEL AST
    fn collect_variables(expr: &CelExpr, vars: &mut Vec<String>) {
        match expr {
            CelExpr::Ident(name) => {
                // Skip built-in values
                let name_str = name.as_str();
                if name_str != "true" && name_str != "false" && name_str != "null" {
                    vars.push(name.to_string());
                }
            }
            CelExpr::Member(base, member) => {
                // Only collect the base variable, not nested members
                if let CelExpr::Ident(name) = base.as_ref() {
                    let name_str = name.as_str();
                    if name_str != "true" && name_str != "false" && name_str != "null" {
                        vars.push(name.to_string());
                    }
                } else {
                    Self::collect_variables(base, vars);
                }
                if let Member::FunctionCall(args) = member.as_ref() {
                    for arg in args {
                        Self::collect_variables(arg, vars);
                    }
                }
            }
            CelExpr::Arithmetic(left, _, right) => {
                Self::collect_variables(left, vars);
                Self::collect_variables(right, vars);
            }
            CelExpr::Relation(left, _, right) => {
                Self::collect_variables(left, vars);
                Self::collect_variables(right, vars);
            }
            CelExpr::Unary(_, inner) => {
                Self::collect_variables(inner, vars);
            }
            CelExpr::Or(left, right) => {
                Self::collect_variables(left, vars);
                Self::collect_variables(right, vars);
            }
            CelExpr::And(left, right) => {
                Self::collect_variables(left, vars);
                Self::collect_variables(right, vars);
            }
            CelExpr::Ternary(cond, true_branch, false_branch) => {
                Self::collect_variables(cond, vars);
                Self::collect_variables(true_branch, vars);
                Self::collect_variables(false_branch, vars);
            }
            CelExpr::List(items) => {
                for item in items {
                    Self::collect_variables(item, vars);
                }
            }
            CelExpr::Map(entries) => {
                for (_, value) in entries {
                    Self::collect_variables(value, vars);
                }
            }
            CelExpr::Atom(_) => {
                // Atoms are literals, no variables
            }
        }
    }

    /// Validate that all variables in a CEL expression are declared
    pub fn validate_variables(expr: &str, valid_names: &[&str]) -> Result<()> {
        let referenced = Self::extract_variables(expr)?;
        let valid_set: std::collections::HashSet<_> = valid_names.iter().copied().collect();

        for var in &referenced {
            if !valid_set.contains(var.as_str()) {
                return Err(Error::PredicateParse(format!(
                    "undefined variable '{}' in expression: {}",
                    var, expr
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid() {
        assert!(Predicate::is_valid("x > 10"));
        assert!(Predicate::is_valid("a && b || c"));
        assert!(Predicate::is_valid("urgency == 'High'"));
        assert!(!Predicate::is_valid("x >>"));
        assert!(!Predicate::is_valid("&&"));
    }

    #[test]
    fn test_eval_bool_simple() {
        let mut vars = HashMap::new();
        vars.insert("days".to_string(), Value::Int(10));

        assert!(Predicate::eval_bool("days > 7", &vars).unwrap());
        assert!(!Predicate::eval_bool("days < 7", &vars).unwrap());
    }

    #[test]
    fn test_eval_bool_string_comparison() {
        let mut vars = HashMap::new();
        vars.insert("urgency".to_string(), Value::from("High"));

        assert!(Predicate::eval_bool("urgency == 'High'", &vars).unwrap());
        assert!(!Predicate::eval_bool("urgency == 'Low'", &vars).unwrap());
    }

    #[test]
    fn test_eval_bool_logical() {
        let mut vars = HashMap::new();
        vars.insert("a".to_string(), Value::Bool(true));
        vars.insert("b".to_string(), Value::Bool(false));

        assert!(!Predicate::eval_bool("a && b", &vars).unwrap());
        assert!(Predicate::eval_bool("a || b", &vars).unwrap());
        assert!(Predicate::eval_bool("!b", &vars).unwrap());
    }

    #[test]
    fn test_eval_bool_rejects_non_bool() {
        let mut vars = HashMap::new();
        vars.insert("x".to_string(), Value::Int(3));

        let err = Predicate::eval_bool("x + 1", &vars).unwrap_err();
        assert!(matches!(err, Error::PredicateEval(_)));
    }

    #[test]
    fn test_extract_variables() {
        let vars = Predicate::extract_variables(
            "decision_maker_identified == 'No' && days_since_interaction > 7",
        )
        .unwrap();
        assert_eq!(
            vars,
            vec![
                "days_since_interaction".to_string(),
                "decision_maker_identified".to_string()
            ]
        );
    }

    #[test]
    fn test_validate_variables() {
        assert!(Predicate::validate_variables("a && b", &["a", "b"]).is_ok());
        let err = Predicate::validate_variables("a && c", &["a", "b"]).unwrap_err();
        assert!(matches!(err, Error::PredicateParse(_)));
    }
}
