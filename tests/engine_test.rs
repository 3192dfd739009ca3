//! Engine contract tests against the bundled deal_health table
//!
//! Covers rule precedence, fallback totality, excerpt truncation, and
//! attribute validation.

use dealgauge::{assess, builtin, Error};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::collections::HashMap;

fn raw(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[rstest]
// Disengagement wins regardless of every other field
#[case(&[("decision_maker_identified", "No"), ("days_since_interaction", "8")])]
#[case(&[
    ("decision_maker_identified", "No"),
    ("days_since_interaction", "8"),
    ("urgency", "High"),
    ("competitors_involved", "Yes"),
    ("objections", "price too high"),
    ("property_type", "Event"),
])]
#[case(&[
    ("decision_maker_identified", "No"),
    ("days_since_interaction", "30"),
    ("proposal_sent", "Drafting"),
])]
fn likely_lost_preempts_everything(#[case] pairs: &[(&str, &str)]) {
    let verdict = assess(&builtin::deal_health(), &raw(pairs)).unwrap();
    assert_eq!(verdict.outcome, "Likely Lost");
    assert_eq!(verdict.confidence, 15);
    assert_eq!(verdict.rule_id, "likely-lost");
}

#[test]
fn at_risk_preempts_strong_when_both_match() {
    // Objections + competitors AND high urgency + decision maker: the
    // objection rule sits earlier in the table, so it wins.
    let verdict = assess(
        &builtin::deal_health(),
        &raw(&[
            ("objections", "price too high"),
            ("competitors_involved", "Yes"),
            ("urgency", "High"),
            ("decision_maker_identified", "Yes"),
        ]),
    )
    .unwrap();
    assert_eq!(verdict.outcome, "At Risk");
    assert_eq!(verdict.confidence, 40);
}

#[test]
fn strong_on_urgency_with_decision_maker() {
    let verdict = assess(
        &builtin::deal_health(),
        &raw(&[
            ("urgency", "High"),
            ("decision_maker_identified", "Yes"),
            ("objections", ""),
            ("competitors_involved", "No"),
            ("days_since_interaction", "1"),
        ]),
    )
    .unwrap();
    assert_eq!(verdict.outcome, "Strong");
    assert_eq!(verdict.confidence, 85);
}

#[test]
fn fallback_when_no_rule_fires() {
    let verdict = assess(
        &builtin::deal_health(),
        &raw(&[
            ("urgency", "Medium"),
            ("decision_maker_identified", "Yes"),
            ("objections", ""),
            ("competitors_involved", "No"),
            ("days_since_interaction", "2"),
        ]),
    )
    .unwrap();
    assert_eq!(verdict.outcome, "Moderate");
    assert_eq!(verdict.confidence, 60);
    assert_eq!(verdict.rule_id, "moderate");
}

#[test]
fn fallback_action_interpolates_property_type() {
    let verdict = assess(
        &builtin::deal_health(),
        &raw(&[("property_type", "Industrial")]),
    )
    .unwrap();
    assert_eq!(verdict.outcome, "Moderate");
    assert_eq!(
        verdict.actions[0],
        "Send a relevant case study for a Industrial property."
    );
}

#[test]
fn long_objection_is_truncated_with_ellipsis() {
    let objection = "the incumbent contract runs another eleven months at least";
    assert!(objection.chars().count() > 30);
    let verdict = assess(
        &builtin::deal_health(),
        &raw(&[("objections", objection), ("competitors_involved", "Yes")]),
    )
    .unwrap();

    let head: String = objection.chars().take(30).collect();
    assert!(verdict.rationale.contains(&format!("(\"{}...\")", head)));
    assert!(!verdict.rationale.contains(objection));
}

#[test]
fn objection_at_exactly_thirty_chars_is_unmodified() {
    let objection = "price is over our annual cap!!";
    assert_eq!(objection.chars().count(), 30);
    let verdict = assess(
        &builtin::deal_health(),
        &raw(&[("objections", objection), ("competitors_involved", "Yes")]),
    )
    .unwrap();

    assert!(verdict.rationale.contains(&format!("(\"{}\")", objection)));
    assert!(!verdict.rationale.contains("..."));
}

#[test]
fn invalid_urgency_yields_no_verdict() {
    let err = assess(&builtin::deal_health(), &raw(&[("urgency", "Extreme")])).unwrap_err();
    match err {
        Error::InvalidAttribute { field, value, .. } => {
            assert_eq!(field, "urgency");
            assert_eq!(value, "Extreme");
        }
        other => panic!("expected InvalidAttribute, got {:?}", other),
    }
}

#[test]
fn unparsable_days_defaults_instead_of_failing() {
    // days defaults to 0, so the silence condition cannot fire
    let verdict = assess(
        &builtin::deal_health(),
        &raw(&[
            ("decision_maker_identified", "No"),
            ("days_since_interaction", "next week"),
        ]),
    )
    .unwrap();
    assert_eq!(verdict.outcome, "Moderate");
}
