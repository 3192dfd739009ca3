//! Property-based tests: totality and determinism of evaluation
//!
//! For any raw input drawn from the deal_health schema (including junk
//! numerics and arbitrary objection text), evaluation returns exactly one
//! verdict, twice-evaluated input yields bit-identical verdicts, and the
//! verdict always comes from the table's own rule set.

use dealgauge::{assess, builtin, evaluate, normalize};
use proptest::prelude::*;
use std::collections::HashMap;

fn enum_value(options: &'static [&'static str]) -> impl Strategy<Value = String> {
    proptest::sample::select(options).prop_map(str::to_string)
}

fn days_value() -> impl Strategy<Value = String> {
    prop_oneof![
        any::<i16>().prop_map(|n| n.to_string()),
        Just(String::new()),
        Just("soon".to_string()),
        Just("  14 ".to_string()),
    ]
}

prop_compose! {
    fn deal_health_raw()(
        property_type in enum_value(&["Residential", "Commercial", "Industrial", "Retail", "Event"]),
        decision_maker in enum_value(&["Yes", "No", "Unsure"]),
        days in days_value(),
        proposal_sent in enum_value(&["Yes", "No", "Drafting"]),
        urgency in enum_value(&["High", "Medium", "Low"]),
        competitors in enum_value(&["Yes", "No", "Unknown"]),
        objections in "[ -~]{0,60}",
    ) -> HashMap<String, String> {
        let mut raw = HashMap::new();
        raw.insert("property_type".to_string(), property_type);
        raw.insert("decision_maker_identified".to_string(), decision_maker);
        raw.insert("days_since_interaction".to_string(), days);
        raw.insert("proposal_sent".to_string(), proposal_sent);
        raw.insert("urgency".to_string(), urgency);
        raw.insert("competitors_involved".to_string(), competitors);
        raw.insert("objections".to_string(), objections);
        raw
    }
}

proptest! {
    #[test]
    fn evaluation_is_total(raw in deal_health_raw()) {
        let table = builtin::deal_health();
        let verdict = assess(&table, &raw).unwrap();
        prop_assert!(table.rule(&verdict.rule_id).is_some());
        prop_assert!(
            ["Likely Lost", "At Risk", "Strong", "Moderate"].contains(&verdict.outcome.as_str())
        );
        prop_assert!(verdict.confidence <= dealgauge::CONFIDENCE_MAX);
    }

    #[test]
    fn evaluation_is_deterministic(raw in deal_health_raw()) {
        let table = builtin::deal_health();
        let input = normalize(&table, &raw).unwrap();

        let first = evaluate(&table, &input).unwrap();
        let second = evaluate(&table, &input).unwrap();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[test]
    fn normalization_is_idempotent_on_days(raw in deal_health_raw()) {
        let table = builtin::deal_health();
        let input = normalize(&table, &raw).unwrap();
        // days is always a concrete integer after coercion, junk included
        prop_assert!(input.get("days_since_interaction").unwrap().as_int().is_some());
    }
}
