//! Bundled assessment tables
//!
//! The three sales-workflow domains ship as embedded YAML documents and go
//! through the same construction path as user-supplied tables, so the
//! fallback and predicate invariants hold for them too. The smoke tests in
//! `tests/` keep the embedded documents honest.

use crate::table::RuleTable;

// Embedded table documents (compiled into binary)
mod embedded {
    pub const DEAL_HEALTH: &str = include_str!("../tables/deal_health.yaml");
    pub const DISCOVERY: &str = include_str!("../tables/discovery.yaml");
    pub const PROPOSAL: &str = include_str!("../tables/proposal.yaml");
}

/// Ids of the bundled tables
pub const IDS: [&str; 3] = ["deal_health", "discovery", "proposal"];

/// Deal risk classification from engagement signals
pub fn deal_health() -> RuleTable {
    RuleTable::from_yaml(embedded::DEAL_HEALTH).expect("embedded deal_health table is valid")
}

/// Structured feedback on discovery-call notes
pub fn discovery() -> RuleTable {
    RuleTable::from_yaml(embedded::DISCOVERY).expect("embedded discovery table is valid")
}

/// Quality review of proposal text
pub fn proposal() -> RuleTable {
    RuleTable::from_yaml(embedded::PROPOSAL).expect("embedded proposal table is valid")
}

/// Look up a bundled table by id
pub fn find(id: &str) -> Option<RuleTable> {
    match id {
        "deal_health" => Some(deal_health()),
        "discovery" => Some(discovery()),
        "proposal" => Some(proposal()),
        _ => None,
    }
}

/// Raw YAML source of a bundled table
pub fn source(id: &str) -> Option<&'static str> {
    match id {
        "deal_health" => Some(embedded::DEAL_HEALTH),
        "discovery" => Some(embedded::DISCOVERY),
        "proposal" => Some(embedded::PROPOSAL),
        _ => None,
    }
}

/// All bundled tables
pub fn all() -> Vec<RuleTable> {
    vec![deal_health(), discovery(), proposal()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_builtins_construct() {
        for table in all() {
            assert!(IDS.contains(&table.id()));
            assert!(table.rules().last().unwrap().is_fallback());
        }
    }

    #[test]
    fn test_find_known_and_unknown() {
        assert!(find("deal_health").is_some());
        assert!(find("weather").is_none());
    }

    #[test]
    fn test_source_round_trips() {
        let src = source("proposal").unwrap();
        let table = RuleTable::from_yaml(src).unwrap();
        assert_eq!(table.id(), "proposal");
    }
}
