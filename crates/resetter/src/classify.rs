//! Eligibility classification for automated recovery.
//!
//! A node is eligible when it is not in maintenance, its provision state is
//! `error`, and its reported error text matches one of the known, recoverable
//! signatures. No side effects; the caller decides what to do with the set.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use inventory::{Node, ProvisionState};

/// Error signatures we know how to recover from. Ordered, first match wins
/// for logging purposes; a node matches if any pattern matches.
static ERROR_MATCHERS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    vec![Regex::new(r"^Failed to tear down").unwrap()]
});

/// Whether an error text matches a known, recoverable signature.
///
/// An absent error never matches.
#[must_use]
pub fn matches_known_error(last_error: Option<&str>) -> bool {
    last_error.is_some_and(|text| ERROR_MATCHERS.iter().any(|m| m.is_match(text)))
}

/// Select the nodes eligible for automated recovery.
///
/// Returns UUIDs in sorted order for deterministic display.
#[must_use]
pub fn eligible_nodes(nodes: &BTreeMap<String, Node>) -> Vec<String> {
    nodes
        .iter()
        .filter(|(_, node)| {
            !node.maintenance
                && node.provision_state == ProvisionState::Error
                && matches_known_error(node.last_error.as_deref())
        })
        .map(|(uuid, _)| uuid.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(state: ProvisionState, maintenance: bool, last_error: Option<&str>) -> Node {
        serde_json::from_value(serde_json::json!({
            "uuid": "ignored",
            "provision_state": serde_json::to_value(state).unwrap(),
            "maintenance": maintenance,
            "last_error": last_error,
            "extra": {},
        }))
        .unwrap()
    }

    #[test]
    fn test_known_error_matching() {
        assert!(matches_known_error(Some("Failed to tear down: timeout")));
        assert!(!matches_known_error(Some("something else broke")));
        // Prefix anchor: the signature must open the error text.
        assert!(!matches_known_error(Some("node Failed to tear down")));
        assert!(!matches_known_error(None));
    }

    #[test]
    fn test_eligible_nodes_predicate() {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            "a".to_string(),
            node(ProvisionState::Error, false, Some("Failed to tear down: x")),
        );
        // In maintenance: never auto-touched.
        nodes.insert(
            "b".to_string(),
            node(ProvisionState::Error, true, Some("Failed to tear down")),
        );
        // Wrong state.
        nodes.insert("c".to_string(), node(ProvisionState::Active, false, None));
        // Right state, unrecognized error.
        nodes.insert(
            "d".to_string(),
            node(ProvisionState::Error, false, Some("IPMI timeout")),
        );
        // Right state, no error text at all.
        nodes.insert("e".to_string(), node(ProvisionState::Error, false, None));

        assert_eq!(eligible_nodes(&nodes), vec!["a".to_string()]);
    }

    #[test]
    fn test_eligible_nodes_sorted() {
        let mut nodes = BTreeMap::new();
        for uuid in ["z9", "a1", "m5"] {
            nodes.insert(
                uuid.to_string(),
                node(ProvisionState::Error, false, Some("Failed to tear down")),
            );
        }
        assert_eq!(eligible_nodes(&nodes), vec!["a1", "m5", "z9"]);
    }
}
