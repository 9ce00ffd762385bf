//! Human-readable reporting of workflow outcomes.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use inventory::Node;
use notify::Severity;

/// Per-node outcomes collected over one reset pass.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Nodes whose transition was accepted, with the attempt count after
    /// the call.
    pub reset_ok: Vec<(String, usize)>,
    /// Nodes that ran out of conflict retries; their state is unchanged.
    pub exhausted: Vec<String>,
    /// Nodes skipped because they already sit at the reset cap.
    pub skipped: Vec<String>,
    /// Whether this pass was a dry run.
    pub dry_run: bool,
}

impl RunSummary {
    /// Create an empty summary for a pass.
    #[must_use]
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Severity of the report as a whole.
    #[must_use]
    pub fn severity(&self) -> Severity {
        if self.exhausted.is_empty() {
            Severity::Info
        } else {
            Severity::Warning
        }
    }

    /// Render the summary message sent to stdout and the notifier.
    #[must_use]
    pub fn to_message(&self) -> String {
        let mut lines = Vec::new();

        if !self.reset_ok.is_empty() {
            lines.push("Performed reset of nodes".to_string());
            lines.extend(
                self.reset_ok
                    .iter()
                    .map(|(uuid, count)| format!(" • `{uuid}`: {count} resets")),
            );
        }
        if !self.exhausted.is_empty() {
            lines.push("Exhausted retries (state unchanged)".to_string());
            lines.extend(self.exhausted.iter().map(|uuid| format!(" • `{uuid}`")));
        }
        if !self.skipped.is_empty() {
            lines.push("Skipped (already at limit)".to_string());
            lines.extend(self.skipped.iter().map(|uuid| format!(" • `{uuid}`")));
        }
        if self.dry_run {
            lines.push("dry run, no changes actually made.".to_string());
        }

        lines.join("\n")
    }
}

/// Fields shown per node in `info` mode.
const INFO_FIELDS: [&str; 7] = [
    "uuid",
    "provision_updated_at",
    "provision_state",
    "last_error",
    "instance_uuid",
    "extra",
    "maintenance",
];

/// Render the `info` mode listing for the eligible nodes.
#[must_use]
pub fn info_text(nodes: &BTreeMap<String, Node>, eligible: &[String]) -> String {
    let mut out = format!("{} node(s) in a state that we can treat", eligible.len());

    for uuid in eligible {
        let Some(node) = nodes.get(uuid) else {
            continue;
        };

        let _ = write!(out, "\n{}", "-".repeat(40));
        for field in INFO_FIELDS {
            let _ = write!(out, "\n{field:<25} {}", field_value(node, field));
        }
    }

    out
}

/// Display value for one info field.
fn field_value(node: &Node, field: &str) -> String {
    match field {
        "uuid" => node.uuid.clone(),
        "provision_updated_at" => node.provision_updated_at.clone().unwrap_or_default(),
        "provision_state" => node.provision_state.to_string(),
        "last_error" => node.last_error.clone().unwrap_or_default(),
        "instance_uuid" => node.instance_uuid.clone().unwrap_or_default(),
        "extra" => serde_json::to_string(&node.extra).unwrap_or_default(),
        "maintenance" => node.maintenance.to_string(),
        _ => String::new(),
    }
}
