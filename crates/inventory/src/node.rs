//! Node record and metadata store models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Provision-state label reported by the inventory service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionState {
    /// Node hit an error during a lifecycle operation.
    Error,
    /// Node is deployed and in use.
    Active,
    /// Node is available for deployment.
    Available,
    /// Node is manageable but not yet available.
    Manageable,
    /// Node is being torn down.
    Deleting,
    /// Tear-down finished, node is transitioning out.
    CleanWait,
    /// Any state this client does not track.
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for ProvisionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Active => write!(f, "active"),
            Self::Available => write!(f, "available"),
            Self::Manageable => write!(f, "manageable"),
            Self::Deleting => write!(f, "deleting"),
            Self::CleanWait => write!(f, "clean_wait"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Target state for a provision-state transition request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetState {
    /// Tear the node down and return it to a manageable/available state.
    Deleted,
    /// Move an enrolled node to manageable.
    Manage,
    /// Move a manageable node to available.
    Provide,
}

impl std::fmt::Display for TargetState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Deleted => write!(f, "deleted"),
            Self::Manage => write!(f, "manage"),
            Self::Provide => write!(f, "provide"),
        }
    }
}

/// A value stored in a node's `extra` metadata mapping.
///
/// The service accepts arbitrary JSON here; the shapes this client works
/// with directly are strings and lists of strings (timestamp logs). Anything
/// else round-trips through `Other` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtraValue {
    /// Plain string value.
    Text(String),
    /// List of strings, e.g. an append-only timestamp log.
    List(Vec<String>),
    /// Nested mapping.
    Map(BTreeMap<String, serde_json::Value>),
    /// Anything else the platform stores.
    Other(serde_json::Value),
}

impl ExtraValue {
    /// View this value as a list of strings, empty if it is not one.
    #[must_use]
    pub fn as_list(&self) -> &[String] {
        match self {
            Self::List(items) => items,
            _ => &[],
        }
    }
}

/// A node record from the inventory service.
///
/// Read-only projection of remote state; fetched fresh per workflow pass and
/// never cached across passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Unique node identifier.
    pub uuid: String,
    /// Current provision state.
    pub provision_state: ProvisionState,
    /// Operator-initiated exclusion from automated actions.
    #[serde(default)]
    pub maintenance: bool,
    /// Free-text error from the last failed operation, if any.
    #[serde(default)]
    pub last_error: Option<String>,
    /// Instance deployed on this node, if any.
    #[serde(default)]
    pub instance_uuid: Option<String>,
    /// When the provision state last changed.
    #[serde(default)]
    pub provision_updated_at: Option<String>,
    /// Opaque metadata store, shared with the platform and other tooling.
    #[serde(default)]
    pub extra: BTreeMap<String, ExtraValue>,
}

impl Node {
    /// Number of entries in the list stored under `key`, `0` if the key is
    /// absent or not a list.
    #[must_use]
    pub fn extra_list_len(&self, key: &str) -> usize {
        self.extra.get(key).map_or(0, |v| v.as_list().len())
    }
}
