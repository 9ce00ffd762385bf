//! JSON-patch primitives for partial node updates.
//!
//! The service accepts RFC 6902-style patches against the node document. The
//! only paths this client mutates live under the `extra` metadata store, so
//! the constructors here build exactly the three shapes the workflow needs:
//! create a key, append to an existing array-valued key, and remove a key.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Patch operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchKind {
    /// Add a value at a path (creates a field, or appends when the path
    /// ends in `/-`).
    Add,
    /// Remove the value at a path.
    Remove,
}

/// A single patch operation against a node document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchOp {
    /// Operation kind.
    pub op: PatchKind,
    /// Document path, e.g. `/extra/some_key`.
    pub path: String,
    /// Value for `add` operations.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl PatchOp {
    /// Create `/extra/{key}` with `value`.
    #[must_use]
    pub fn add_key(key: &str, value: impl Into<Value>) -> Self {
        Self {
            op: PatchKind::Add,
            path: format!("/extra/{key}"),
            value: Some(value.into()),
        }
    }

    /// Append `value` to the existing array at `/extra/{key}`.
    #[must_use]
    pub fn append(key: &str, value: impl Into<Value>) -> Self {
        Self {
            op: PatchKind::Add,
            path: format!("/extra/{key}/-"),
            value: Some(value.into()),
        }
    }

    /// Remove `/extra/{key}` entirely.
    #[must_use]
    pub fn remove_key(key: &str) -> Self {
        Self {
            op: PatchKind::Remove,
            path: format!("/extra/{key}"),
            value: None,
        }
    }
}
