//! Error types for inventory service operations.

use thiserror::Error;

/// Errors that can occur when talking to the inventory service.
#[derive(Error, Debug)]
pub enum InventoryError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// The node's state machine rejected the request because a transition
    /// is already in flight (HTTP 409).
    #[error("conflict: {message}")]
    Conflict { message: String },

    /// Node not found.
    #[error("node not found: {0}")]
    NotFound(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl InventoryError {
    /// Whether this error is a 409 conflict, the only failure the caller
    /// may treat as retryable.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }
}
