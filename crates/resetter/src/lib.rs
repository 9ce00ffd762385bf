//! Resets bare metal nodes stuck in a known, recoverable error state.
//!
//! The workflow reads every node from the inventory service, selects the ones
//! whose reported error matches a known signature, records the attempt on the
//! node's own `extra` metadata, and requests a state transition back to a
//! usable state. Nodes that have accumulated too many recorded resets are
//! skipped rather than reset forever.
//!
//! Pipeline: fetch nodes -> [`classify::eligible_nodes`] -> per node
//! [`EventTracker::stamp`] -> [`RecoveryDriver::recover`] (bounded retry) ->
//! summary report.

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod classify;
pub mod recover;
pub mod report;
pub mod tracker;
pub mod workflow;

pub use recover::{Outcome, RecoveryDriver, RetryPolicy};
pub use report::RunSummary;
pub use tracker::EventTracker;

/// Tool name used in logs and notifications.
pub const TOOL_NAME: &str = "error-resetter";

/// Reserved key in a node's `extra` metadata holding the reset timestamps.
pub const RESET_EXTRA_KEY: &str = "hammer_error_resets";

/// A node with this many recorded resets is no longer auto-reset.
pub const RESET_CAP: usize = 3;
