//! Per-node recovery driver with bounded conflict retry.

use std::time::Duration;

use tracing::{debug, info, warn};

use inventory::{InventoryClient, InventoryError, TargetState};

use crate::tracker::EventTracker;
use crate::RESET_EXTRA_KEY;

/// Retry policy for the state-transition loop.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum transition attempts per recovery.
    pub max_attempts: u32,
    /// Base delay unit; attempt `n` (zero-indexed) waits `(n + 1)` units
    /// before the request, including the first. Linear, not exponential:
    /// the wait exists to let a just-issued state change settle.
    pub delay_unit: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_unit: Duration::from_secs(1),
        }
    }
}

/// Result of one recovery run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The transition request was accepted.
    Succeeded,
    /// Every attempt hit a conflict; the node's state is unchanged.
    RetriesExhausted,
}

/// Drives one eligible node back toward a usable state: records the attempt,
/// then requests the transition with a bounded retry on conflicts.
pub struct RecoveryDriver {
    client: InventoryClient,
    tracker: EventTracker,
    policy: RetryPolicy,
    dry_run: bool,
}

impl RecoveryDriver {
    /// Create a driver scoped to one node.
    ///
    /// # Errors
    /// Returns error if the node cannot be fetched.
    pub async fn new(
        client: InventoryClient,
        node_uuid: &str,
        dry_run: bool,
    ) -> Result<Self, InventoryError> {
        let tracker = EventTracker::new(client.clone(), node_uuid, RESET_EXTRA_KEY).await?;
        Ok(Self {
            client,
            tracker,
            policy: RetryPolicy::default(),
            dry_run,
        })
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The event tracker scoped to this driver's node.
    #[must_use]
    pub const fn tracker(&self) -> &EventTracker {
        &self.tracker
    }

    /// Record the attempt and request the state transition.
    ///
    /// The stamp happens once, before the first attempt, so a crash
    /// mid-transition still leaves an accurate attempt count. Retries repeat
    /// only the transition request. A 409 consumes an attempt and continues;
    /// any other failure aborts immediately.
    ///
    /// In dry-run mode this performs no remote writes at all and reports
    /// success without sleeping.
    ///
    /// # Errors
    /// Returns the first non-conflict failure from the stamp or a
    /// transition request.
    pub async fn recover(&mut self) -> Result<Outcome, InventoryError> {
        let uuid = self.tracker.node_uuid().to_string();

        if self.dry_run {
            info!(node = %uuid, "Dry run, skipping stamp and transition");
            return Ok(Outcome::Succeeded);
        }

        self.tracker.stamp().await?;

        for attempt in 0..self.policy.max_attempts {
            // Let a just-issued state change settle before (re)trying.
            tokio::time::sleep(self.policy.delay_unit * (attempt + 1)).await;

            match self
                .client
                .set_provision_state(&uuid, TargetState::Deleted)
                .await
            {
                Ok(()) => {
                    info!(node = %uuid, attempt = attempt + 1, "Transition accepted");
                    return Ok(Outcome::Succeeded);
                }
                Err(e) if e.is_conflict() => {
                    debug!(
                        node = %uuid,
                        attempt = attempt + 1,
                        max = self.policy.max_attempts,
                        "Transition conflicted, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }

        warn!(node = %uuid, attempts = self.policy.max_attempts, "Retries exhausted");
        Ok(Outcome::RetriesExhausted)
    }
}
