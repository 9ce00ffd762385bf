//! Reset-pass orchestration over the eligible node set.

use tracing::info;

use inventory::{InventoryClient, InventoryError};

use crate::recover::{Outcome, RecoveryDriver, RetryPolicy};
use crate::report::RunSummary;
use crate::RESET_CAP;

/// Run one recovery pass over the given eligible nodes, in order.
///
/// Nodes already at the reset cap are recorded as skipped without invoking
/// the driver. Each remaining node is stamped and driven through the bounded
/// retry loop before the next node starts. A fatal error aborts the whole
/// pass; outcomes collected so far are dropped with it.
///
/// # Errors
/// Returns the first fatal error from any node's recovery.
pub async fn reset_nodes(
    client: &InventoryClient,
    eligible: &[String],
    dry_run: bool,
    policy: RetryPolicy,
) -> Result<RunSummary, InventoryError> {
    let mut summary = RunSummary::new(dry_run);

    for uuid in eligible {
        let mut driver = RecoveryDriver::new(client.clone(), uuid, dry_run)
            .await?
            .with_policy(policy);

        if driver.tracker().count() >= RESET_CAP {
            info!(node = %uuid, cap = RESET_CAP, "At reset cap, skipping");
            summary.skipped.push(uuid.clone());
            continue;
        }

        match driver.recover().await? {
            Outcome::Succeeded => {
                summary
                    .reset_ok
                    .push((uuid.clone(), driver.tracker().count()));
            }
            Outcome::RetriesExhausted => summary.exhausted.push(uuid.clone()),
        }
    }

    Ok(summary)
}
