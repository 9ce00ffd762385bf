//! Persistent, idempotent event tracking on node metadata.
//!
//! The tracker owns an append-only list of timestamps stored under one
//! reserved key in a node's `extra` metadata. The remote service holds the
//! canonical copy; the tracker keeps a cached snapshot that is swapped
//! wholesale after every successful remote call, never mutated in place.

use chrono::{SecondsFormat, Utc};
use tracing::debug;

use inventory::{InventoryClient, InventoryError, Node, PatchOp};

/// Cached node snapshot with a generation stamp.
///
/// The generation counts cache swaps in this process; it exists so tests and
/// debugging can confirm the cache was replaced rather than edited.
#[derive(Debug, Clone)]
struct NodeCache {
    generation: u64,
    node: Node,
}

/// Tracks events by appending timestamps to one reserved key in a node's
/// `extra` metadata.
pub struct EventTracker {
    client: InventoryClient,
    node_uuid: String,
    extra_key: String,
    cache: NodeCache,
}

impl EventTracker {
    /// Create a tracker for one node, fetching its current representation.
    ///
    /// # Errors
    /// Returns error if the node cannot be fetched.
    pub async fn new(
        client: InventoryClient,
        node_uuid: impl Into<String>,
        extra_key: impl Into<String>,
    ) -> Result<Self, InventoryError> {
        let node_uuid = node_uuid.into();
        let node = client.get_node(&node_uuid).await?;

        Ok(Self {
            client,
            node_uuid,
            extra_key: extra_key.into(),
            cache: NodeCache {
                generation: 0,
                node,
            },
        })
    }

    /// The node UUID this tracker is scoped to.
    #[must_use]
    pub fn node_uuid(&self) -> &str {
        &self.node_uuid
    }

    /// The cached node representation.
    #[must_use]
    pub fn node(&self) -> &Node {
        &self.cache.node
    }

    /// How many times the cached snapshot has been swapped.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.cache.generation
    }

    /// Number of recorded timestamps, from the cached view.
    #[must_use]
    pub fn count(&self) -> usize {
        self.cache.node.extra_list_len(&self.extra_key)
    }

    /// Re-fetch the node and replace the cached view.
    ///
    /// # Errors
    /// Returns error if the node cannot be fetched.
    pub async fn refresh(&mut self) -> Result<(), InventoryError> {
        let node = self.client.get_node(&self.node_uuid).await?;
        self.swap(node);
        Ok(())
    }

    /// Append the current UTC time to the tracked list.
    ///
    /// Creating the key and appending to it are different patch shapes, so
    /// the operation is selected from the current count. The server's patch
    /// response is the fresh node representation and replaces the cache, so
    /// a subsequent [`count`](Self::count) reflects server-side order even
    /// under concurrent external mutators.
    ///
    /// # Errors
    /// Returns error on any non-2xx response; conflicts are not retried
    /// here, that is the caller's call.
    pub async fn stamp(&mut self) -> Result<(), InventoryError> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        let op = if self.count() == 0 {
            PatchOp::add_key(&self.extra_key, vec![now])
        } else {
            PatchOp::append(&self.extra_key, now)
        };

        debug!(node = %self.node_uuid, key = %self.extra_key, "Stamping event");
        let node = self.client.patch_node(&self.node_uuid, &[op]).await?;
        self.swap(node);
        Ok(())
    }

    /// Remove the tracked key entirely. No-op (and no remote call) when
    /// nothing is recorded.
    ///
    /// # Errors
    /// Returns error on any non-2xx response.
    pub async fn clear(&mut self) -> Result<(), InventoryError> {
        if self.count() == 0 {
            return Ok(());
        }

        debug!(node = %self.node_uuid, key = %self.extra_key, "Clearing events");
        let op = PatchOp::remove_key(&self.extra_key);
        let node = self.client.patch_node(&self.node_uuid, &[op]).await?;
        self.swap(node);
        Ok(())
    }

    /// Replace the cached snapshot atomically, bumping the generation.
    fn swap(&mut self, node: Node) {
        self.cache = NodeCache {
            generation: self.cache.generation + 1,
            node,
        };
    }
}
