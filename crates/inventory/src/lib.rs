//! HTTP client for the bare metal inventory service.
//!
//! This crate provides a typed client for reading node records, requesting
//! provision-state transitions, and applying partial updates (JSON patches)
//! to a node's `extra` metadata store.
//!
//! # Example
//!
//! ```rust,ignore
//! use inventory::{InventoryClient, TargetState};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = InventoryClient::new("https://ironic.example.com:6385", "token")?;
//!
//!     let nodes = client.list_nodes(true).await?;
//!     for (uuid, node) in &nodes {
//!         println!("{uuid}: {}", node.provision_state);
//!     }
//!
//!     client.set_provision_state("some-uuid", TargetState::Deleted).await?;
//!     Ok(())
//! }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod error;
pub mod node;
pub mod patch;

pub use client::InventoryClient;
pub use error::InventoryError;
pub use node::{ExtraValue, Node, ProvisionState, TargetState};
pub use patch::PatchOp;
