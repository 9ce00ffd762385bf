//! Inventory service API client implementation.

use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::InventoryError;
use crate::node::{Node, TargetState};
use crate::patch::PatchOp;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// API microversion this client speaks. 1.9 is the first version with
/// array-append patch support on the `extra` field.
const API_VERSION: &str = "1.9";

/// Client for the bare metal inventory service.
///
/// Holds the authenticated session token for the run; the token is immutable
/// for the client's lifetime.
#[derive(Clone)]
pub struct InventoryClient {
    /// HTTP client.
    client: Client,
    /// Service base URL, e.g. `https://ironic.example.com:6385`.
    base_url: String,
    /// Auth token sent with every request.
    token: String,
}

/// Listing response wrapper.
#[derive(Debug, Deserialize)]
struct NodesResponse {
    nodes: Vec<Node>,
}

/// Body for a provision-state transition request.
#[derive(Debug, Serialize)]
struct ProvisionStateBody {
    target: TargetState,
}

impl InventoryClient {
    /// Create a new client.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be created.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, InventoryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// List all nodes, keyed by UUID.
    ///
    /// With `detailed`, the full node representation (including `last_error`,
    /// `maintenance`, and `extra`) is returned for every node.
    ///
    /// # Errors
    /// Returns error on any non-2xx response.
    pub async fn list_nodes(
        &self,
        detailed: bool,
    ) -> Result<BTreeMap<String, Node>, InventoryError> {
        let path = if detailed {
            "/v1/nodes/detail"
        } else {
            "/v1/nodes"
        };
        let response: NodesResponse = self.get(path).await?;

        Ok(response
            .nodes
            .into_iter()
            .map(|n| (n.uuid.clone(), n))
            .collect())
    }

    /// Fetch a single node's full representation.
    ///
    /// # Errors
    /// Returns `NotFound` for unknown UUIDs, or error on any other non-2xx
    /// response.
    pub async fn get_node(&self, uuid: &str) -> Result<Node, InventoryError> {
        self.get(&format!("/v1/nodes/{uuid}")).await
    }

    /// Request a provision-state transition.
    ///
    /// # Errors
    /// Returns `Conflict` when the node's state machine is mid-transition
    /// (HTTP 409), or error on any other non-2xx response.
    pub async fn set_provision_state(
        &self,
        uuid: &str,
        target: TargetState,
    ) -> Result<(), InventoryError> {
        let url = format!("{}/v1/nodes/{uuid}/states/provision", self.base_url);
        debug!(url = %url, target = %target, "PUT provision state");

        let response = self
            .client
            .put(&url)
            .header("X-Auth-Token", &self.token)
            .header("X-OpenStack-Ironic-API-Version", API_VERSION)
            .json(&ProvisionStateBody { target })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            let text = response.text().await.unwrap_or_default();
            Err(Self::to_api_error(status, text))
        }
    }

    /// Apply a partial update to a node and return the full updated
    /// representation from the server's response.
    ///
    /// # Errors
    /// Returns `Conflict` on contention (HTTP 409), or error on any other
    /// non-2xx response.
    pub async fn patch_node(
        &self,
        uuid: &str,
        patch: &[PatchOp],
    ) -> Result<Node, InventoryError> {
        let url = format!("{}/v1/nodes/{uuid}", self.base_url);
        debug!(url = %url, ops = patch.len(), "PATCH node");

        let response = self
            .client
            .patch(&url)
            .header("X-Auth-Token", &self.token)
            .header("X-OpenStack-Ironic-API-Version", API_VERSION)
            .json(patch)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Make an authenticated GET request.
    async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T, InventoryError> {
        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "GET request");

        let response = self
            .client
            .get(&url)
            .header("X-Auth-Token", &self.token)
            .header("X-OpenStack-Ironic-API-Version", API_VERSION)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle API response, parsing JSON or error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, InventoryError> {
        let status = response.status();
        let text = response.text().await?;

        if status.is_success() {
            serde_json::from_str(&text).map_err(|e| {
                warn!(error = %e, body = %text, "Failed to parse response");
                InventoryError::Serialization(e)
            })
        } else {
            Err(Self::to_api_error(status, text))
        }
    }

    /// Map a non-2xx status to the error taxonomy. The 409 case must stay
    /// distinguishable from every other failure.
    fn to_api_error(status: StatusCode, message: String) -> InventoryError {
        match status {
            StatusCode::CONFLICT => InventoryError::Conflict { message },
            StatusCode::NOT_FOUND => InventoryError::NotFound(message),
            _ => InventoryError::Api {
                status: status.as_u16(),
                message,
            },
        }
    }
}
