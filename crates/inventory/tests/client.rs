//! Integration tests for the inventory client against a mock service.

use inventory::{InventoryClient, PatchOp, ProvisionState, TargetState};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn node_json(uuid: &str, state: &str, resets: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "uuid": uuid,
        "provision_state": state,
        "maintenance": false,
        "last_error": null,
        "instance_uuid": null,
        "provision_updated_at": "2024-03-01T12:00:00+00:00",
        "extra": { "hammer_error_resets": resets },
    })
}

#[tokio::test]
async fn list_nodes_detailed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/nodes/detail"))
        .and(header("X-Auth-Token", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "nodes": [
                node_json("node-a", "error", &[]),
                node_json("node-b", "active", &[]),
            ]
        })))
        .mount(&server)
        .await;

    let client = InventoryClient::new(server.uri(), "secret").unwrap();
    let nodes = client.list_nodes(true).await.unwrap();

    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes["node-a"].provision_state, ProvisionState::Error);
    assert_eq!(nodes["node-b"].provision_state, ProvisionState::Active);
}

#[tokio::test]
async fn get_node_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/nodes/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such node"))
        .mount(&server)
        .await;

    let client = InventoryClient::new(server.uri(), "secret").unwrap();
    let err = client.get_node("missing").await.unwrap_err();
    assert!(matches!(err, inventory::InventoryError::NotFound(_)));
}

#[tokio::test]
async fn set_provision_state_sends_target() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/nodes/node-a/states/provision"))
        .and(body_json(serde_json::json!({ "target": "deleted" })))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let client = InventoryClient::new(server.uri(), "secret").unwrap();
    client
        .set_provision_state("node-a", TargetState::Deleted)
        .await
        .unwrap();
}

#[tokio::test]
async fn set_provision_state_conflict_is_distinguishable() {
    let server = MockServer::start().await;

    Mock::given(method("PUT"))
        .and(path("/v1/nodes/node-a/states/provision"))
        .respond_with(ResponseTemplate::new(409).set_body_string("node locked"))
        .mount(&server)
        .await;

    let client = InventoryClient::new(server.uri(), "secret").unwrap();
    let err = client
        .set_provision_state("node-a", TargetState::Deleted)
        .await
        .unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn patch_node_returns_updated_representation() {
    let server = MockServer::start().await;

    let expected_patch = serde_json::json!([{
        "op": "add",
        "path": "/extra/hammer_error_resets",
        "value": ["2024-03-01T12:00:00+00:00"],
    }]);

    Mock::given(method("PATCH"))
        .and(path("/v1/nodes/node-a"))
        .and(body_json(expected_patch))
        .respond_with(ResponseTemplate::new(200).set_body_json(node_json(
            "node-a",
            "error",
            &["2024-03-01T12:00:00+00:00"],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = InventoryClient::new(server.uri(), "secret").unwrap();
    let patch = vec![PatchOp::add_key(
        "hammer_error_resets",
        vec!["2024-03-01T12:00:00+00:00"],
    )];
    let node = client.patch_node("node-a", &patch).await.unwrap();

    assert_eq!(node.extra_list_len("hammer_error_resets"), 1);
}
