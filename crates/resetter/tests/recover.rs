//! Recovery driver retry behavior against a mock inventory service.

use std::time::Duration;

use inventory::{InventoryClient, InventoryError};
use resetter::{Outcome, RecoveryDriver, RetryPolicy, RESET_EXTRA_KEY};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Millisecond delays so the linear backoff does not slow the suite down.
fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        delay_unit: Duration::from_millis(1),
    }
}

fn node_json(resets: &[&str]) -> serde_json::Value {
    serde_json::json!({
        "uuid": "node-a",
        "provision_state": "error",
        "maintenance": false,
        "last_error": "Failed to tear down: x",
        "extra": { RESET_EXTRA_KEY: resets },
    })
}

/// Mounts the GET (driver construction) and PATCH (stamp) mocks.
async fn mock_node_and_stamp(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/nodes/node-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(node_json(&[])))
        .mount(server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/v1/nodes/node-a"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(node_json(&["2024-03-01T12:00:00Z"])),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn conflicts_are_retried_until_success() {
    let server = MockServer::start().await;
    mock_node_and_stamp(&server).await;

    // First two transition attempts conflict, the third is accepted.
    Mock::given(method("PUT"))
        .and(path("/v1/nodes/node-a/states/provision"))
        .respond_with(ResponseTemplate::new(409).set_body_string("node locked"))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/v1/nodes/node-a/states/provision"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let client = InventoryClient::new(server.uri(), "token").unwrap();
    let mut driver = RecoveryDriver::new(client, "node-a", false)
        .await
        .unwrap()
        .with_policy(fast_policy());

    let outcome = driver.recover().await.unwrap();
    assert_eq!(outcome, Outcome::Succeeded);
    assert_eq!(driver.tracker().count(), 1);
}

#[tokio::test]
async fn non_conflict_error_is_fatal_on_first_attempt() {
    let server = MockServer::start().await;
    mock_node_and_stamp(&server).await;

    Mock::given(method("PUT"))
        .and(path("/v1/nodes/node-a/states/provision"))
        .respond_with(ResponseTemplate::new(500).set_body_string("conductor down"))
        .expect(1)
        .mount(&server)
        .await;

    let client = InventoryClient::new(server.uri(), "token").unwrap();
    let mut driver = RecoveryDriver::new(client, "node-a", false)
        .await
        .unwrap()
        .with_policy(fast_policy());

    let err = driver.recover().await.unwrap_err();
    assert!(matches!(err, InventoryError::Api { status: 500, .. }));
}

#[tokio::test]
async fn exhausted_retries_return_explicit_outcome() {
    let server = MockServer::start().await;
    mock_node_and_stamp(&server).await;

    Mock::given(method("PUT"))
        .and(path("/v1/nodes/node-a/states/provision"))
        .respond_with(ResponseTemplate::new(409).set_body_string("node locked"))
        .expect(3)
        .mount(&server)
        .await;

    let client = InventoryClient::new(server.uri(), "token").unwrap();
    let mut driver = RecoveryDriver::new(client, "node-a", false)
        .await
        .unwrap()
        .with_policy(fast_policy());

    let outcome = driver.recover().await.unwrap();
    assert_eq!(outcome, Outcome::RetriesExhausted);
}

#[tokio::test]
async fn dry_run_performs_no_remote_writes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/nodes/node-a"))
        .respond_with(ResponseTemplate::new(200).set_body_json(node_json(&[])))
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/v1/nodes/node-a"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/v1/nodes/node-a/states/provision"))
        .respond_with(ResponseTemplate::new(202))
        .expect(0)
        .mount(&server)
        .await;

    let client = InventoryClient::new(server.uri(), "token").unwrap();
    let mut driver = RecoveryDriver::new(client, "node-a", true)
        .await
        .unwrap()
        .with_policy(fast_policy());

    let outcome = driver.recover().await.unwrap();
    assert_eq!(outcome, Outcome::Succeeded);
    assert_eq!(driver.tracker().count(), 0);
}
