#![allow(clippy::unwrap_used)]
// Integration tests for `BouncerClient` using wiremock.

use secrecy::ExposeSecret;
use serde_json::json;
use url::Url;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bouncer_api::{BouncerClient, DeviceAction, Error, LoginCredentials};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, BouncerClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = BouncerClient::with_client(
        reqwest::Client::new(),
        base_url,
        LoginCredentials::new("ops@example.com", "hunter2".to_string()),
    );
    (server, client)
}

fn token_body(access: &str, refresh: &str) -> serde_json::Value {
    json!({ "payload": { "accessToken": access, "refreshToken": refresh } })
}

/// Mount login (access-1/refresh-1) and log the client in.
async fn logged_in() -> (MockServer, BouncerClient) {
    let (server, client) = setup().await;
    Mock::given(method("POST"))
        .and(path("/auth/credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("access-1", "refresh-1")))
        .mount(&server)
        .await;
    client.session().login().await.unwrap();
    (server, client)
}

async fn mount_refresh(server: &MockServer, expected: u64) {
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(header("authorization", "Bearer refresh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("access-2", "refresh-2")))
        .expect(expected)
        .mount(server)
        .await;
}

fn device_list() -> serde_json::Value {
    json!({
        "payload": [
            {
                "device": {
                    "id": "dev-1",
                    "nickName": "Gate A",
                    "status": "BLOCKED",
                    "batteryVoltage": 3650,
                    "location": "Lot 4",
                    "firmwareVersion": "1.2.0",
                    "lastConnectionDate": "2024-06-15T10:30:00Z"
                }
            },
            { "device": { "id": "dev-2", "status": "OFFLINE" } }
        ]
    })
}

// ── Device list ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_devices_requires_login() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/user-device"))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_list()))
        .expect(0)
        .mount(&server)
        .await;

    let result = client.list_user_devices().await;
    assert!(
        matches!(result, Err(Error::NotAuthenticated)),
        "expected NotAuthenticated, got: {result:?}"
    );
}

#[tokio::test]
async fn test_list_devices() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/user-device"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_list()))
        .expect(1)
        .mount(&server)
        .await;

    let devices = client.list_user_devices().await.unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].device.id, "dev-1");
    assert_eq!(devices[0].device.nick_name.as_deref(), Some("Gate A"));
    assert_eq!(devices[0].device.battery_voltage, Some(3650));
    assert_eq!(devices[1].device.status.as_deref(), Some("OFFLINE"));
    assert!(devices[1].device.location.is_none());
}

// ── 401 retry ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_refreshes_and_retries_once() {
    let (server, client) = logged_in().await;
    mount_refresh(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/user-device"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user-device"))
        .and(header("authorization", "Bearer access-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(device_list()))
        .expect(1)
        .mount(&server)
        .await;

    let devices = client.list_user_devices().await.unwrap();
    assert_eq!(devices.len(), 2);

    let tokens = client.session().tokens().unwrap();
    assert_eq!(tokens.access_token().expose_secret(), "access-2");
}

#[tokio::test]
async fn test_second_unauthorized_is_surfaced_without_looping() {
    let (server, client) = logged_in().await;
    mount_refresh(&server, 1).await;

    Mock::given(method("GET"))
        .and(path("/user-device"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Unauthorized" })))
        .expect(2)
        .mount(&server)
        .await;

    let result = client.list_user_devices().await;
    match result {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 401);
            assert_eq!(message, "Unauthorized");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }

    // Rejected tokens are dropped: no second refresh, no replay.
    assert!(!client.session().is_authenticated());
    let next = client.list_user_devices().await;
    assert!(matches!(next, Err(Error::NotAuthenticated)), "got: {next:?}");
    assert_eq!(client.session().refresh_count(), 1);
}

#[tokio::test]
async fn test_failed_refresh_during_retry_clears_session() {
    let (server, client) = logged_in().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/user-device"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let result = client.list_user_devices().await;
    assert!(
        matches!(result, Err(Error::Authentication { .. })),
        "expected Authentication error, got: {result:?}"
    );
    assert!(!client.session().is_authenticated());

    let next = client.list_user_devices().await;
    assert!(matches!(next, Err(Error::NotAuthenticated)), "got: {next:?}");
}

// ── Other failures ──────────────────────────────────────────────────

#[tokio::test]
async fn test_server_error_carries_backend_message() {
    let (server, client) = logged_in().await;
    mount_refresh(&server, 0).await;

    Mock::given(method("GET"))
        .and(path("/user-device"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "Database unavailable" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = client.list_user_devices().await;
    match result {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 500);
            assert_eq!(message, "Database unavailable");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_without_message_is_generic() {
    let (server, client) = logged_in().await;

    Mock::given(method("PUT"))
        .and(path("/tcp-device/dev-9/block"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = client.send_device_action("dev-9", DeviceAction::Block).await;
    match result {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "API error occurred");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_malformed_payload_is_deserialization_error() {
    let (server, client) = logged_in().await;

    Mock::given(method("GET"))
        .and(path("/user-device"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let result = client.list_user_devices().await;
    match result {
        Err(Error::Deserialization { ref body, .. }) => {
            assert!(body.contains("maintenance"));
        }
        other => panic!("expected Deserialization error, got: {other:?}"),
    }
}

// ── Device actions ──────────────────────────────────────────────────

#[tokio::test]
async fn test_device_actions_hit_verb_paths() {
    let (server, client) = logged_in().await;

    Mock::given(method("PUT"))
        .and(path("/tcp-device/dev-1/unblock"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/tcp-device/dev-1/block"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client
        .send_device_action("dev-1", DeviceAction::Unblock)
        .await
        .unwrap();
    client
        .send_device_action("dev-1", DeviceAction::Block)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_device_action_retries_after_unauthorized() {
    let (server, client) = logged_in().await;
    mount_refresh(&server, 1).await;

    Mock::given(method("PUT"))
        .and(path("/tcp-device/dev-1/block"))
        .and(header("authorization", "Bearer access-1"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/tcp-device/dev-1/block"))
        .and(header("authorization", "Bearer access-2"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    client
        .send_device_action("dev-1", DeviceAction::Block)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_device_id_cannot_change_the_route() {
    let (server, client) = logged_in().await;

    Mock::given(method("PUT"))
        .and(path("/tcp-device/gate%2F7/unblock"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/tcp-device/gate/7/unblock"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    client
        .send_device_action("gate/7", DeviceAction::Unblock)
        .await
        .unwrap();
}
