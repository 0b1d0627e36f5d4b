#![allow(clippy::unwrap_used)]
// Integration tests for `SessionManager` using wiremock.

use std::time::Duration;

use secrecy::ExposeSecret;
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bouncer_api::{BouncerClient, Error, LoginCredentials};

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

async fn mount_login(server: &MockServer, access: &str, refresh: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(access, refresh)))
        .mount(server)
        .await;
}

// ── Login ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_sends_credentials_and_stores_tokens() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/credentials"))
        .and(body_json(json!({ "email": "ops@example.com", "password": "hunter2" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("access-1", "refresh-1")))
        .expect(1)
        .mount(&server)
        .await;

    let session = client.session();
    assert!(!session.is_authenticated());

    session.login().await.unwrap();

    assert!(session.is_authenticated());
    let tokens = session.tokens().unwrap();
    assert_eq!(tokens.access_token().expose_secret(), "access-1");
    assert_eq!(tokens.refresh_token().expose_secret(), "refresh-1");
}

#[tokio::test]
async fn test_login_failure_clears_existing_tokens() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("access-1", "refresh-1")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/credentials"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let session = client.session();
    session.login().await.unwrap();
    assert!(session.is_authenticated());

    let result = session.login().await;
    match result {
        Err(Error::Authentication { ref message }) => {
            assert_eq!(message, "Invalid credentials");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_login_rejection_without_message_uses_status() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/credentials"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let result = client.session().login().await;
    match result {
        Err(Error::Authentication { ref message }) => {
            assert!(message.contains("403"), "unexpected message: {message}");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

// ── Refresh ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_refresh_without_token_fails_without_request() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("a", "r")))
        .expect(0)
        .mount(&server)
        .await;

    let result = client.session().refresh().await;
    assert!(
        matches!(result, Err(Error::NoRefreshToken)),
        "expected NoRefreshToken, got: {result:?}"
    );
}

#[tokio::test]
async fn test_refresh_sends_refresh_token_and_rotates_pair() {
    let (server, client) = setup().await;
    mount_login(&server, "access-1", "refresh-1").await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(header("authorization", "Bearer refresh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("access-2", "refresh-2")))
        .expect(1)
        .mount(&server)
        .await;

    let session = client.session();
    session.login().await.unwrap();
    session.refresh().await.unwrap();

    let tokens = session.tokens().unwrap();
    assert_eq!(tokens.access_token().expose_secret(), "access-2");
    assert_eq!(tokens.refresh_token().expose_secret(), "refresh-2");
    assert_eq!(session.refresh_count(), 1);
}

#[tokio::test]
async fn test_refresh_failure_clears_session() {
    let (server, client) = setup().await;
    mount_login(&server, "access-1", "refresh-1").await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "Token expired" })))
        .expect(1)
        .mount(&server)
        .await;

    let session = client.session();
    session.login().await.unwrap();

    let result = session.refresh().await;
    assert!(
        matches!(result, Err(Error::Authentication { ref message }) if message == "Token expired"),
        "expected Authentication error, got: {result:?}"
    );
    assert!(!session.is_authenticated());

    // Terminal for the session: the next refresh has nothing to send.
    let again = session.refresh().await;
    assert!(matches!(again, Err(Error::NoRefreshToken)), "got: {again:?}");
}

#[tokio::test]
async fn test_concurrent_refreshes_share_one_request() {
    let (server, client) = setup().await;
    mount_login(&server, "access-1", "refresh-1").await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body("access-2", "refresh-2"))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = client.session();
    session.login().await.unwrap();

    let first = session.clone();
    let second = session.clone();
    let (a, b) = tokio::join!(
        async move {
            first.refresh().await?;
            Ok::<_, Error>(first.tokens())
        },
        async move {
            second.refresh().await?;
            Ok::<_, Error>(second.tokens())
        },
    );

    let a = a.unwrap().unwrap();
    let b = b.unwrap().unwrap();
    assert!(a.same_as(&b), "both callers should observe the same pair");
    assert_eq!(a.access_token().expose_secret(), "access-2");
    assert_eq!(session.refresh_count(), 1);
}

#[tokio::test]
async fn test_concurrent_refresh_failure_is_shared() {
    let (server, client) = setup().await;
    mount_login(&server, "access-1", "refresh-1").await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "message": "revoked" }))
                .set_delay(Duration::from_millis(150)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = client.session();
    session.login().await.unwrap();

    let (a, b) = tokio::join!(session.refresh(), session.refresh());
    assert!(matches!(a, Err(Error::Authentication { .. })), "got: {a:?}");
    assert!(matches!(b, Err(Error::Authentication { ref message }) if message == "revoked"), "got: {b:?}");
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn test_sequential_refreshes_each_hit_the_backend() {
    let (server, client) = setup().await;
    mount_login(&server, "access-1", "refresh-1").await;

    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("access-2", "refresh-2")))
        .expect(2)
        .mount(&server)
        .await;

    let session = client.session();
    session.login().await.unwrap();

    session.refresh().await.unwrap();
    session.refresh().await.unwrap();
    assert_eq!(session.refresh_count(), 2);
}

#[tokio::test]
async fn test_refresh_queued_behind_login_does_not_replay_stale_outcome() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/auth/credentials"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body("access-1", "refresh-1"))
                .set_delay(Duration::from_millis(150)),
        )
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/refresh"))
        .and(header("authorization", "Bearer refresh-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body("access-2", "refresh-2")))
        .expect(2)
        .mount(&server)
        .await;

    let session = client.session();
    session.login().await.unwrap();
    session.refresh().await.unwrap();

    // A refresh that waits on a login must send its own request with the
    // fresh refresh token rather than reuse the earlier outcome.
    let login = session.clone();
    let refresh = session.clone();
    let (logged_in, refreshed) = tokio::join!(login.login(), async move {
        tokio::time::sleep(Duration::from_millis(30)).await;
        refresh.refresh().await
    });
    logged_in.unwrap();
    refreshed.unwrap();

    let tokens = session.tokens().unwrap();
    assert_eq!(tokens.access_token().expose_secret(), "access-2");
    assert_eq!(session.refresh_count(), 2);
}
