use serde_json::json;
use spotlike::config::{AuthSession, Endpoints};
use spotlike::error::Error;
use spotlike::server::{CallbackServer, CallbackState};
use spotlike::spotify::client::TokenExchange;
use tokio::sync::oneshot;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Helper to point a token exchange at the mock provider
fn exchange_for(provider: &MockServer, port: u16) -> TokenExchange {
    let session = AuthSession::new(
        "client-id",
        "client-secret",
        &format!("http://localhost:{}/callback", port),
    );
    let endpoints = Endpoints {
        authorize_url: format!("{}/authorize", provider.uri()),
        token_url: format!("{}/api/token", provider.uri()),
        api_url: format!("{}/v1", provider.uri()),
    };
    TokenExchange::new(session, endpoints)
}

async fn mount_token_endpoint(provider: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("code=validcode"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-abc",
            "token_type": "Bearer",
            "expires_in": 3600,
            "refresh_token": "refresh-abc",
            "scope": "user-library-read"
        })))
        .mount(provider)
        .await;
}

#[tokio::test]
async fn test_state_mismatch_rejects_callback_without_client() {
    let provider = MockServer::start().await;
    mount_token_endpoint(&provider).await;

    let port = 18731;
    let (tx, rx) = oneshot::channel();
    let state = CallbackState::new("abc".to_string(), exchange_for(&provider, port), tx);
    let server = CallbackServer::bind(port, "/callback", state).await.unwrap();

    let response = reqwest::get(format!(
        "http://127.0.0.1:{}/callback?code=validcode&state=xyz",
        port
    ))
    .await
    .unwrap();
    assert_eq!(response.status(), 404);

    let delivered = rx.await.unwrap();
    assert!(matches!(delivered, Err(Error::StateMismatch)));

    server.shutdown().await;
}

#[tokio::test]
async fn test_exchange_failure_is_not_overwritten_by_state_mismatch() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant"
        })))
        .mount(&provider)
        .await;

    let port = 18732;
    let (tx, rx) = oneshot::channel();
    let state = CallbackState::new("abc".to_string(), exchange_for(&provider, port), tx);
    let server = CallbackServer::bind(port, "/callback", state).await.unwrap();

    let response = reqwest::get(format!(
        "http://127.0.0.1:{}/callback?code=badcode&state=xyz",
        port
    ))
    .await
    .unwrap();
    assert_eq!(response.status(), 403);

    let delivered = rx.await.unwrap();
    assert!(matches!(delivered, Err(Error::AuthenticationFailed(_))));

    server.shutdown().await;
}

#[tokio::test]
async fn test_matching_callback_delivers_client_once() {
    let provider = MockServer::start().await;
    mount_token_endpoint(&provider).await;

    let port = 18733;
    let (tx, rx) = oneshot::channel();
    let state = CallbackState::new("abc".to_string(), exchange_for(&provider, port), tx);
    let server = CallbackServer::bind(port, "/callback", state).await.unwrap();
    let url = format!(
        "http://127.0.0.1:{}/callback?code=validcode&state=abc",
        port
    );

    let response = reqwest::get(&url).await.unwrap();
    assert_eq!(response.status(), 200);

    let client = rx.await.unwrap().unwrap();
    assert_eq!(client.refresh_token().await, "refresh-abc");
    assert_eq!(client.token().await.access_token, "access-abc");

    // A second callback finds the handoff already used
    let response = reqwest::get(&url).await.unwrap();
    assert_eq!(response.status(), 410);

    server.shutdown().await;
}

#[tokio::test]
async fn test_root_acknowledges_probes_without_consuming_callback() {
    let provider = MockServer::start().await;
    mount_token_endpoint(&provider).await;

    let port = 18734;
    let (tx, rx) = oneshot::channel();
    let state = CallbackState::new("abc".to_string(), exchange_for(&provider, port), tx);
    let server = CallbackServer::bind(port, "/callback", state).await.unwrap();

    for probe in ["/", "/favicon.ico", "/anything/else"] {
        let response = reqwest::get(format!("http://127.0.0.1:{}{}", port, probe))
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        assert_eq!(response.text().await.unwrap(), "");
    }

    let response = reqwest::get(format!(
        "http://127.0.0.1:{}/callback?code=validcode&state=abc",
        port
    ))
    .await
    .unwrap();
    assert_eq!(response.status(), 200);
    assert!(rx.await.unwrap().is_ok());

    server.shutdown().await;
}

#[tokio::test]
async fn test_denied_authorization_fails_with_forbidden() {
    let provider = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&provider)
        .await;

    let port = 18735;
    let (tx, rx) = oneshot::channel();
    let state = CallbackState::new("abc".to_string(), exchange_for(&provider, port), tx);
    let server = CallbackServer::bind(port, "/callback", state).await.unwrap();

    let response = reqwest::get(format!(
        "http://127.0.0.1:{}/callback?error=access_denied&state=abc",
        port
    ))
    .await
    .unwrap();
    assert_eq!(response.status(), 403);
    assert!(matches!(
        rx.await.unwrap(),
        Err(Error::AuthenticationFailed(_))
    ));

    server.shutdown().await;
}

#[tokio::test]
async fn test_shutdown_releases_port() {
    let provider = MockServer::start().await;
    let port = 18736;

    for _ in 0..2 {
        let (tx, _rx) = oneshot::channel();
        let state = CallbackState::new("abc".to_string(), exchange_for(&provider, port), tx);
        let server = CallbackServer::bind(port, "/callback", state).await.unwrap();
        assert_eq!(server.local_addr().port(), port);
        server.shutdown().await;
    }

    assert!(std::net::TcpListener::bind(("127.0.0.1", port)).is_ok());
}
