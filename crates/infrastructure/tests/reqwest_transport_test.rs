//! Integration tests for the reqwest transport
//!
//! These tests run the transport against a local axum server that mimics the
//! authentication service, including its session cookie.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};

use passage_application::{AuthSession, HttpTransport, TransportError};
use passage_domain::UserId;
use passage_infrastructure::{ReqwestTransport, TransportConfig};

const SESSION_COOKIE: &str = "session=abc123";

fn has_session(headers: &HeaderMap) -> bool {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.split(';').any(|c| c.trim() == SESSION_COOKIE))
}

fn member() -> Value {
    json!({ "id": "user-123", "email": "ada@example.com", "role": "member" })
}

async fn me(headers: HeaderMap) -> Response {
    if has_session(&headers) {
        Json(member()).into_response()
    } else {
        (StatusCode::UNAUTHORIZED, Json(json!({ "error": "no session" }))).into_response()
    }
}

async fn request_code(Json(body): Json<Value>) -> Response {
    let email = body["email"].as_str().unwrap_or_default();
    if email.contains('@') && body["isDashboardLogin"].is_boolean() {
        StatusCode::NO_CONTENT.into_response()
    } else {
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "message": "invalid email" })),
        )
            .into_response()
    }
}

async fn verify_code(Json(body): Json<Value>) -> Response {
    if body["code"] == "123456" {
        (
            [(header::SET_COOKIE, format!("{SESSION_COOKIE}; Path=/"))],
            Json(json!({ "user": member(), "token": "tok_member_0123456789" })),
        )
            .into_response()
    } else {
        (StatusCode::FORBIDDEN, Json(json!({ "error": "invalid code" }))).into_response()
    }
}

async fn anonymous() -> Response {
    (
        [(header::SET_COOKIE, format!("{SESSION_COOKIE}; Path=/"))],
        Json(json!({
            "user": { "id": "anon-1", "role": "anonymous", "isAnonymous": true },
            "token": "tok_guest"
        })),
    )
        .into_response()
}

async fn sign_out() -> Response {
    (
        StatusCode::NO_CONTENT,
        [(header::SET_COOKIE, "session=; Path=/; Max-Age=0")],
    )
        .into_response()
}

async fn broken() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "maintenance").into_response()
}

async fn teapot() -> Response {
    StatusCode::IM_A_TEAPOT.into_response()
}

async fn not_json() -> &'static str {
    "<html>hello</html>"
}

async fn slow() -> Response {
    tokio::time::sleep(Duration::from_secs(5)).await;
    Json(member()).into_response()
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/api/auth/me", get(me))
        .route("/api/auth/request-code", post(request_code))
        .route("/api/auth/verify-code", post(verify_code))
        .route("/api/auth/anonymous", post(anonymous))
        .route("/api/auth/sign-out", post(sign_out))
        .route("/api/broken", get(broken))
        .route("/api/teapot", get(teapot))
        .route("/api/not-json", get(not_json))
        .route("/api/slow", get(slow));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test server");
    let addr = listener.local_addr().expect("No local address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server failed");
    });

    format!("http://{addr}/api")
}

fn transport(base: &str) -> ReqwestTransport {
    ReqwestTransport::new(TransportConfig::new(base).expect("Invalid base URL"))
        .expect("Failed to build transport")
}

#[tokio::test]
async fn test_unauthorized_without_session_cookie() {
    let base = spawn_server().await;
    let transport = transport(&base);

    let result = transport.get("/auth/me").await;

    assert_eq!(
        result,
        Err(TransportError::Unauthorized("no session".to_string()))
    );
}

#[tokio::test]
async fn test_session_cookie_round_trip() {
    let base = spawn_server().await;
    let transport = transport(&base);

    let verified = transport
        .post(
            "/auth/verify-code",
            Some(json!({ "email": "ada@example.com", "code": "123456", "isDashboardLogin": false })),
        )
        .await
        .expect("verify should succeed")
        .expect("verify should return a body");
    assert_eq!(verified["user"]["id"], "user-123");

    let me = transport.get("/auth/me").await.expect("cookie should be replayed");
    assert_eq!(me["email"], "ada@example.com");

    let signed_out = transport.post("/auth/sign-out", None).await.unwrap();
    assert_eq!(signed_out, None);

    assert!(matches!(
        transport.get("/auth/me").await,
        Err(TransportError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn test_status_classification() {
    let base = spawn_server().await;
    let transport = transport(&base);

    assert_eq!(
        transport
            .post(
                "/auth/verify-code",
                Some(json!({ "email": "a@b.c", "code": "000000", "isDashboardLogin": false })),
            )
            .await,
        Err(TransportError::AuthenticationFailed("invalid code".to_string()))
    );

    assert_eq!(
        transport
            .post(
                "/auth/request-code",
                Some(json!({ "email": "nope", "isDashboardLogin": false })),
            )
            .await,
        Err(TransportError::InvalidInput("invalid email".to_string()))
    );

    assert_eq!(
        transport.get("/broken").await,
        Err(TransportError::Server {
            status: 503,
            message: "maintenance".to_string()
        })
    );

    assert!(matches!(
        transport.get("/teapot").await,
        Err(TransportError::Unclassified(_))
    ));
    assert!(matches!(
        transport.get("/not-json").await,
        Err(TransportError::Unclassified(_))
    ));
}

#[tokio::test]
async fn test_no_content_post_returns_none() {
    let base = spawn_server().await;
    let transport = transport(&base);

    let result = transport
        .post(
            "/auth/request-code",
            Some(json!({ "email": "ada@example.com", "isDashboardLogin": true })),
        )
        .await;

    assert_eq!(result, Ok(None));
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let transport = transport(&format!("http://{addr}/api"));

    assert!(matches!(
        transport.get("/auth/me").await,
        Err(TransportError::Network(_))
    ));
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let base = spawn_server().await;
    let config = TransportConfig::new(&base)
        .unwrap()
        .with_timeout(Duration::from_millis(100));
    let transport = ReqwestTransport::new(config).unwrap();

    assert!(matches!(
        transport.get("/slow").await,
        Err(TransportError::Network(_))
    ));
}

#[tokio::test]
async fn test_session_over_reqwest_transport() {
    let base = spawn_server().await;
    let session = AuthSession::new(Arc::new(transport(&base)));
    let mut states = session.subscribe();

    assert_eq!(states.recv().await, Some(None));

    let response = session
        .verify_sign_in_code("ada@example.com", "123456", false)
        .await
        .expect("verify should succeed");
    assert_eq!(response.user.id, UserId::new("user-123").unwrap());
    assert_eq!(states.recv().await, Some(Some(response.user.clone())));

    let current = session.get_current_user().await.unwrap();
    assert_eq!(current, Some(response.user));
    states.recv().await;

    session.sign_out().await;
    assert_eq!(states.recv().await, Some(None));
    assert_eq!(session.get_current_user().await, Ok(None));

    session.dispose();
}

#[tokio::test]
async fn test_anonymous_session_over_reqwest_transport() {
    let base = spawn_server().await;
    let session = AuthSession::new(Arc::new(transport(&base)));
    let mut states = session.subscribe();
    states.recv().await;

    let response = session.sign_in_anonymously().await.unwrap();

    let published = states.recv().await.flatten().expect("guest should be published");
    assert!(published.is_anonymous());
    assert_eq!(published, response.user);
}
