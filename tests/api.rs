//! Chat proxy endpoint integration tests
//!
//! The proxy answers HTTP 200 with a `{ response, success, error? }`
//! envelope in every case; these tests pin that contract down without a
//! live upstream.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use talkie_gateway::api::{self, ApiState};
use talkie_gateway::config::{Config, CREDENTIAL_ENV};
use talkie_gateway::{Error, RemoteEngine, ResponseEngine};
use tower::ServiceExt;

/// Build a test router with no upstream credential configured
fn build_test_router() -> axum::Router {
    // Tests only ever remove the credential, so parallel runs cannot race
    std::env::remove_var(CREDENTIAL_ENV);

    let state = Arc::new(ApiState::from_config(&Config::default()));
    api::router(state)
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = build_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_chat_without_credential_is_still_200() {
    let app = build_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"message":"hello"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("API key"));
    // A spoken fallback rides along even on failure
    assert!(!json["response"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_chat_accepts_rolling_history() {
    let app = build_test_router();

    let body = r#"{
        "message": "and in celsius?",
        "conversationHistory": [
            {"role": "user", "content": "how warm is it"},
            {"role": "assistant", "content": "I don't have live weather data."}
        ]
    }"#;

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    // History parses; the turn still fails only on the missing credential
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("API key"));
}

#[tokio::test]
async fn test_chat_malformed_json_folded_into_envelope() {
    let app = build_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/chat")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("not json at all"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert!(json["error"].as_str().unwrap().contains("invalid request"));
}

#[tokio::test]
async fn test_remote_engine_maps_credential_envelope() {
    let app = build_test_router();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    // The proxy answers 200 + success:false; the client maps the "API key"
    // detail back to the credential error
    let engine = RemoteEngine::new(format!("http://{addr}/chat"));
    let err = engine.respond("hello", &[]).await.unwrap_err();
    assert!(matches!(err, Error::MissingCredential));
}

#[tokio::test]
async fn test_chat_preflight_answered_permissively() {
    let app = build_test_router();

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/chat")
                .header(header::ORIGIN, "https://example.com")
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let allow_origin = response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .expect("preflight carries CORS headers");
    assert_eq!(allow_origin, "*");
}
