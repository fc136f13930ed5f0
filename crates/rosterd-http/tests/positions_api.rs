// rosterd-http/tests/positions_api.rs
// ============================================================================
// Module: Positions API Tests
// Description: End-to-end HTTP tests for the positions surface.
// Purpose: Validate the envelope, auth gating, and not-found policy over HTTP.
// Dependencies: rosterd-core, rosterd-http, reqwest, tokio
// ============================================================================

//! End-to-end tests against a server bound to an ephemeral port.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions use unwrap for clarity."
)]

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use rosterd_core::InMemoryPositionStore;
use rosterd_core::SharedPositionStore;
use rosterd_http::AppState;
use rosterd_http::NoopAuditSink;
use rosterd_http::TokenIssuer;
use rosterd_http::TokenVerifier;
use rosterd_http::router;
use serde_json::Value;
use serde_json::json;

const SECRET: &str = "integration-test-secret-0123456789";

/// Running test server plus a token issuer for the same secret.
struct TestServer {
    /// Base URL of the spawned server.
    base_url: String,
    /// Issuer sharing the server's secret.
    issuer: TokenIssuer,
    /// HTTP client for requests.
    client: reqwest::Client,
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn token_for(&self, user_id: i64) -> String {
        self.issuer.issue(rosterd_core::UserId::new(user_id)).expect("issue token")
    }
}

async fn spawn_server() -> TestServer {
    let state = Arc::new(AppState {
        store: SharedPositionStore::from_store(InMemoryPositionStore::new()),
        verifier: TokenVerifier::new(SECRET),
        audit: Arc::new(NoopAuditSink),
        store_timeout: Duration::from_millis(2_000),
    });
    let app = router(state, 64 * 1024);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    TestServer {
        base_url: format!("http://{addr}"),
        issuer: TokenIssuer::new(SECRET, 900),
        client: reqwest::Client::new(),
    }
}

async fn create_position(server: &TestServer, user_id: i64, code: &str, name: &str) -> Value {
    let response = server
        .client
        .post(server.url("/positions"))
        .bearer_auth(server.token_for(user_id))
        .json(&json!({ "code": code, "name": name }))
        .send()
        .await
        .expect("post");
    assert_eq!(response.status(), StatusCode::CREATED);
    response.json::<Value>().await.expect("json")
}

#[tokio::test]
async fn greeting_route_returns_greeting() {
    let server = spawn_server().await;
    let response = server.client.get(server.url("/")).send().await.expect("get");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.expect("text"), "Hello there! How are you?");
}

#[tokio::test]
async fn list_is_public_and_starts_empty() {
    let server = spawn_server().await;
    let response = server.client.get(server.url("/positions")).send().await.expect("get");
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.json::<Value>().await.expect("json");
    assert_eq!(body["message"], "All positions retrieved successfully!");
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn create_requires_bearer_token_and_leaves_store_untouched() {
    let server = spawn_server().await;
    let response = server
        .client
        .post(server.url("/positions"))
        .json(&json!({ "code": "ENG", "name": "Engineer" }))
        .send()
        .await
        .expect("post");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = response.json::<Value>().await.expect("json");
    assert_eq!(body["error"]["code"], "unauthenticated");

    // The rejected request produced no store side effects.
    let list = server.client.get(server.url("/positions")).send().await.expect("get");
    let body = list.json::<Value>().await.expect("json");
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn create_stamps_acting_user_as_owner() {
    let server = spawn_server().await;
    let body = create_position(&server, 7, "ENG", "Engineer").await;
    assert_eq!(body["message"], "Position created successfully!");
    assert_eq!(body["data"]["owner_id"], 7);
    assert_eq!(body["data"]["position_code"], "ENG");
    assert_eq!(body["data"]["position_name"], "Engineer");
    assert!(body["data"]["position_id"].as_i64().expect("id") > 0);
}

#[tokio::test]
async fn get_one_returns_row_or_structured_404() {
    let server = spawn_server().await;
    let created = create_position(&server, 7, "ENG", "Engineer").await;
    let id = created["data"]["position_id"].as_i64().expect("id");

    let found = server
        .client
        .get(server.url(&format!("/positions/{id}")))
        .send()
        .await
        .expect("get");
    assert_eq!(found.status(), StatusCode::OK);
    let body = found.json::<Value>().await.expect("json");
    assert_eq!(body["message"], "Position retrieved successfully!");
    assert_eq!(body["data"]["position_id"], id);

    let missing =
        server.client.get(server.url("/positions/999999")).send().await.expect("get");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body = missing.json::<Value>().await.expect("json");
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn update_applies_partial_patch_and_restamps_owner() {
    let server = spawn_server().await;
    let created = create_position(&server, 7, "ENG", "Engineer").await;
    let id = created["data"]["position_id"].as_i64().expect("id");

    let response = server
        .client
        .put(server.url(&format!("/positions/{id}")))
        .bearer_auth(server.token_for(9))
        .json(&json!({ "code": "OPS" }))
        .send()
        .await
        .expect("put");
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.json::<Value>().await.expect("json");
    assert_eq!(body["message"], "Position updated successfully!");
    assert_eq!(body["data"]["position_code"], "OPS");
    assert_eq!(body["data"]["position_name"], "Engineer");
    assert_eq!(body["data"]["owner_id"], 9);
}

#[tokio::test]
async fn update_with_empty_body_keeps_fields() {
    let server = spawn_server().await;
    let created = create_position(&server, 7, "ENG", "Engineer").await;
    let id = created["data"]["position_id"].as_i64().expect("id");

    let response = server
        .client
        .put(server.url(&format!("/positions/{id}")))
        .bearer_auth(server.token_for(9))
        .json(&json!({}))
        .send()
        .await
        .expect("put");
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.json::<Value>().await.expect("json");
    assert_eq!(body["data"]["position_code"], "ENG");
    assert_eq!(body["data"]["position_name"], "Engineer");
    assert_eq!(body["data"]["owner_id"], 9);
}

#[tokio::test]
async fn update_and_delete_of_missing_row_return_404() {
    let server = spawn_server().await;
    let token = server.token_for(7);

    let update = server
        .client
        .put(server.url("/positions/424242"))
        .bearer_auth(&token)
        .json(&json!({ "code": "OPS" }))
        .send()
        .await
        .expect("put");
    assert_eq!(update.status(), StatusCode::NOT_FOUND);

    let delete = server
        .client
        .delete(server.url("/positions/424242"))
        .bearer_auth(&token)
        .send()
        .await
        .expect("delete");
    assert_eq!(delete.status(), StatusCode::NOT_FOUND);
    let body = delete.json::<Value>().await.expect("json");
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn delete_returns_prior_row_then_404() {
    let server = spawn_server().await;
    let created = create_position(&server, 7, "ENG", "Engineer").await;
    let id = created["data"]["position_id"].as_i64().expect("id");

    let response = server
        .client
        .delete(server.url(&format!("/positions/{id}")))
        .bearer_auth(server.token_for(7))
        .send()
        .await
        .expect("delete");
    assert_eq!(response.status(), StatusCode::OK);
    let body = response.json::<Value>().await.expect("json");
    assert_eq!(body["message"], format!("Position ID {id} deleted successfully!"));
    assert_eq!(body["data"]["position_code"], "ENG");

    let missing = server
        .client
        .get(server.url(&format!("/positions/{id}")))
        .send()
        .await
        .expect("get");
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_integer_id_is_a_client_error() {
    let server = spawn_server().await;
    let response =
        server.client.get(server.url("/positions/not-a-number")).send().await.expect("get");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>().await.expect("json");
    assert_eq!(body["error"]["code"], "invalid_request");
}

#[tokio::test]
async fn mutating_routes_reject_invalid_tokens() {
    let server = spawn_server().await;
    let created = create_position(&server, 7, "ENG", "Engineer").await;
    let id = created["data"]["position_id"].as_i64().expect("id");

    let update = server
        .client
        .put(server.url(&format!("/positions/{id}")))
        .bearer_auth("not-a-jwt")
        .json(&json!({ "code": "OPS" }))
        .send()
        .await
        .expect("put");
    assert_eq!(update.status(), StatusCode::UNAUTHORIZED);

    let delete = server
        .client
        .delete(server.url(&format!("/positions/{id}")))
        .send()
        .await
        .expect("delete");
    assert_eq!(delete.status(), StatusCode::UNAUTHORIZED);

    // The row is untouched after the rejected mutations.
    let found = server
        .client
        .get(server.url(&format!("/positions/{id}")))
        .send()
        .await
        .expect("get");
    let body = found.json::<Value>().await.expect("json");
    assert_eq!(body["data"]["position_code"], "ENG");
    assert_eq!(body["data"]["owner_id"], 7);
}

#[tokio::test]
async fn overlong_body_fields_are_rejected() {
    let server = spawn_server().await;
    let response = server
        .client
        .post(server.url("/positions"))
        .bearer_auth(server.token_for(7))
        .json(&json!({ "code": "c".repeat(65), "name": "Engineer" }))
        .send()
        .await
        .expect("post");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response.json::<Value>().await.expect("json");
    assert_eq!(body["error"]["code"], "invalid_request");
}
