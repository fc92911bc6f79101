//! Tests for the HTTP action routes

mod common;

use axum::{
    body::to_bytes,
    http::{Method, Request, StatusCode},
    routing::{get, post},
    Router,
};
use bnb_agent_actions::{
    api::{
        actions::{list_actions_handler, run_action_handler},
        health::health_handler,
        rpc::rpc_handler,
    },
    config::Config,
    AppState,
};
use common::*;
use serde_json::{json, Value};
use tower::ServiceExt;

fn create_test_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/actions", get(list_actions_handler))
        .route("/actions/:name", post(run_action_handler))
        .route("/rpc", post(rpc_handler))
        .with_state(state)
}

fn post_json(uri: &str, body: Value) -> Request<axum::body::Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_reports_signer() {
    let harness = Harness::default();
    let app = create_test_app(AppState::new(signer_config(), Some(harness.context())));

    let response = app
        .oneshot(Request::builder().uri("/health").body(axum::body::Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["actions"], 7);
    assert!(body["signer"]
        .as_str()
        .unwrap()
        .eq_ignore_ascii_case(TEST_ADDRESS));
}

#[tokio::test]
async fn test_list_marks_disabled_actions() {
    let app = create_test_app(AppState::new(Config::default(), None));

    let response = app
        .oneshot(Request::builder().uri("/actions").body(axum::body::Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let actions = body["actions"].as_array().unwrap();
    let enabled = |name: &str| {
        actions
            .iter()
            .find(|a| a["name"] == name)
            .map(|a| a["enabled"].as_bool().unwrap())
            .unwrap()
    };
    assert!(enabled("GET_BALANCE"));
    assert!(enabled("FAUCET"));
    assert!(!enabled("TRANSFER"));
    assert!(!enabled("STAKE"));
}

#[tokio::test]
async fn test_run_balance_action() {
    let harness = Harness::default();
    harness.chain.set_native(addr(RECIPIENT), ether(7));
    let app = create_test_app(AppState::new(signer_config(), Some(harness.context())));

    let response = app
        .oneshot(post_json(
            "/actions/GET_BALANCE",
            json!({"params": {"chain": "bsc", "address": RECIPIENT}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["content"]["balance"], "7");
    assert_eq!(body["content"]["token"], "BNB");
}

#[tokio::test]
async fn test_failed_action_is_unprocessable() {
    let harness = Harness::default();
    let app = create_test_app(AppState::new(signer_config(), Some(harness.context())));

    let response = app
        .oneshot(post_json(
            "/actions/BRIDGE",
            json!({"params": {"fromChain": "opBNB", "toChain": "opBNBTestnet", "amount": "1"}}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["content"]["kind"], "UnsupportedDirection");
}

#[tokio::test]
async fn test_unknown_action_is_not_found() {
    let app = create_test_app(AppState::new(Config::default(), None));
    let response = app
        .oneshot(post_json("/actions/NOPE", json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rpc_route_forwards_to_mcp() {
    let app = create_test_app(AppState::new(Config::default(), None));

    let response = app
        .clone()
        .oneshot(post_json(
            "/rpc",
            json!({"jsonrpc": "2.0", "id": 4, "method": "tools/list"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["id"], 4);
    assert_eq!(body["result"]["tools"].as_array().unwrap().len(), 7);

    let response = app
        .oneshot(post_json("/rpc", json!({"method": "notifications/initialized"})))
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], -32600);
}
