// src/api/rpc.rs

use crate::mcp::{
    handler::handle_mcp_request,
    protocol::{error_codes, Request, Response},
};
use crate::AppState;
use axum::{extract::State, Json};
use serde_json::Value;

/// `POST /rpc`: the MCP dispatcher behind a plain HTTP route.
pub async fn rpc_handler(State(state): State<AppState>, Json(req): Json<Request>) -> Json<Response> {
    let response = handle_mcp_request(req, state).await.unwrap_or_else(|| {
        Response::error(
            Value::Null,
            error_codes::INVALID_REQUEST,
            "Notifications are not supported over HTTP".into(),
        )
    });
    Json(response)
}
