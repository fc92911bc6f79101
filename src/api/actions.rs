// src/api/actions.rs

use crate::actions::{find_action, missing_context, ActionCallback};
use crate::mcp::handler::tool_definition;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

/// Body of `POST /actions/:name`.
#[derive(Debug, Default, Deserialize)]
pub struct ActionRequest {
    /// Free-text message; the regex extractor runs over it first.
    #[serde(default)]
    pub text: String,
    /// Structured parameters used where the message is silent.
    #[serde(default)]
    pub params: Value,
}

#[derive(Debug, Serialize)]
pub struct ActionResponse {
    pub action: String,
    pub success: bool,
    pub text: String,
    pub content: Value,
}

// GET /actions
pub async fn list_actions_handler(State(state): State<AppState>) -> impl IntoResponse {
    let actions: Vec<Value> = state
        .actions
        .iter()
        .map(|action| {
            let mut definition = tool_definition(action.as_ref());
            definition["enabled"] = json!(action.validate(&state.config));
            definition
        })
        .collect();
    Json(json!({ "actions": actions }))
}

// POST /actions/:name
pub async fn run_action_handler(
    Path(name): Path<String>,
    State(state): State<AppState>,
    Json(req): Json<ActionRequest>,
) -> impl IntoResponse {
    let action = match find_action(&state.actions, &name) {
        Some(action) => action.clone(),
        None => {
            return (StatusCode::NOT_FOUND, format!("Unknown action: {}", name)).into_response();
        }
    };

    let ctx = match (action.validate(&state.config), state.context.as_ref()) {
        (true, Some(ctx)) => ctx.clone(),
        _ => {
            let err = missing_context();
            error!("{} unavailable: {}", action.name(), err);
            let body = ActionResponse {
                action: action.name().to_string(),
                success: false,
                text: format!("Error: {}", err.user_message()),
                content: err.to_content(json!({ "action": action.name() })),
            };
            return (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response();
        }
    };

    info!("HTTP request for {}", action.name());
    let mut delivered: Option<ActionCallback> = None;
    let success = action
        .handle(&ctx, &req.text, &req.params, &mut |cb| delivered = Some(cb))
        .await;
    let callback = delivered.unwrap_or_else(|| ActionCallback {
        text: String::new(),
        content: Value::Null,
    });

    let status = if success {
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    let body = ActionResponse {
        action: action.name().to_string(),
        success,
        text: callback.text,
        content: callback.content,
    };
    (status, Json(body)).into_response()
}
