//! # MCP Handler Module
//!
//! Exposes every agent action as an MCP tool. `tools/list` is built from the
//! action metadata; `tools/call` runs the action's host entry point and turns
//! its callback into a JSON-RPC result (or an error carrying the structured
//! diagnostic content).
//!
//! Action names and similes are also accepted as direct method names, which
//! are rewritten into `tools/call` internally.

use crate::{
    actions::{find_action, missing_context, Action, ActionCallback},
    mcp::protocol::{error_codes, Request, Response},
    utils, AppState,
};
use serde_json::{json, Value};
use tracing::{info, warn};

pub use crate::mcp::protocol::error_codes::ACTION_FAILED;

// Helper: produce a result Value that always contains a text content array
// and preserves structured data for JSON-friendly clients.
pub fn make_texty_result(text: String, payload: Value) -> Value {
    let content = json!([{ "type": "text", "text": text }]);
    match payload {
        Value::Object(mut map) => {
            // Do not overwrite if caller already set content
            if !map.contains_key("content") {
                map.insert("content".into(), content);
            }
            Value::Object(map)
        }
        other => json!({
            "data": other,
            "content": content
        }),
    }
}

/// This is the main dispatcher for all incoming MCP requests.
pub async fn handle_mcp_request(req: Request, state: AppState) -> Option<Response> {
    info!("Handling MCP request for method: {}", req.method);

    if req.is_notification() {
        return None;
    }

    let response = match req.method.as_str() {
        "initialize" => handle_initialize(&req),
        "tools/list" => handle_tools_list(&req, &state),
        "tools/call" => handle_tool_call(req, state).await,
        method if find_action(&state.actions, method).is_some() => {
            handle_tool_call(req.into_tool_call(), state).await
        }
        _ => Response::error(
            req.id,
            error_codes::METHOD_NOT_FOUND,
            format!("Method not found: {}", req.method),
        ),
    };

    Some(response)
}

/// Describes one action as an MCP tool.
pub fn tool_definition(action: &dyn Action) -> Value {
    json!({
        "name": action.name(),
        "description": action.description(),
        "inputSchema": action.parameters(),
        "annotations": {
            "similes": action.similes(),
            "template": action.template(),
            "examples": action.examples(),
        }
    })
}

fn handle_tools_list(req: &Request, state: &AppState) -> Response {
    let tools: Vec<Value> = state
        .actions
        .iter()
        .map(|action| tool_definition(action.as_ref()))
        .collect();
    Response::success(req.id.clone(), json!({ "tools": tools }))
}

/// Handles a 'tools/call' request by dispatching it to the matching action.
async fn handle_tool_call(req: Request, state: AppState) -> Response {
    let params = match req.params.as_ref() {
        Some(p) => p,
        None => {
            return Response::error(
                req.id,
                error_codes::INVALID_PARAMS,
                "Missing 'params' object".into(),
            )
        }
    };

    let tool_name = match utils::get_required_arg::<String>(params, "name", &req.id) {
        Ok(name) => name,
        Err(resp) => return resp,
    };

    let action = match find_action(&state.actions, &tool_name) {
        Some(action) => action.clone(),
        None => {
            return Response::error(
                req.id,
                error_codes::METHOD_NOT_FOUND,
                format!("Unknown tool: {}", tool_name),
            )
        }
    };

    let empty_args = json!({});
    let args = params.get("arguments").unwrap_or(&empty_args);
    // Free text goes through the regex extractor; structured arguments fill the gaps.
    let message = ["text", "message", "prompt"]
        .iter()
        .find_map(|key| args.get(*key).and_then(Value::as_str))
        .unwrap_or_default()
        .to_string();

    if !action.validate(&state.config) {
        warn!("{} refused: signer key missing or malformed", action.name());
        let err = missing_context();
        return Response::error_with_data(
            req.id,
            error_codes::INVALID_PARAMS,
            format!("Error: {}", err.user_message()),
            err.to_content(json!({ "action": action.name() })),
        );
    }

    let ctx = match state.context.as_ref() {
        Some(ctx) => ctx.clone(),
        None => {
            let err = missing_context();
            return Response::error_with_data(
                req.id,
                error_codes::INVALID_PARAMS,
                format!("Error: {}", err.user_message()),
                err.to_content(json!({ "action": action.name() })),
            );
        }
    };

    let mut delivered: Option<ActionCallback> = None;
    let ok = action
        .handle(&ctx, &message, args, &mut |cb| delivered = Some(cb))
        .await;
    let callback = delivered.unwrap_or_else(|| ActionCallback {
        text: format!("{} produced no output", action.name()),
        content: Value::Null,
    });

    if ok {
        Response::success(req.id, make_texty_result(callback.text, callback.content))
    } else {
        Response::error_with_data(req.id, ACTION_FAILED, callback.text, callback.content)
    }
}

fn handle_initialize(req: &Request) -> Response {
    let server_info = json!({
        "name": "bnb_agent_actions",
        "version": env!("CARGO_PKG_VERSION")
    });
    let capabilities = json!({ "tools": { "listChanged": false } });
    let instructions =
        "BNB Chain agent actions: balances, transfers, swaps, bridging to opBNB, Lista staking, testnet faucet and token deployment.";

    Response::success(
        req.id.clone(),
        json!({
            "serverInfo": server_info,
            "protocolVersion": "2025-06-18",
            "capabilities": capabilities,
            "instructions": instructions
        }),
    )
}
