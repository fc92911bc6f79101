// src/mcp/protocol.rs

//! JSON-RPC 2.0 framing shared by the stdio loop and the `/api/rpc` route.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

pub const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Value,
    pub method: String,
    #[serde(default)]
    pub params: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorObject>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

fn default_jsonrpc() -> String {
    JSONRPC_VERSION.to_string()
}

impl Request {
    pub fn new(id: Value, method: impl Into<String>, params: Option<Value>) -> Self {
        Self {
            jsonrpc: default_jsonrpc(),
            id,
            method: method.into(),
            params,
        }
    }

    /// Requests without an id expect no reply.
    pub fn is_notification(&self) -> bool {
        self.id.is_null()
    }

    /// Rewrites a direct action invocation (`"method": "TRANSFER"`) into the
    /// equivalent `tools/call`, keeping the id and using the params as arguments.
    pub fn into_tool_call(self) -> Self {
        let arguments = self.params.unwrap_or_else(|| json!({}));
        Self {
            jsonrpc: self.jsonrpc,
            id: self.id,
            params: Some(json!({ "name": self.method, "arguments": arguments })),
            method: "tools/call".to_string(),
        }
    }
}

impl Response {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: default_jsonrpc(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, code: i32, message: String) -> Self {
        Self::failure(id, ErrorObject { code, message, data: None })
    }

    pub fn error_with_data(id: Value, code: i32, message: String, data: Value) -> Self {
        Self::failure(
            id,
            ErrorObject {
                code,
                message,
                data: Some(data),
            },
        )
    }

    fn failure(id: Value, error: ErrorObject) -> Self {
        Self {
            jsonrpc: default_jsonrpc(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    /// An action ran and reported failure; `data` carries its diagnostic content.
    pub const ACTION_FAILED: i32 = -32000;
}
