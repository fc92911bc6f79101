// JSON-RPC framing and the MCP tool dispatcher.
pub mod handler;
pub mod protocol;
