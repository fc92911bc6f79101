//! # API Module
//!
//! HTTP surface for hosts that do not speak MCP over stdio.
//!
//! ## Available Endpoints
//!
//! - `GET /health` - Liveness plus the configured signer address
//! - `GET /actions` - Action metadata (schema, similes, template, examples)
//! - `POST /actions/:name` - Run an action with `{ "text": ..., "params": {...} }`
//! - `POST /rpc` - JSON-RPC bridge to the MCP dispatcher

pub mod actions;
pub mod health;
pub mod rpc;
