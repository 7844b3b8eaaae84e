//! MCP Protocol Helpers
//!
//! This module contains helper functions for JSON-RPC communication
//! and OpenAI widget metadata construction.

use super::models::{WIDGET_RESOURCE_DOMAINS, WIDGET_TEMPLATE_URI};
use serde_json::{json, Value};

/// Tool metadata pointing the host at the widget that renders the output.
pub fn output_template_meta() -> Value {
    json!({
        "openai/outputTemplate": WIDGET_TEMPLATE_URI,
    })
}

/// Resource metadata declaring which origins the widget may load from.
pub fn widget_csp_meta() -> Value {
    json!({
        "openai/widgetCSP": {
            "resource_domains": WIDGET_RESOURCE_DOMAINS,
        }
    })
}

/// Builds a JSON-RPC 2.0 success response.
///
/// # Arguments
///
/// * `id` – The request identifier that must be echoed back.
/// * `result` – The payload representing the successful outcome.
///
/// # Returns
///
/// A `serde_json::Value` shaped as a JSON-RPC success envelope.
pub fn rpc_success(id: Value, result: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "result": result,
    })
}

/// Builds a JSON-RPC 2.0 error response.
///
/// # Arguments
///
/// * `id` – The request identifier (or `null` if unavailable).
/// * `code` – The JSON-RPC error code (e.g., -32601 for method not found).
/// * `message` – Human-readable description of the error.
///
/// # Returns
///
/// A `serde_json::Value` shaped as a JSON-RPC error envelope.
pub fn rpc_error(id: Value, code: i32, message: impl Into<String>) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": {
            "code": code,
            "message": message.into(),
        }
    })
}
