//! MCP Protocol Models and Constants
//!
//! This module contains all data structures and constants related to the
//! Model Context Protocol (MCP) specification.

use super::errors::McpError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// =============================================================================
// MCP Constants
// =============================================================================

/// Name of the SMILES rendering tool
pub const TOOL_NAME: &str = "render_smiles";
/// Registration name of the widget resource
pub const WIDGET_RESOURCE_NAME: &str = "smiles_widget";
/// URI for the widget template
pub const WIDGET_TEMPLATE_URI: &str = "ui://widget/smiles-viewer.html";
/// MIME type for the widget
pub const WIDGET_MIME_TYPE: &str = "text/html+skybridge";
/// Origins the widget may load scripts from
pub const WIDGET_RESOURCE_DOMAINS: &[&str] = &["https://unpkg.com"];
/// Server identifier
pub const SERVER_NAME: &str = "smiles-viewer";
/// Server version reported during the handshake
pub const SERVER_VERSION: &str = "0.1.0";
/// HTTP path serving protocol traffic
pub const MCP_PATH: &str = "/mcp";
/// Header carrying the negotiated protocol version
pub const PROTOCOL_VERSION_HEADER: &str = "mcp-protocol-version";
/// Header carrying the session id (never issued in stateless mode)
pub const SESSION_ID_HEADER: &str = "mcp-session-id";
/// Newest protocol version this server speaks
pub const LATEST_PROTOCOL_VERSION: &str = "2025-06-18";
/// Version assumed when a client omits the version header
pub const DEFAULT_NEGOTIATED_PROTOCOL_VERSION: &str = "2025-03-26";
/// All protocol versions accepted during negotiation
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] =
    &["2025-06-18", "2025-03-26", "2024-11-05", "2024-10-07"];

/// JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    /// Transport-level rejection (bad headers, unsupported version)
    pub const CONNECTION_REJECTED: i32 = -32000;
}

pub fn is_supported_protocol_version(version: &str) -> bool {
    SUPPORTED_PROTOCOL_VERSIONS.contains(&version)
}

// =============================================================================
// JSON-RPC Messages
// =============================================================================

/// JSON-RPC 2.0 request: carries an id and expects a response
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcRequest {
    /// Request identifier (string or number)
    pub id: Value,

    /// Method name to invoke
    pub method: String,

    /// Parameters for the method
    pub params: Option<Value>,
}

/// JSON-RPC 2.0 notification: no id, never answered
#[derive(Debug, Clone, PartialEq)]
pub struct JsonRpcNotification {
    pub method: String,
    pub params: Option<Value>,
}

/// Any message a client may POST to the protocol endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum JsonRpcMessage {
    Request(JsonRpcRequest),
    Notification(JsonRpcNotification),
    /// Reply to a server-initiated request; accepted and ignored.
    Response(Value),
}

impl JsonRpcMessage {
    /// Classifies a raw JSON value as a JSON-RPC 2.0 message.
    pub fn from_value(value: Value) -> Result<Self, McpError> {
        let Value::Object(mut obj) = value else {
            return Err(invalid_message());
        };

        if obj.get("jsonrpc").and_then(Value::as_str) != Some("2.0") {
            return Err(invalid_message());
        }

        if let Some(method) = obj.remove("method") {
            let Value::String(method) = method else {
                return Err(invalid_message());
            };
            let params = obj.remove("params");

            return match obj.remove("id") {
                Some(id) if is_valid_id(&id) => {
                    Ok(Self::Request(JsonRpcRequest { id, method, params }))
                }
                Some(_) => Err(invalid_message()),
                None => Ok(Self::Notification(JsonRpcNotification { method, params })),
            };
        }

        if obj.contains_key("id") && (obj.contains_key("result") || obj.contains_key("error")) {
            return Ok(Self::Response(Value::Object(obj)));
        }

        Err(invalid_message())
    }

    pub fn is_initialize_request(&self) -> bool {
        matches!(self, Self::Request(req) if req.method == "initialize")
    }
}

fn is_valid_id(id: &Value) -> bool {
    id.is_string() || id.is_number()
}

fn invalid_message() -> McpError {
    McpError::ParseError {
        message: "Parse error: Invalid JSON-RPC message".to_string(),
    }
}

// =============================================================================
// MCP Descriptors and Results
// =============================================================================

/// Name/version pair exchanged during `initialize`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Implementation {
    pub name: String,
    pub version: String,
}

/// Entry returned by `tools/list`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub input_schema: Value,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

/// Entry returned by `resources/list`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceDescriptor {
    pub name: String,
    pub uri: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

/// One text body returned by `resources/read`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContents {
    pub uri: String,
    pub mime_type: String,
    pub text: String,
    #[serde(rename = "_meta", skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadResourceResult {
    pub contents: Vec<ResourceContents>,
}

/// Text block inside a tool result
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TextContent {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

impl TextContent {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            kind: "text".to_string(),
            text: text.into(),
        }
    }
}

/// Result of `tools/call`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallToolResult {
    pub content: Vec<TextContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
}

/// `tools/call` parameters
#[derive(Debug, Deserialize)]
pub struct CallToolParams {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Map<String, Value>>,
}

/// `resources/read` parameters
#[derive(Debug, Deserialize)]
pub struct ReadResourceParams {
    pub uri: String,
}

/// `initialize` parameters (only the fields the server looks at)
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeParams {
    pub protocol_version: Option<String>,
    pub client_info: Option<Implementation>,
}
