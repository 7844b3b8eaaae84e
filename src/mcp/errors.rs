//! MCP Error Handling
//!
//! Protocol errors answered inside a JSON-RPC envelope, and transport errors
//! that reject the HTTP request before any message reaches the server.

use super::helpers::rpc_error;
use super::models::error_codes;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors raised while handling a single JSON-RPC request
#[derive(Error, Debug, Clone, PartialEq)]
pub enum McpError {
    #[error("{message}")]
    ParseError { message: String },

    #[error("{message}")]
    InvalidRequest { message: String },

    #[error("Method not found")]
    MethodNotFound { method: String },

    #[error("{message}")]
    InvalidParams { message: String },

    #[error("Tool {name} not found")]
    ToolNotFound { name: String },

    #[error("Resource {uri} not found")]
    ResourceNotFound { uri: String },

    #[error("Invalid arguments for tool {tool}: {message}")]
    InvalidToolArguments { tool: String, message: String },

    #[error("{message}")]
    Internal { message: String },
}

impl McpError {
    /// JSON-RPC error code for this error
    pub fn code(&self) -> i32 {
        match self {
            Self::ParseError { .. } => error_codes::PARSE_ERROR,
            Self::InvalidRequest { .. } => error_codes::INVALID_REQUEST,
            Self::MethodNotFound { .. } => error_codes::METHOD_NOT_FOUND,
            Self::InvalidParams { .. }
            | Self::ToolNotFound { .. }
            | Self::ResourceNotFound { .. }
            | Self::InvalidToolArguments { .. } => error_codes::INVALID_PARAMS,
            Self::Internal { .. } => error_codes::INTERNAL_ERROR,
        }
    }

    /// Builds the JSON-RPC error envelope answering request `id`.
    pub fn to_response(&self, id: Value) -> Value {
        self.log();
        rpc_error(id, self.code(), self.to_string())
    }

    fn log(&self) {
        match self {
            Self::Internal { .. } => warn!("MCP internal error: {}", self),
            Self::MethodNotFound { method } => debug!("Unknown method: {}", method),
            _ => debug!("MCP client error: {}", self),
        }
    }
}

impl From<serde_json::Error> for McpError {
    fn from(error: serde_json::Error) -> Self {
        Self::InvalidParams {
            message: error.to_string(),
        }
    }
}

/// Rejections produced by the HTTP transport itself
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("Not Acceptable: {0}")]
    NotAcceptable(&'static str),

    #[error("Unsupported Media Type: Content-Type must be application/json")]
    UnsupportedMediaType,

    #[error("Bad Request: Unsupported protocol version (supported versions: {supported})")]
    UnsupportedProtocolVersion { supported: String },

    #[error(transparent)]
    Message(#[from] McpError),
}

impl TransportError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotAcceptable(_) => StatusCode::NOT_ACCEPTABLE,
            Self::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::UnsupportedProtocolVersion { .. } | Self::Message(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn code(&self) -> i32 {
        match self {
            Self::Message(inner) => inner.code(),
            _ => error_codes::CONNECTION_REJECTED,
        }
    }
}

impl IntoResponse for TransportError {
    fn into_response(self) -> Response {
        warn!("Rejected MCP request: {}", self);
        (
            self.status(),
            Json(rpc_error(Value::Null, self.code(), self.to_string())),
        )
            .into_response()
    }
}
