//! HTTP-level application errors
//!
//! Anything that escapes a route handler ends up here and is answered with a
//! plain 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::any::Any;
use thiserror::Error;
use tracing::error;

pub const INTERNAL_ERROR_BODY: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Failed to serialize response: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Failed to build response: {0}")]
    Http(#[from] axum::http::Error),

    #[error("Failed to read widget asset {path}: {source}")]
    WidgetAsset {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Error handling MCP request: {}", self);
        internal_error_response()
    }
}

/// Plain-text 500 response used for handler failures and panics.
pub fn internal_error_response() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_BODY).into_response()
}

/// Response factory for `CatchPanicLayer`.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    error!("Handler panicked: {}", detail);
    internal_error_response()
}
