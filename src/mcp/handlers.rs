//! MCP (Model Context Protocol) route handlers
//!
//! Every qualifying request gets its own protocol server and transport; the
//! pair lives for the duration of that request (or, for GET, of the event
//! stream) and is dropped afterwards.

use super::models::MCP_PATH;
use super::transport::{StreamableHttpTransport, TransportMethod};
use crate::error::AppError;
use crate::router::not_found;
use crate::smiles::{create_smiles_server, SharedState};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};

/// Creates routes for MCP-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route(MCP_PATH, any(handle_mcp))
}

/// Endpoint: GET/POST/DELETE /mcp
async fn handle_mcp(
    State(state): State<SharedState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let Some(method) = TransportMethod::from_method(&method) else {
        return Ok(not_found().await.into_response());
    };

    let server = create_smiles_server(&state);
    let transport = StreamableHttpTransport::new(server);

    transport.handle_request(method, &headers, body).await
}
