//! Routing module for the SMILES viewer server

use crate::error::panic_response;
use crate::mcp::models::{MCP_PATH, SESSION_ID_HEADER};
use crate::smiles::state::SharedState;
use axum::{
    body::Body,
    extract::Request,
    http::{header, HeaderName, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Plain-text body of the health route
pub const HEALTH_TEXT: &str = "SMILES MCP server";

/// Creates and configures the application router with all routes and middleware
pub fn create_app_router(state: SharedState) -> Router {
    // Middleware: Log requests
    let log_layer = axum::middleware::from_fn(|req: Request<Body>, next: Next| async move {
        info!("REQ: {} {}", req.method(), req.uri());
        let res = next.run(req).await;
        if !res.status().is_success() {
            warn!("RES: {} (Error)", res.status());
        }
        res
    });

    // Routes
    Router::new()
        .route("/", get(health).fallback(not_found))
        .merge(crate::mcp::routes().layer(cors_layer()))
        .fallback(not_found)
        .layer(axum::middleware::from_fn(mcp_preflight))
        .layer(log_layer)
        .layer(CatchPanicLayer::custom(panic_response))
        .with_state(state)
}

/// Methods advertised to browsers on the protocol path
const CORS_ALLOW_METHODS: &str = "GET, POST, DELETE, OPTIONS";

/// Middleware: answers `OPTIONS` on any path under the protocol prefix,
/// whether or not a route exists for it.
async fn mcp_preflight(req: Request, next: Next) -> Response {
    if req.method() == Method::OPTIONS && req.uri().path().starts_with(MCP_PATH) {
        return preflight_response();
    }
    next.run(req).await
}

fn preflight_response() -> Response {
    let allow_headers = format!("{}, {}", header::CONTENT_TYPE, SESSION_ID_HEADER);

    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*".to_string()),
            (header::ACCESS_CONTROL_ALLOW_METHODS, CORS_ALLOW_METHODS.to_string()),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, allow_headers),
            (header::ACCESS_CONTROL_EXPOSE_HEADERS, SESSION_ID_HEADER.to_string()),
        ],
    )
        .into_response()
}

/// CORS headers on actual protocol responses: any origin, and the session
/// header exposed to scripts.
fn cors_layer() -> CorsLayer {
    let session_header = HeaderName::from_static(SESSION_ID_HEADER);

    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, session_header.clone()])
        .expose_headers([session_header])
}

/// Endpoint: GET /
async fn health() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "text/plain")], HEALTH_TEXT)
}

/// Fallback for every path and method not served above
pub async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}
