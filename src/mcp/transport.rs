//! Streamable HTTP transport
//!
//! Stateless flavour of the MCP streamable HTTP transport: no session id is
//! issued and POSTed requests are answered with a plain JSON body. A transport
//! owns exactly one [`McpServer`] and handles exactly one HTTP request; dropping
//! the transport tears both down.

use super::errors::{McpError, TransportError};
use super::models::*;
use super::server::McpServer;
use crate::error::AppError;
use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, Method, Response, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use futures_util::stream::{self, Stream};
use serde_json::Value;
use std::convert::Infallible;
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::debug;

const JSON_CONTENT_TYPE: &str = "application/json";
const SSE_CONTENT_TYPE: &str = "text/event-stream";

/// HTTP methods the transport serves; everything else is not a protocol
/// request at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMethod {
    Post,
    Get,
    Delete,
}

impl TransportMethod {
    pub fn from_method(method: &Method) -> Option<Self> {
        match *method {
            Method::POST => Some(Self::Post),
            Method::GET => Some(Self::Get),
            Method::DELETE => Some(Self::Delete),
            _ => None,
        }
    }
}

pub struct StreamableHttpTransport {
    server: McpServer,
}

impl StreamableHttpTransport {
    /// Attaches a freshly built server to a new transport.
    pub fn new(server: McpServer) -> Self {
        debug!("MCP transport opened for {}", server.info().name);
        Self { server }
    }

    /// Pipes one HTTP request through the server and produces its response.
    ///
    /// Protocol-level rejections come back as `Ok` responses carrying a
    /// JSON-RPC error body; `Err` means the response itself could not be built.
    pub async fn handle_request(
        self,
        method: TransportMethod,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<Response<Body>, AppError> {
        match method {
            TransportMethod::Post => self.handle_post(headers, body).await,
            TransportMethod::Get => Ok(self.handle_get(headers)),
            TransportMethod::Delete => self.handle_delete(),
        }
    }

    async fn handle_post(&self, headers: &HeaderMap, body: Bytes) -> Result<Response<Body>, AppError> {
        let messages = match parse_post(headers, &body) {
            Ok(messages) => messages,
            Err(e) => return Ok(e.into_response()),
        };

        let has_requests = messages
            .iter()
            .any(|m| matches!(m, JsonRpcMessage::Request(_)));

        let mut responses = Vec::new();
        for message in messages {
            if let Some(response) = self.server.handle_message(message).await {
                responses.push(response);
            }
        }

        if !has_requests {
            return Ok(Response::builder()
                .status(StatusCode::ACCEPTED)
                .body(Body::empty())?);
        }

        let payload = if responses.len() == 1 {
            responses.remove(0)
        } else {
            Value::Array(responses)
        };

        Ok(Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, JSON_CONTENT_TYPE)
            .body(Body::from(serde_json::to_vec(&payload)?))?)
    }

    /// Opens the standalone event stream. Nothing is ever pushed on it in
    /// stateless mode; it only keeps the pair alive until the client leaves.
    fn handle_get(self, headers: &HeaderMap) -> Response<Body> {
        if !accepts(headers, SSE_CONTENT_TYPE) {
            return TransportError::NotAcceptable("Client must accept text/event-stream")
                .into_response();
        }

        let stream = TransportStream {
            inner: stream::pending::<Result<Event, Infallible>>(),
            _transport: self,
        };

        Sse::new(stream)
            .keep_alive(KeepAlive::default())
            .into_response()
    }

    /// Terminates the stateless session, which only means tearing down this
    /// pair.
    fn handle_delete(self) -> Result<Response<Body>, AppError> {
        drop(self);
        Ok(Response::builder()
            .status(StatusCode::OK)
            .body(Body::empty())?)
    }
}

impl Drop for StreamableHttpTransport {
    fn drop(&mut self) {
        self.server.close();
        debug!("MCP transport closed");
    }
}

/// Validates headers and body of a POST and splits it into messages.
fn parse_post(headers: &HeaderMap, body: &[u8]) -> Result<Vec<JsonRpcMessage>, TransportError> {
    if !accepts(headers, JSON_CONTENT_TYPE) || !accepts(headers, SSE_CONTENT_TYPE) {
        return Err(TransportError::NotAcceptable(
            "Client must accept both application/json and text/event-stream",
        ));
    }

    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.to_ascii_lowercase().contains(JSON_CONTENT_TYPE));
    if !is_json {
        return Err(TransportError::UnsupportedMediaType);
    }

    let raw: Value = serde_json::from_slice(body).map_err(|_| McpError::ParseError {
        message: "Parse error".to_string(),
    })?;

    let raw_messages = match raw {
        Value::Array(items) => {
            if items.is_empty() {
                return Err(McpError::InvalidRequest {
                    message: "Invalid Request: Empty batch".to_string(),
                }
                .into());
            }
            items
        }
        single => vec![single],
    };

    let messages = raw_messages
        .into_iter()
        .map(JsonRpcMessage::from_value)
        .collect::<Result<Vec<_>, _>>()?;

    if messages.iter().any(JsonRpcMessage::is_initialize_request) {
        if messages.len() > 1 {
            return Err(McpError::InvalidRequest {
                message: "Invalid Request: Only one initialization request is allowed".to_string(),
            }
            .into());
        }
    } else {
        check_protocol_version(headers)?;
    }

    Ok(messages)
}

fn check_protocol_version(headers: &HeaderMap) -> Result<(), TransportError> {
    let version = headers
        .get(PROTOCOL_VERSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(DEFAULT_NEGOTIATED_PROTOCOL_VERSION);

    if is_supported_protocol_version(version) {
        Ok(())
    } else {
        Err(TransportError::UnsupportedProtocolVersion {
            supported: SUPPORTED_PROTOCOL_VERSIONS.join(", "),
        })
    }
}

/// True when any `Accept` header lists `mime`.
fn accepts(headers: &HeaderMap, mime: &str) -> bool {
    headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .any(|v| v.to_ascii_lowercase().contains(mime))
}

/// Event stream that keeps its transport alive for as long as the client
/// holds the connection open.
struct TransportStream<S> {
    inner: S,
    _transport: StreamableHttpTransport,
}

impl<S> Stream for TransportStream<S>
where
    S: Stream + Unpin,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().inner).poll_next(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::ResourceMetadata;
    use axum::http::HeaderValue;
    use serde_json::json;
    use std::sync::Arc;

    fn post_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("application/json, text/event-stream"),
        );
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers
    }

    fn body(value: Value) -> Vec<u8> {
        serde_json::to_vec(&value).unwrap()
    }

    #[test]
    fn accept_header_must_list_both_types() {
        let mut headers = post_headers();
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let err = parse_post(&headers, &body(json!({}))).unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_ACCEPTABLE);
    }

    #[test]
    fn content_type_must_be_json() {
        let mut headers = post_headers();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain"));

        let err = parse_post(&headers, b"{}").unwrap_err();
        assert_eq!(err, TransportError::UnsupportedMediaType);
    }

    #[test]
    fn splits_batches() {
        let messages = parse_post(
            &post_headers(),
            &body(json!([
                { "jsonrpc": "2.0", "id": 1, "method": "ping" },
                { "jsonrpc": "2.0", "method": "notifications/initialized" }
            ])),
        )
        .unwrap();
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn rejects_empty_and_mixed_initialize_batches() {
        let err = parse_post(&post_headers(), &body(json!([]))).unwrap_err();
        assert_eq!(err.code(), -32600);

        let err = parse_post(
            &post_headers(),
            &body(json!([
                { "jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {} },
                { "jsonrpc": "2.0", "id": 2, "method": "ping" }
            ])),
        )
        .unwrap_err();
        assert_eq!(err.code(), -32600);
    }

    #[test]
    fn rejects_unknown_protocol_version_header() {
        let mut headers = post_headers();
        headers.insert(PROTOCOL_VERSION_HEADER, HeaderValue::from_static("1999-01-01"));

        let ping = body(json!({ "jsonrpc": "2.0", "id": 1, "method": "ping" }));
        let err = parse_post(&headers, &ping).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.code(), -32000);

        // initialize negotiates the version itself
        let init = body(json!({ "jsonrpc": "2.0", "id": 1, "method": "initialize" }));
        assert!(parse_post(&headers, &init).is_ok());
    }

    #[test]
    fn malformed_json_is_parse_error() {
        let err = parse_post(&post_headers(), b"{not json").unwrap_err();
        assert_eq!(err.code(), -32700);
        assert_eq!(err.to_string(), "Parse error");
    }

    /// Server whose only resource handler owns a clone of `held`; the clone
    /// is released once the server's registrations are cleared.
    fn holding_server(held: &Arc<()>) -> McpServer {
        let held = Arc::clone(held);
        let mut server = McpServer::new("test", "0.0.0");
        server.register_resource(
            "held",
            "ui://held",
            ResourceMetadata::default(),
            move |_uri: String| {
                let _held = &held;
                async { Ok::<_, McpError>(ReadResourceResult { contents: Vec::new() }) }
            },
        );
        server
    }

    #[test]
    fn maps_only_protocol_methods() {
        assert_eq!(TransportMethod::from_method(&Method::POST), Some(TransportMethod::Post));
        assert_eq!(TransportMethod::from_method(&Method::GET), Some(TransportMethod::Get));
        assert_eq!(TransportMethod::from_method(&Method::DELETE), Some(TransportMethod::Delete));
        assert_eq!(TransportMethod::from_method(&Method::PUT), None);
        assert_eq!(TransportMethod::from_method(&Method::OPTIONS), None);
    }

    #[test]
    fn dropping_transport_closes_server() {
        let held = Arc::new(());
        let transport = StreamableHttpTransport::new(holding_server(&held));
        assert_eq!(Arc::strong_count(&held), 2);

        drop(transport);
        assert_eq!(Arc::strong_count(&held), 1);
    }

    #[tokio::test]
    async fn event_stream_owns_transport_until_dropped() {
        let held = Arc::new(());
        let transport = StreamableHttpTransport::new(holding_server(&held));

        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static(SSE_CONTENT_TYPE));
        let response = transport.handle_get(&headers);
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(Arc::strong_count(&held), 2);

        drop(response);
        assert_eq!(Arc::strong_count(&held), 1);
    }

    #[test]
    fn rejected_event_stream_closes_server() {
        let held = Arc::new(());
        let transport = StreamableHttpTransport::new(holding_server(&held));

        let response = transport.handle_get(&HeaderMap::new());
        assert_eq!(response.status(), StatusCode::NOT_ACCEPTABLE);
        assert_eq!(Arc::strong_count(&held), 1);
    }

    #[tokio::test]
    async fn delete_closes_server() {
        let held = Arc::new(());
        let transport = StreamableHttpTransport::new(holding_server(&held));

        let response = transport
            .handle_request(TransportMethod::Delete, &HeaderMap::new(), Bytes::new())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(Arc::strong_count(&held), 1);
    }
}
