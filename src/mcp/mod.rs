//! Model Context Protocol (MCP) Module
//!
//! This module contains all MCP protocol implementation, including:
//! - Protocol models (JSON-RPC messages, descriptors, constants)
//! - RPC helpers (success/error envelopes, widget metadata)
//! - Protocol and transport errors
//! - The per-request protocol server and its streamable HTTP transport
//! - Axum handlers for the protocol path

pub mod errors;
pub mod handlers;
pub mod helpers;
pub mod models;
pub mod server;
pub mod transport;

// Re-export commonly used types and functions
pub use handlers::routes;
pub use server::{McpServer, ResourceMetadata, ToolConfig, ToolInput};
