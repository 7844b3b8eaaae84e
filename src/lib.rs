//! SMILES Viewer Library
//!
//! This library provides an MCP (Model Context Protocol) server that exposes a
//! single `render_smiles` tool and the HTML widget that draws the molecule on
//! the client side.

// Domain modules
pub mod mcp;
pub mod smiles;

// Infrastructure
pub mod config;
pub mod error;
pub mod router;
