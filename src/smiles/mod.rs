//! SMILES Viewer Domain Module
//!
//! This module contains the SMILES-specific pieces:
//! - Tool input/output models and validation
//! - Result formatting helpers
//! - Widget state loaded at startup
//! - The factory that wires a protocol server for each request

pub mod handlers;
pub mod helpers;
pub mod models;
pub mod state;

// Re-export commonly used types for convenience
pub use handlers::create_smiles_server;
pub use state::{AppState, SharedState};
