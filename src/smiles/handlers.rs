//! Protocol server wiring for the SMILES viewer
//!
//! Builds the server every protocol request gets: one widget resource and the
//! `render_smiles` tool.

use super::helpers::render_result;
use super::models::{RenderSmilesInput, RenderSmilesOutput};
use super::state::AppState;
use crate::mcp::errors::McpError;
use crate::mcp::helpers::{output_template_meta, widget_csp_meta};
use crate::mcp::models::*;
use crate::mcp::{McpServer, ResourceMetadata, ToolConfig};
use tracing::debug;

/// Creates a fresh server with the widget resource and the tool registered.
pub fn create_smiles_server(state: &AppState) -> McpServer {
    let mut server = McpServer::new(SERVER_NAME, SERVER_VERSION);

    let html = state.widget_html.clone();
    server.register_resource(
        WIDGET_RESOURCE_NAME,
        WIDGET_TEMPLATE_URI,
        ResourceMetadata {
            description: Some("Render a SMILES string as a molecule diagram.".to_string()),
            mime_type: Some(WIDGET_MIME_TYPE.to_string()),
        },
        move |uri| {
            let html = html.clone();
            async move {
                Ok::<_, McpError>(ReadResourceResult {
                    contents: vec![ResourceContents {
                        uri,
                        mime_type: WIDGET_MIME_TYPE.to_string(),
                        text: html.to_string(),
                        meta: Some(widget_csp_meta()),
                    }],
                })
            }
        },
    );

    server.register_tool(
        TOOL_NAME,
        ToolConfig {
            title: Some(TOOL_NAME.to_string()),
            description: Some("Render a SMILES string as a 2D structure diagram.".to_string()),
            meta: Some(output_template_meta()),
        },
        handle_render_smiles,
    );

    server
}

/// Handles the render_smiles tool functionality
async fn handle_render_smiles(input: RenderSmilesInput) -> Result<CallToolResult, McpError> {
    debug!("Rendering SMILES: {}", input.smiles);
    render_result(RenderSmilesOutput::from(input)).map_err(|e| McpError::Internal {
        message: e.to_string(),
    })
}
