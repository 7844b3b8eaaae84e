//! SMILES Tool Helpers
//!
//! Validation and result formatting for `render_smiles`. No chemistry happens
//! here; the widget does the drawing.

use super::models::RenderSmilesOutput;
use crate::mcp::models::{CallToolResult, TextContent};
use serde_json::Value;

/// Prefix of the human-readable line returned alongside the structured output
pub const ECHO_PREFIX: &str = "SMILESを描画します: ";

pub const EMPTY_SMILES_MESSAGE: &str = "SMILES must not be empty";

/// Rejects the empty string. Anything else is passed through untouched.
pub fn validate_smiles(smiles: &str) -> Result<(), String> {
    if smiles.is_empty() {
        return Err(EMPTY_SMILES_MESSAGE.to_string());
    }
    Ok(())
}

/// Produces the echo line, e.g. `"SMILESを描画します: CCO"`.
pub fn echo_line(smiles: &str) -> String {
    format!("{}{}", ECHO_PREFIX, smiles)
}

/// Wraps the output as a tool result: structured content for the widget plus
/// the echo line for the model.
pub fn render_result(output: RenderSmilesOutput) -> Result<CallToolResult, serde_json::Error> {
    let text = echo_line(&output.smiles);
    let structured: Value = serde_json::to_value(output)?;

    Ok(CallToolResult {
        content: vec![TextContent::new(text)],
        structured_content: Some(structured),
    })
}
