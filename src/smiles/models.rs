//! SMILES Domain Models
//!
//! The only domain data is the string handed to `render_smiles`; it lives for
//! one request and is never stored.

use super::helpers::validate_smiles;
use crate::mcp::ToolInput;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Arguments of the `render_smiles` tool
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct RenderSmilesInput {
    /// SMILES notation of the molecule, e.g. `CCO`
    pub smiles: String,
}

impl ToolInput for RenderSmilesInput {
    fn input_schema() -> Value {
        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "type": "object",
            "properties": {
                "smiles": { "type": "string", "minLength": 1 }
            },
            "required": ["smiles"],
            "additionalProperties": false
        })
    }

    fn from_arguments(arguments: Value) -> Result<Self, String> {
        let input: Self = serde_json::from_value(arguments).map_err(|e| e.to_string())?;
        validate_smiles(&input.smiles)?;
        Ok(input)
    }
}

/// Structured output handed to the widget
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RenderSmilesOutput {
    pub smiles: String,
}

impl From<RenderSmilesInput> for RenderSmilesOutput {
    fn from(input: RenderSmilesInput) -> Self {
        Self {
            smiles: input.smiles,
        }
    }
}
