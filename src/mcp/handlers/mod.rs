//! Tool handlers for the MCP server.

use crate::extract::ExtractionError;
use crate::pipeline::DigestError;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

pub mod ask;
pub mod metrics;
pub mod summarize;

/// Parse structured arguments supplied to a tool invocation.
pub(crate) fn parse_arguments<T: DeserializeOwned>(
    arguments: Option<JsonObject>,
) -> Result<T, McpError> {
    let value = Value::Object(arguments.unwrap_or_default());
    serde_json::from_value(value)
        .map_err(|err| McpError::invalid_params(format!("Invalid arguments: {err}"), None))
}

/// Map a pipeline failure onto an MCP error: caller mistakes become `invalid_params`, upstream
/// failures become `internal_error`.
pub(crate) fn digest_error(error: DigestError) -> McpError {
    match error {
        DigestError::InvalidArgument(message) => McpError::invalid_params(message, None),
        DigestError::Extraction(error @ ExtractionError::Fetch { .. }) => {
            McpError::internal_error(error.to_string(), None)
        }
        DigestError::Extraction(error) => McpError::invalid_params(error.to_string(), None),
        DigestError::ModelInference(error) => McpError::internal_error(error.to_string(), None),
    }
}

/// Wrap a serializable tool output as structured content.
pub(crate) fn structured<T: Serialize>(output: &T) -> Result<CallToolResult, McpError> {
    serde_json::to_value(output)
        .map(CallToolResult::structured)
        .map_err(|err| McpError::internal_error(format!("Failed to encode result: {err}"), None))
}
