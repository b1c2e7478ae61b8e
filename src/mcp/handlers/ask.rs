//! MCP handler for the question answering tool.

use std::sync::Arc;

use crate::mcp::format::AskToolOutput;
use crate::pipeline::DigestApi;
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde::Deserialize;

use super::{digest_error, parse_arguments, structured};

/// Request payload accepted by the `ask` tool.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct AskToolRequest {
    /// Passage the answer must come from.
    #[serde(default)]
    pub(crate) context: String,
    /// Question to answer.
    #[serde(default)]
    pub(crate) question: String,
}

/// Handle the `ask` tool by extracting an answer span from the context.
pub(crate) async fn handle_ask(
    digest: &Arc<dyn DigestApi>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let AskToolRequest { context, question } = parse_arguments(arguments)?;

    let result = digest
        .answer(context, question)
        .await
        .map_err(digest_error)?;

    structured(&AskToolOutput {
        answer: result.answer,
        score: result.score,
        start: result.start,
        end: result.end,
    })
}
