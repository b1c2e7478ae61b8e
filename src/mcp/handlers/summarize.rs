//! MCP handler for the document summarization tool.

use std::sync::Arc;

use crate::mcp::format::SummarizeToolOutput;
use crate::pipeline::{DigestApi, DocumentSource, SummarizeOverrides};
use rmcp::{
    ErrorData as McpError,
    model::{CallToolResult, JsonObject},
};
use serde::Deserialize;

use super::{digest_error, parse_arguments, structured};

/// Request payload accepted by the `summarize` tool.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct SummarizeToolRequest {
    /// Inline document text.
    #[serde(default)]
    pub(crate) text: Option<String>,
    /// Web page to fetch; takes precedence over `text`.
    #[serde(default)]
    pub(crate) url: Option<String>,
    /// Optional chunk width override, in characters.
    #[serde(default)]
    pub(crate) chunk_size: Option<i64>,
    /// Optional per-chunk target summary length override.
    #[serde(default)]
    pub(crate) chunk_summary_size: Option<i64>,
}

impl SummarizeToolRequest {
    fn into_parts(self) -> Result<(DocumentSource, SummarizeOverrides), McpError> {
        let overrides = SummarizeOverrides {
            chunk_size: self.chunk_size,
            chunk_summary_size: self.chunk_summary_size,
        };
        let url = self.url.filter(|url| !url.is_empty());
        let text = self.text.filter(|text| !text.is_empty());
        let source = match (url, text) {
            (Some(url), _) => DocumentSource::Url(url),
            (None, Some(text)) => DocumentSource::Text(text),
            (None, None) => {
                return Err(McpError::invalid_params(
                    "Provide `text` or `url` to summarize",
                    None,
                ));
            }
        };
        Ok((source, overrides))
    }
}

/// Handle the `summarize` tool by running the chunked summarization pipeline.
pub(crate) async fn handle_summarize(
    digest: &Arc<dyn DigestApi>,
    arguments: Option<JsonObject>,
) -> Result<CallToolResult, McpError> {
    let args: SummarizeToolRequest = parse_arguments(arguments)?;
    let (source, overrides) = args.into_parts()?;

    let outcome = digest
        .summarize(source, overrides)
        .await
        .map_err(digest_error)?;

    structured(&SummarizeToolOutput {
        summary: outcome.summary,
        chunks: outcome.chunk_count,
        failed_chunks: outcome.failed_chunks,
        chunk_size: outcome.chunk_size,
    })
}
