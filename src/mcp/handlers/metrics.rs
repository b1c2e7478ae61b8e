//! Handler for the metrics tool.

use std::sync::Arc;

use crate::mcp::format::MetricsToolOutput;
use crate::pipeline::DigestApi;
use rmcp::{ErrorData as McpError, model::CallToolResult};

use super::structured;

/// Handle the `metrics` tool, returning the current summarization and question counters.
pub(crate) async fn handle_metrics(
    digest: &Arc<dyn DigestApi>,
) -> Result<CallToolResult, McpError> {
    let snapshot = digest.metrics_snapshot();
    structured(&MetricsToolOutput {
        documents_summarized: snapshot.documents_summarized,
        chunks_summarized: snapshot.chunks_summarized,
        chunks_failed: snapshot.chunks_failed,
        questions_answered: snapshot.questions_answered,
    })
}
