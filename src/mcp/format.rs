//! Formatting helpers shared across MCP handlers and resources.

use crate::{config::Config, pipeline::SummarizeOptions};
use rmcp::model::ResourceContents;
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Value, json};

pub(crate) const APPLICATION_JSON: &str = "application/json";

/// Structured result of the `summarize` tool.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SummarizeToolOutput {
    /// Joined per-chunk summaries in document order.
    pub(crate) summary: String,
    /// Number of chunks the document was split into.
    pub(crate) chunks: usize,
    /// Chunks whose summarization failed and contributed empty text.
    pub(crate) failed_chunks: usize,
    /// Chunk width used for this request.
    pub(crate) chunk_size: usize,
}

/// Structured result of the `ask` tool.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AskToolOutput {
    /// Answer span extracted from the context.
    pub(crate) answer: String,
    /// Provider confidence, when reported.
    pub(crate) score: Option<f32>,
    /// Character offset where the answer starts within the context.
    pub(crate) start: Option<usize>,
    /// Character offset where the answer ends within the context.
    pub(crate) end: Option<usize>,
}

/// Structured result of the `metrics` tool.
#[derive(Debug, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MetricsToolOutput {
    /// Documents summarized since startup.
    pub(crate) documents_summarized: u64,
    /// Chunks processed across all documents.
    pub(crate) chunks_summarized: u64,
    /// Chunks that failed and contributed empty text.
    pub(crate) chunks_failed: u64,
    /// Questions answered since startup.
    pub(crate) questions_answered: u64,
}

/// Top-level settings snapshot describing providers and summarization defaults.
#[derive(Debug, Serialize, JsonSchema)]
pub(crate) struct SettingsSnapshot {
    /// Summarization model in use.
    pub(crate) summarization: ModelSettingsSnapshot,
    /// Question answering model in use.
    pub(crate) question_answering: ModelSettingsSnapshot,
    /// Chunking defaults applied when callers omit overrides.
    pub(crate) chunking: ChunkingSettingsSnapshot,
}

/// Provider and model identifier pair.
#[derive(Debug, Serialize, JsonSchema)]
pub(crate) struct ModelSettingsSnapshot {
    /// Provider label (`huggingface` or `ollama`).
    pub(crate) provider: String,
    /// Model identifier passed to the provider.
    pub(crate) model: String,
}

/// Chunking defaults for clients.
#[derive(Debug, Serialize, JsonSchema)]
pub(crate) struct ChunkingSettingsSnapshot {
    /// Chunk width in characters.
    pub(crate) chunk_size: usize,
    /// Target maximum summary length per chunk.
    pub(crate) chunk_summary_size: usize,
    /// Minimum summary length per chunk.
    pub(crate) min_length: usize,
    /// Chunks summarized concurrently.
    pub(crate) concurrency: usize,
    /// Per-chunk deadline in seconds, if any.
    pub(crate) chunk_timeout_secs: Option<u64>,
}

/// Build the settings snapshot from the loaded configuration and effective defaults.
pub(crate) fn settings_snapshot(config: &Config, defaults: SummarizeOptions) -> SettingsSnapshot {
    SettingsSnapshot {
        summarization: ModelSettingsSnapshot {
            provider: config.summarization_provider.label().into(),
            model: config.summarization_model.clone(),
        },
        question_answering: ModelSettingsSnapshot {
            provider: config.qa_provider.label().into(),
            model: config.qa_model.clone(),
        },
        chunking: ChunkingSettingsSnapshot {
            chunk_size: defaults.chunk_size,
            chunk_summary_size: defaults.chunk_summary_size,
            min_length: defaults.min_length,
            concurrency: defaults.concurrency,
            chunk_timeout_secs: defaults.chunk_timeout.map(|limit| limit.as_secs()),
        },
    }
}

/// Usage guidance returned by the `usage` resource.
pub(crate) fn usage_payload() -> Value {
    json!({
        "title": "Rusty Digest MCP Usage",
        "policy": [
            "Pass long documents to `summarize` instead of pasting them into prompts.",
            "Give `summarize` either `text` or `url`; `url` wins when both are present.",
            "Lower `chunk_size` for denser summaries; raise `chunk_summary_size` for longer ones.",
            "Use `ask` with a focused context passage; answers are spans copied from the context.",
            "A non-zero `failedChunks` means parts of the document are missing from the summary.",
        ],
        "flows": [
            {
                "name": "Digest a page",
                "steps": [
                    "summarize({ url })",
                    "ask({ context: summary, question })"
                ]
            },
            {
                "name": "Digest a long text",
                "steps": [
                    "summarize({ text, chunk_size?, chunk_summary_size? })",
                    "metrics() to check failed chunk counts"
                ]
            }
        ]
    })
}

/// Serialize a value to JSON, falling back to compact formatting on error.
pub(crate) fn serialize_json<T: Serialize>(value: &T, context_uri: &str) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|error| {
        tracing::warn!(uri = context_uri, %error, "Failed to serialize JSON prettily");
        serde_json::to_string(value).unwrap_or_else(|_| "{}".into())
    })
}

/// Build JSON resource contents for MCP resource responses.
pub(crate) fn json_resource_contents(uri: &str, text: String) -> ResourceContents {
    ResourceContents::TextResourceContents {
        uri: uri.to_string(),
        mime_type: Some(APPLICATION_JSON.into()),
        text,
        meta: None,
    }
}
