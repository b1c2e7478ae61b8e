//! Core data types and error definitions for the summarization pipeline.

use crate::{config::Config, extract::ExtractionError, models::ModelError};
use std::time::Duration;
use thiserror::Error;

/// Message returned when a summarization request carries no usable text.
pub const NO_INPUT_MESSAGE: &str = "No input provided.";
/// Message returned when a question request lacks its context or question.
pub const QA_INPUT_MESSAGE: &str = "Context and question required.";

/// Errors surfaced to callers of the pipeline.
#[derive(Debug, Error)]
pub enum DigestError {
    /// Caller supplied no usable input or an impossible size.
    #[error("{0}")]
    InvalidArgument(String),
    /// The source could not be reduced to text.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    /// The question answering model failed.
    #[error(transparent)]
    ModelInference(#[from] ModelError),
}

/// Why a single chunk produced no summary.
#[derive(Debug, Error)]
pub enum ChunkFailure {
    /// The summarization model rejected or failed the request.
    #[error(transparent)]
    Model(#[from] ModelError),
    /// The model did not answer within the per-chunk deadline.
    #[error("summarization timed out after {0:?}")]
    TimedOut(Duration),
}

/// Contiguous slice of the source text tagged with its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Zero-based index within the chunk sequence.
    pub position: usize,
    /// Chunk contents.
    pub content: &'a str,
}

impl Chunk<'_> {
    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Result of summarizing one chunk.
#[derive(Debug)]
pub struct ChunkSummary {
    /// Position of the chunk this summary belongs to.
    pub position: usize,
    /// Summary text, or the failure that replaced it.
    pub outcome: Result<String, ChunkFailure>,
}

impl ChunkSummary {
    /// Summary text; empty when the chunk failed.
    pub fn text(&self) -> &str {
        self.outcome.as_deref().unwrap_or("")
    }

    /// Whether summarization failed for this chunk.
    pub fn is_failed(&self) -> bool {
        self.outcome.is_err()
    }
}

/// Joined summary of a whole document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    /// Final summary text.
    pub text: String,
    /// Number of chunks the document was split into.
    pub chunk_count: usize,
    /// Chunks that contributed empty text because summarization failed.
    pub failed_chunks: usize,
}

/// Answer to a question against a context passage.
#[derive(Debug, Clone, PartialEq)]
pub struct QaResult {
    /// Answer text.
    pub answer: String,
    /// Provider confidence, when reported.
    pub score: Option<f32>,
    /// Character offset of the answer span start within the context.
    pub start: Option<usize>,
    /// Character offset of the answer span end within the context.
    pub end: Option<usize>,
}

/// Tunables applied to one summarization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummarizeOptions {
    /// Chunk width in characters.
    pub chunk_size: usize,
    /// Target maximum summary length per chunk.
    pub chunk_summary_size: usize,
    /// Minimum summary length per chunk.
    pub min_length: usize,
    /// Chunks summarized concurrently.
    pub concurrency: usize,
    /// Deadline for each chunk invocation.
    pub chunk_timeout: Option<Duration>,
}

impl Default for SummarizeOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl SummarizeOptions {
    /// Derive options from the loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            chunk_size: config.chunk_size,
            chunk_summary_size: config.chunk_summary_size,
            min_length: config.summary_min_length,
            concurrency: config.chunk_concurrency.max(1),
            chunk_timeout: config.chunk_timeout_secs.map(Duration::from_secs),
        }
    }

    /// Apply per-request size overrides, rejecting non-positive values.
    pub fn with_overrides(mut self, overrides: SummarizeOverrides) -> Result<Self, DigestError> {
        if let Some(size) = overrides.chunk_size {
            self.chunk_size = positive(size, "chunk_size")?;
        }
        if let Some(size) = overrides.chunk_summary_size {
            self.chunk_summary_size = positive(size, "chunk_summary_size")?;
        }
        Ok(self)
    }
}

fn positive(value: i64, field: &str) -> Result<usize, DigestError> {
    usize::try_from(value)
        .ok()
        .filter(|size| *size > 0)
        .ok_or_else(|| DigestError::InvalidArgument(format!("{field} must be greater than zero")))
}

/// Optional per-request overrides of the configured sizes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummarizeOverrides {
    /// Chunk width override.
    pub chunk_size: Option<i64>,
    /// Per-chunk target summary length override.
    pub chunk_summary_size: Option<i64>,
}

/// Where the text to summarize comes from.
#[derive(Debug, Clone)]
pub enum DocumentSource {
    /// Inline text supplied by the caller.
    Text(String),
    /// Web page to fetch and scrape.
    Url(String),
    /// Uploaded file contents.
    File {
        /// Client-supplied filename, used to pick the format.
        filename: String,
        /// Raw file bytes.
        bytes: Vec<u8>,
    },
}

impl DocumentSource {
    /// Short label used in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Url(_) => "url",
            Self::File { .. } => "file",
        }
    }
}

/// Summary returned to API consumers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOutcome {
    /// Final summary text.
    pub summary: String,
    /// Number of chunks processed.
    pub chunk_count: usize,
    /// Chunks that failed and contributed empty text.
    pub failed_chunks: usize,
    /// Chunk width used for this request.
    pub chunk_size: usize,
}
