//! Digest service coordinating extraction, the summarization pipeline, and question answering.

use super::{
    answer_question, summarize_document,
    types::{
        DigestError, DocumentSource, QaResult, SummarizeOptions, SummarizeOverrides,
        SummaryOutcome,
    },
};
use crate::{
    config::{Config, get_config},
    extract::{PageFetcher, extract_file},
    metrics::{DigestMetrics, MetricsSnapshot},
    models::{QuestionAnsweringModel, SummarizationModel, build_qa_model, build_summarization_model},
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;
use uuid::Uuid;

/// Owns the model clients, page fetcher, and metrics shared by every request.
///
/// Both the HTTP surface and the MCP tools run on the same instance. Construct it once near
/// process start and share it through an `Arc`.
pub struct DigestService {
    summarizer: Box<dyn SummarizationModel>,
    answerer: Box<dyn QuestionAnsweringModel>,
    fetcher: PageFetcher,
    defaults: SummarizeOptions,
    metrics: Arc<DigestMetrics>,
}

/// Abstraction over the digest pipeline used by external surfaces (HTTP, MCP).
#[async_trait]
pub trait DigestApi: Send + Sync {
    /// Extract text from `source` and summarize it.
    async fn summarize(
        &self,
        source: DocumentSource,
        overrides: SummarizeOverrides,
    ) -> Result<SummaryOutcome, DigestError>;

    /// Answer `question` against `context`.
    async fn answer(&self, context: String, question: String) -> Result<QaResult, DigestError>;

    /// Retrieve the current metrics snapshot for diagnostics.
    fn metrics_snapshot(&self) -> MetricsSnapshot;

    /// Options applied when a request carries no overrides.
    fn defaults(&self) -> SummarizeOptions;
}

impl DigestService {
    /// Build the service from the global configuration.
    pub fn new() -> Result<Self, DigestError> {
        Self::from_config(get_config())
    }

    /// Build the service from an explicit configuration.
    pub fn from_config(config: &Config) -> Result<Self, DigestError> {
        tracing::info!("Initializing model clients");
        let summarizer = build_summarization_model(config)?;
        let answerer = build_qa_model(config)?;
        let fetcher = PageFetcher::new(Duration::from_secs(config.fetch_timeout_secs))?;
        tracing::info!(
            summarization_provider = config.summarization_provider.label(),
            qa_provider = config.qa_provider.label(),
            "Model clients initialized"
        );
        Ok(Self::with_components(
            summarizer,
            answerer,
            fetcher,
            SummarizeOptions::from_config(config),
        ))
    }

    /// Assemble a service from prebuilt components.
    pub fn with_components(
        summarizer: Box<dyn SummarizationModel>,
        answerer: Box<dyn QuestionAnsweringModel>,
        fetcher: PageFetcher,
        defaults: SummarizeOptions,
    ) -> Self {
        Self {
            summarizer,
            answerer,
            fetcher,
            defaults,
            metrics: Arc::new(DigestMetrics::new()),
        }
    }

    /// Options applied when a request carries no overrides.
    pub fn defaults(&self) -> SummarizeOptions {
        self.defaults
    }

    /// Extract text from `source` and summarize it.
    pub async fn summarize(
        &self,
        source: DocumentSource,
        overrides: SummarizeOverrides,
    ) -> Result<SummaryOutcome, DigestError> {
        let span = tracing::info_span!(
            "summarize",
            request_id = %Uuid::new_v4(),
            source = source.label()
        );

        async move {
            let options = self.defaults.with_overrides(overrides)?;
            let text = self.extract(source).await?;
            let summary = summarize_document(self.summarizer.as_ref(), &text, &options).await?;

            self.metrics
                .record_document(summary.chunk_count as u64, summary.failed_chunks as u64);
            tracing::info!(
                chars = text.chars().count(),
                chunks = summary.chunk_count,
                failed_chunks = summary.failed_chunks,
                chunk_size = options.chunk_size,
                "Document summarized"
            );

            Ok(SummaryOutcome {
                summary: summary.text,
                chunk_count: summary.chunk_count,
                failed_chunks: summary.failed_chunks,
                chunk_size: options.chunk_size,
            })
        }
        .instrument(span)
        .await
    }

    async fn extract(&self, source: DocumentSource) -> Result<String, DigestError> {
        let text = match source {
            DocumentSource::Text(text) => text,
            DocumentSource::Url(url) => self.fetcher.fetch_text(&url).await?,
            DocumentSource::File { filename, bytes } => extract_file(&filename, bytes)?,
        };
        Ok(text)
    }

    /// Answer `question` against `context` with the question answering model.
    pub async fn answer(&self, context: &str, question: &str) -> Result<QaResult, DigestError> {
        let span = tracing::info_span!("answer", request_id = %Uuid::new_v4());
        async move {
            let result = answer_question(self.answerer.as_ref(), context, question)
                .await
                .inspect_err(|error| {
                    if matches!(error, DigestError::ModelInference(_)) {
                        tracing::error!(error = %error, "Question answering failed");
                    }
                })?;
            self.metrics.record_answer();
            tracing::info!(score = ?result.score, "Question answered");
            Ok(result)
        }
        .instrument(span)
        .await
    }

    /// Return the current metrics snapshot.
    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

#[async_trait]
impl DigestApi for DigestService {
    async fn summarize(
        &self,
        source: DocumentSource,
        overrides: SummarizeOverrides,
    ) -> Result<SummaryOutcome, DigestError> {
        DigestService::summarize(self, source, overrides).await
    }

    async fn answer(&self, context: String, question: String) -> Result<QaResult, DigestError> {
        DigestService::answer(self, &context, &question).await
    }

    fn metrics_snapshot(&self) -> MetricsSnapshot {
        DigestService::metrics_snapshot(self)
    }

    fn defaults(&self) -> SummarizeOptions {
        DigestService::defaults(self)
    }
}
