//! Chunked summarization pipeline and question answering adapter.
//!
//! `split_text` → `summarize_chunks` → `aggregate`, executed once per request by
//! [`summarize_document`]. A failing chunk degrades to empty text; only a request without any
//! usable text fails outright.

pub mod aggregate;
pub mod chunking;
pub mod qa;
mod service;
pub mod summarize;
pub mod types;

#[cfg(test)]
pub(crate) mod test_support;

pub use aggregate::aggregate;
pub use chunking::split_text;
pub use qa::answer_question;
pub use service::{DigestApi, DigestService};
pub use summarize::{effective_max_length, summarize_chunk, summarize_chunks};
pub use types::{
    Chunk, ChunkFailure, ChunkSummary, DigestError, DocumentSource, NO_INPUT_MESSAGE,
    QA_INPUT_MESSAGE, QaResult, SummarizeOptions, SummarizeOverrides, Summary, SummaryOutcome,
};

use crate::models::SummarizationModel;

/// Summarize a whole document.
///
/// Fails with [`DigestError::InvalidArgument`] when `text` is empty or the options carry a zero
/// chunk size. Whitespace-only text is still summarized. Chunk failures never escape.
pub async fn summarize_document(
    model: &dyn SummarizationModel,
    text: &str,
    options: &SummarizeOptions,
) -> Result<Summary, DigestError> {
    if text.is_empty() {
        return Err(DigestError::InvalidArgument(NO_INPUT_MESSAGE.into()));
    }

    let chunks = split_text(text, options.chunk_size)?;
    tracing::debug!(
        chunks = chunks.len(),
        chunk_size = options.chunk_size,
        chunk_summary_size = options.chunk_summary_size,
        concurrency = options.concurrency,
        "Split document"
    );

    let summaries = summarize_chunks(model, chunks, options).await;
    Ok(aggregate(summaries))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LengthBounds, ModelError};
    use crate::pipeline::test_support::StubSummarizer;
    use async_trait::async_trait;
    use std::time::Duration;

    #[tokio::test]
    async fn short_document_produces_single_shorter_summary() {
        let model = StubSummarizer::new();
        let text = "Acme Corp announced record profits. The CEO said growth would continue. Analysts were skeptical of the forecast.";

        let summary = summarize_document(&model, text, &SummarizeOptions::default())
            .await
            .expect("summary");

        assert_eq!(summary.chunk_count, 1);
        assert_eq!(model.call_count(), 1);
        assert!(!summary.text.is_empty());
        assert!(summary.text.chars().count() < text.chars().count());
    }

    #[tokio::test]
    async fn empty_document_is_rejected() {
        let model = StubSummarizer::new();
        let error = summarize_document(&model, "", &SummarizeOptions::default())
            .await
            .expect_err("empty input");

        assert!(matches!(
            error,
            DigestError::InvalidArgument(ref message) if message == NO_INPUT_MESSAGE
        ));
        assert_eq!(model.call_count(), 0);
    }

    #[tokio::test]
    async fn whitespace_document_reaches_the_model() {
        let model = StubSummarizer::new();

        let summary = summarize_document(&model, "   ", &SummarizeOptions::default())
            .await
            .expect("whitespace is still input");

        assert_eq!(summary.chunk_count, 1);
        assert_eq!(summary.failed_chunks, 0);
        assert_eq!(model.call_count(), 1);
    }

    #[tokio::test]
    async fn zero_chunk_size_is_rejected() {
        let options = SummarizeOptions {
            chunk_size: 0,
            ..SummarizeOptions::default()
        };
        let error = summarize_document(&StubSummarizer::new(), "text", &options)
            .await
            .expect_err("zero chunk size");
        assert!(matches!(error, DigestError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn failing_chunk_does_not_abort_document() {
        let model = StubSummarizer::new();
        let text = format!("{}{}{}", "a".repeat(10), "FAIL".repeat(5), "c".repeat(10));
        let options = SummarizeOptions {
            chunk_size: 10,
            chunk_summary_size: 4,
            ..SummarizeOptions::default()
        };

        let summary = summarize_document(&model, &text, &options)
            .await
            .expect("summary despite failures");

        assert_eq!(summary.chunk_count, 4);
        assert_eq!(summary.failed_chunks, 2);
        assert_eq!(summary.text, "aaaa   cccc");
    }

    /// Finishes chunks in reverse position order.
    struct ReverseOrderSummarizer;

    #[async_trait]
    impl SummarizationModel for ReverseOrderSummarizer {
        async fn summarize(&self, text: &str, _bounds: LengthBounds) -> Result<String, ModelError> {
            let position: u64 = text.trim().parse().expect("numeric chunk");
            tokio::time::sleep(Duration::from_millis(10 * (5 - position))).await;
            Ok(format!("s{position}"))
        }
    }

    #[tokio::test]
    async fn concurrent_chunks_are_reassembled_by_position() {
        let options = SummarizeOptions {
            chunk_size: 2,
            concurrency: 5,
            ..SummarizeOptions::default()
        };

        let summary = summarize_document(&ReverseOrderSummarizer, "0 1 2 3 4 ", &options)
            .await
            .expect("summary");

        assert_eq!(summary.text, "s0 s1 s2 s3 s4");
        assert_eq!(summary.failed_chunks, 0);
    }

    /// Never answers for chunks containing `SLOW`; echoes everything else.
    struct StallingSummarizer;

    #[async_trait]
    impl SummarizationModel for StallingSummarizer {
        async fn summarize(&self, text: &str, _bounds: LengthBounds) -> Result<String, ModelError> {
            if text.contains("SLOW") {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            Ok(text.to_lowercase())
        }
    }

    #[tokio::test]
    async fn timed_out_chunk_counts_as_failed_while_others_aggregate() {
        let options = SummarizeOptions {
            chunk_size: 4,
            concurrency: 3,
            chunk_timeout: Some(Duration::from_millis(50)),
            ..SummarizeOptions::default()
        };

        let summary = summarize_document(&StallingSummarizer, "AAAASLOWCCCCDDDD", &options)
            .await
            .expect("summary despite timeout");

        assert_eq!(summary.chunk_count, 4);
        assert_eq!(summary.failed_chunks, 1);
        assert_eq!(summary.text, "aaaa  cccc dddd");
    }
}
