//! Per-chunk summarization with local failure isolation.

use super::types::{Chunk, ChunkFailure, ChunkSummary, SummarizeOptions};
use crate::models::{LengthBounds, SummarizationModel};
use futures_util::stream::{self, StreamExt};
use std::time::Duration;

/// Maximum summary length requested for a chunk of `chunk_chars` characters.
///
/// Chunks longer than the target get the target; anything else gets half its own length so the
/// model is never asked for a summary as long as its input. Lengths are measured in characters,
/// not model tokens.
pub fn effective_max_length(chunk_chars: usize, target_max_length: usize) -> usize {
    if chunk_chars > target_max_length {
        target_max_length
    } else {
        chunk_chars / 2
    }
}

/// Summarize a single chunk.
///
/// Never fails: a model error or an elapsed `timeout` is logged and recorded on the returned
/// [`ChunkSummary`], whose text is then empty.
pub async fn summarize_chunk(
    model: &dyn SummarizationModel,
    chunk: Chunk<'_>,
    target_max_length: usize,
    min_length: usize,
    timeout: Option<Duration>,
) -> ChunkSummary {
    let bounds = LengthBounds {
        min_length,
        max_length: effective_max_length(chunk.char_len(), target_max_length),
    };
    tracing::trace!(
        position = chunk.position,
        min_length = bounds.min_length,
        max_length = bounds.max_length,
        "Summarizing chunk"
    );

    let call = model.summarize(chunk.content, bounds);
    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(result) => result.map_err(ChunkFailure::from),
            Err(_) => Err(ChunkFailure::TimedOut(limit)),
        },
        None => call.await.map_err(ChunkFailure::from),
    };

    if let Err(failure) = &outcome {
        tracing::warn!(
            position = chunk.position,
            error = %failure,
            "Chunk summarization failed; continuing with empty text"
        );
    }

    ChunkSummary {
        position: chunk.position,
        outcome,
    }
}

/// Summarize every chunk, running up to `options.concurrency` model calls at once.
///
/// The returned summaries are in completion order; callers reorder by position.
pub async fn summarize_chunks(
    model: &dyn SummarizationModel,
    chunks: Vec<Chunk<'_>>,
    options: &SummarizeOptions,
) -> Vec<ChunkSummary> {
    let calls: Vec<_> = chunks
        .into_iter()
        .map(|chunk| {
            Box::pin(summarize_chunk(
                model,
                chunk,
                options.chunk_summary_size,
                options.min_length,
                options.chunk_timeout,
            ))
        })
        .collect();

    stream::iter(calls)
        .buffer_unordered(options.concurrency.max(1))
        .collect()
        .await
}
