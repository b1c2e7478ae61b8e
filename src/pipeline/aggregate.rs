//! Reassembly of chunk summaries into a document summary.

use super::types::{ChunkSummary, Summary};

/// Join chunk summaries in position order with single spaces.
///
/// Failed chunks contribute empty text, which leaves a doubled space behind. An empty input
/// produces an empty summary.
pub fn aggregate(mut summaries: Vec<ChunkSummary>) -> Summary {
    summaries.sort_by_key(|summary| summary.position);

    let failed_chunks = summaries.iter().filter(|summary| summary.is_failed()).count();
    let text = summaries
        .iter()
        .map(ChunkSummary::text)
        .collect::<Vec<_>>()
        .join(" ");

    Summary {
        text,
        chunk_count: summaries.len(),
        failed_chunks,
    }
}
