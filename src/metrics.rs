use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters describing summarization and QA activity.
#[derive(Default)]
pub struct DigestMetrics {
    documents_summarized: AtomicU64,
    chunks_summarized: AtomicU64,
    chunks_failed: AtomicU64,
    questions_answered: AtomicU64,
}

impl DigestMetrics {
    /// Create an empty metrics accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a summarized document along with its chunk and failure counts.
    pub fn record_document(&self, chunk_count: u64, failed_chunks: u64) {
        self.documents_summarized.fetch_add(1, Ordering::Relaxed);
        self.chunks_summarized
            .fetch_add(chunk_count, Ordering::Relaxed);
        self.chunks_failed
            .fetch_add(failed_chunks, Ordering::Relaxed);
    }

    /// Record a successfully answered question.
    pub fn record_answer(&self) {
        self.questions_answered.fetch_add(1, Ordering::Relaxed);
    }

    /// Return a snapshot of the current counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            documents_summarized: self.documents_summarized.load(Ordering::Relaxed),
            chunks_summarized: self.chunks_summarized.load(Ordering::Relaxed),
            chunks_failed: self.chunks_failed.load(Ordering::Relaxed),
            questions_answered: self.questions_answered.load(Ordering::Relaxed),
        }
    }
}

/// Immutable view of the counters used for reporting.
#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct MetricsSnapshot {
    /// Number of documents summarized since startup.
    pub documents_summarized: u64,
    /// Total chunk count processed across all summarized documents.
    pub chunks_summarized: u64,
    /// Chunks whose summarization failed and contributed empty text.
    pub chunks_failed: u64,
    /// Number of questions answered since startup.
    pub questions_answered: u64,
}
