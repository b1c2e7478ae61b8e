//! In-process model doubles shared by pipeline tests.

use crate::models::{Answer, LengthBounds, ModelError, QuestionAnsweringModel, SummarizationModel};
use async_trait::async_trait;
use std::sync::Mutex;

/// Summarizer that returns the leading `max_length` characters of its input and fails on any
/// input containing `FAIL`.
#[derive(Default)]
pub(crate) struct StubSummarizer {
    calls: Mutex<Vec<(String, LengthBounds)>>,
}

impl StubSummarizer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn recorded_bounds(&self) -> Vec<LengthBounds> {
        self.calls
            .lock()
            .expect("calls lock")
            .iter()
            .map(|(_, bounds)| *bounds)
            .collect()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().expect("calls lock").len()
    }
}

#[async_trait]
impl SummarizationModel for StubSummarizer {
    async fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<String, ModelError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push((text.to_string(), bounds));
        if text.contains("FAIL") {
            return Err(ModelError::GenerationFailed("stub failure".into()));
        }
        Ok(text.chars().take(bounds.max_length).collect())
    }
}

/// Answerer that returns the text after the last ` of ` in the context and fails on `FAIL`
/// contexts.
pub(crate) struct StubAnswerer;

#[async_trait]
impl QuestionAnsweringModel for StubAnswerer {
    async fn answer(&self, context: &str, _question: &str) -> Result<Answer, ModelError> {
        if context.contains("FAIL") {
            return Err(ModelError::GenerationFailed("stub failure".into()));
        }
        let span = context
            .trim_end_matches('.')
            .rsplit(" of ")
            .next()
            .unwrap_or(context);
        Ok(Answer::text_only(span))
    }
}
