//! Hugging Face inference adapter.
//!
//! Speaks the task-specific payloads of the hosted inference API, which self-hosted inference
//! endpoints also accept: `POST {base}/models/{model}`.

use super::{Answer, LengthBounds, ModelError, QuestionAnsweringModel, SummarizationModel};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

/// Client for a single Hugging Face hosted model.
pub struct HuggingFaceClient {
    http: Client,
    base_url: String,
    model: String,
    api_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SummaryItem {
    summary_text: String,
}

#[derive(Debug, Deserialize)]
struct AnswerItem {
    answer: String,
    #[serde(default)]
    score: Option<f32>,
    #[serde(default)]
    start: Option<usize>,
    #[serde(default)]
    end: Option<usize>,
}

impl HuggingFaceClient {
    /// Create a client bound to `model` at `base_url`.
    pub fn new(http: Client, base_url: String, model: String, api_token: Option<String>) -> Self {
        Self {
            http,
            base_url,
            model,
            api_token,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }

    async fn infer<T: DeserializeOwned>(&self, payload: Value) -> Result<T, ModelError> {
        let mut request = self.http.post(self.endpoint()).json(&payload);
        if let Some(token) = self.api_token.as_deref() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|error| {
            ModelError::ProviderUnavailable(format!(
                "failed to reach Hugging Face at {}: {error}",
                self.base_url
            ))
        })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ModelError::ProviderUnavailable(format!(
                "Hugging Face endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::GenerationFailed(format!(
                "Hugging Face returned {status}: {body}"
            )));
        }

        response.json().await.map_err(|error| {
            ModelError::InvalidResponse(format!("failed to decode Hugging Face response: {error}"))
        })
    }
}

#[async_trait]
impl SummarizationModel for HuggingFaceClient {
    async fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<String, ModelError> {
        let payload = json!({
            "inputs": text,
            "parameters": {
                "min_length": bounds.min_length,
                "max_length": bounds.max_length,
            },
            "options": { "wait_for_model": true },
        });

        let items: Vec<SummaryItem> = self.infer(payload).await?;
        items
            .into_iter()
            .next()
            .map(|item| item.summary_text.trim().to_string())
            .ok_or_else(|| ModelError::InvalidResponse("summarization returned no items".into()))
    }
}

#[async_trait]
impl QuestionAnsweringModel for HuggingFaceClient {
    async fn answer(&self, context: &str, question: &str) -> Result<Answer, ModelError> {
        let payload = json!({
            "inputs": {
                "question": question,
                "context": context,
            },
            "options": { "wait_for_model": true },
        });

        let item: AnswerItem = self.infer(payload).await?;
        Ok(Answer {
            text: item.answer,
            score: item.score,
            start: item.start,
            end: item.end,
        })
    }
}
