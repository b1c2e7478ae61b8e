//! Ollama adapter issuing prompt-based requests to a local runtime.

use super::{Answer, LengthBounds, ModelError, QuestionAnsweringModel, SummarizationModel};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};

/// Client for a single model served by Ollama.
pub struct OllamaClient {
    http: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
    done: bool,
}

impl OllamaClient {
    /// Create a client bound to `model` at `base_url`.
    pub fn new(http: Client, base_url: String, model: String) -> Self {
        Self {
            http,
            base_url,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.base_url.trim_end_matches('/'))
    }

    async fn generate(&self, prompt: String, options: Value) -> Result<String, ModelError> {
        let payload = json!({
            "model": self.model,
            "prompt": prompt,
            "stream": false,
            "options": options,
        });

        let response = self
            .http
            .post(self.endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                ModelError::ProviderUnavailable(format!(
                    "failed to reach Ollama at {}: {error}",
                    self.base_url
                ))
            })?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ModelError::ProviderUnavailable(format!(
                "Ollama endpoint {} returned 404",
                self.endpoint()
            )));
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::GenerationFailed(format!(
                "Ollama returned {status}: {body}"
            )));
        }

        let body: OllamaResponse = response.json().await.map_err(|error| {
            ModelError::InvalidResponse(format!("failed to decode Ollama response: {error}"))
        })?;

        if !body.done {
            return Err(ModelError::InvalidResponse(
                "Ollama response incomplete (streaming not supported)".into(),
            ));
        }

        Ok(body.response.trim().to_string())
    }
}

fn summary_prompt(text: &str, bounds: LengthBounds) -> String {
    format!(
        "System: You write faithful abstractive summaries. Do not add facts that are not in the source. Return between {} and {} tokens as a single paragraph.\n\nSummarize the following text:\n{text}",
        bounds.min_length, bounds.max_length
    )
}

fn answer_prompt(context: &str, question: &str) -> String {
    format!(
        "System: Answer the question by copying the shortest exact span from the context that answers it. Return only the span.\n\nContext:\n{context}\n\nQuestion: {question}"
    )
}

#[async_trait]
impl SummarizationModel for OllamaClient {
    async fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<String, ModelError> {
        let options = json!({
            // Lower temperature for deterministic summaries.
            "temperature": 0.1,
            "num_predict": bounds.max_length,
        });
        self.generate(summary_prompt(text, bounds), options).await
    }
}

#[async_trait]
impl QuestionAnsweringModel for OllamaClient {
    async fn answer(&self, context: &str, question: &str) -> Result<Answer, ModelError> {
        let options = json!({ "temperature": 0.0 });
        let text = self.generate(answer_prompt(context, question), options).await?;
        if text.is_empty() {
            return Err(ModelError::InvalidResponse("Ollama returned an empty answer".into()));
        }

        let mut answer = Answer::text_only(text);
        if let Some(byte_start) = context.find(answer.text.as_str()) {
            let start = context[..byte_start].chars().count();
            answer.start = Some(start);
            answer.end = Some(start + answer.text.chars().count());
        }
        Ok(answer)
    }
}
