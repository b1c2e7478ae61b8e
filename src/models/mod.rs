//! Model provider abstractions for abstractive summarization and extractive question answering.
//!
//! Both models are black boxes reached over HTTP. The pipeline depends only on the two traits
//! defined here; the Hugging Face and Ollama adapters translate the calls into provider requests.

mod huggingface;
mod ollama;

pub use huggingface::HuggingFaceClient;
pub use ollama::OllamaClient;

use crate::config::{Config, ModelProvider};
use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

const DEFAULT_HUGGINGFACE_URL: &str = "https://api-inference.huggingface.co";
const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Errors surfaced by inference providers.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Provider was unreachable or could not be configured.
    #[error("Model provider unavailable: {0}")]
    ProviderUnavailable(String),
    /// Provider returned an error response.
    #[error("Model inference failed: {0}")]
    GenerationFailed(String),
    /// Provider response could not be parsed.
    #[error("Malformed provider response: {0}")]
    InvalidResponse(String),
}

/// Generation bounds handed to the summarization model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthBounds {
    /// Minimum generated length.
    pub min_length: usize,
    /// Maximum generated length.
    pub max_length: usize,
}

/// Answer span produced by the question answering model.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// Answer text, normally a span of the context.
    pub text: String,
    /// Provider confidence, when reported.
    pub score: Option<f32>,
    /// Character offset where the span starts within the context.
    pub start: Option<usize>,
    /// Character offset where the span ends within the context.
    pub end: Option<usize>,
}

impl Answer {
    /// Answer without span metadata.
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            score: None,
            start: None,
            end: None,
        }
    }
}

/// Interface implemented by abstractive summarization providers.
#[async_trait]
pub trait SummarizationModel: Send + Sync {
    /// Summarize `text` within the supplied generation bounds.
    async fn summarize(&self, text: &str, bounds: LengthBounds) -> Result<String, ModelError>;
}

/// Interface implemented by extractive question answering providers.
#[async_trait]
pub trait QuestionAnsweringModel: Send + Sync {
    /// Answer `question` using only `context`.
    async fn answer(&self, context: &str, question: &str) -> Result<Answer, ModelError>;
}

/// Build the summarization model selected by configuration.
pub fn build_summarization_model(
    config: &Config,
) -> Result<Box<dyn SummarizationModel>, ModelError> {
    let model = config.summarization_model.clone();
    tracing::debug!(
        provider = config.summarization_provider.label(),
        model = %model,
        "Building summarization model"
    );
    Ok(match config.summarization_provider {
        ModelProvider::HuggingFace => Box::new(huggingface_client(config, model)?),
        ModelProvider::Ollama => Box::new(ollama_client(config, model)?),
    })
}

/// Build the question answering model selected by configuration.
pub fn build_qa_model(config: &Config) -> Result<Box<dyn QuestionAnsweringModel>, ModelError> {
    let model = config.qa_model.clone();
    tracing::debug!(
        provider = config.qa_provider.label(),
        model = %model,
        "Building question answering model"
    );
    Ok(match config.qa_provider {
        ModelProvider::HuggingFace => Box::new(huggingface_client(config, model)?),
        ModelProvider::Ollama => Box::new(ollama_client(config, model)?),
    })
}

fn huggingface_client(config: &Config, model: String) -> Result<HuggingFaceClient, ModelError> {
    let base_url = config
        .huggingface_url
        .clone()
        .unwrap_or_else(|| DEFAULT_HUGGINGFACE_URL.to_string());
    Ok(HuggingFaceClient::new(
        http_client("rusty-digest/huggingface")?,
        base_url,
        model,
        config.huggingface_api_token.clone(),
    ))
}

fn ollama_client(config: &Config, model: String) -> Result<OllamaClient, ModelError> {
    let base_url = config
        .ollama_url
        .clone()
        .unwrap_or_else(|| DEFAULT_OLLAMA_URL.to_string());
    Ok(OllamaClient::new(
        http_client("rusty-digest/ollama")?,
        base_url,
        model,
    ))
}

fn http_client(user_agent: &str) -> Result<Client, ModelError> {
    Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(|error| {
            ModelError::ProviderUnavailable(format!("failed to construct HTTP client: {error}"))
        })
}
