use std::env;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

/// Default chunk width, in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;
/// Default per-chunk target summary length.
pub const DEFAULT_CHUNK_SUMMARY_SIZE: usize = 128;
/// Default lower bound handed to the summarization model.
pub const DEFAULT_SUMMARY_MIN_LENGTH: usize = 1;

const DEFAULT_SUMMARIZATION_MODEL: &str = "sshleifer/distilbart-cnn-12-6";
const DEFAULT_QA_MODEL: &str = "distilbert-base-cased-distilled-squad";
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
/// Default multipart body limit.
pub const DEFAULT_UPLOAD_MAX_BYTES: usize = 16 * 1024 * 1024;

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable was not provided.
    #[error("Missing environment variable: {0}")]
    MissingVariable(String),
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the Rusty Digest server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend serving the abstractive summarization model.
    pub summarization_provider: ModelProvider,
    /// Summarization model identifier passed to the provider.
    pub summarization_model: String,
    /// Backend serving the extractive question answering model.
    pub qa_provider: ModelProvider,
    /// Question answering model identifier passed to the provider.
    pub qa_model: String,
    /// Optional override for the Hugging Face inference base URL.
    pub huggingface_url: Option<String>,
    /// Optional bearer token for the Hugging Face inference API.
    pub huggingface_api_token: Option<String>,
    /// Optional override for the Ollama base URL.
    pub ollama_url: Option<String>,
    /// Width of each chunk, in characters.
    pub chunk_size: usize,
    /// Target maximum summary length requested per chunk.
    pub chunk_summary_size: usize,
    /// Minimum summary length requested per chunk.
    pub summary_min_length: usize,
    /// Number of chunks summarized concurrently within one request.
    pub chunk_concurrency: usize,
    /// Optional deadline applied to each individual chunk invocation.
    pub chunk_timeout_secs: Option<u64>,
    /// Deadline applied to web page fetches.
    pub fetch_timeout_secs: u64,
    /// Maximum accepted request body size for uploads.
    pub upload_max_bytes: usize,
    /// Optional override for the HTTP server port.
    pub server_port: Option<u16>,
}

/// Supported inference backends for both models.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModelProvider {
    /// Hugging Face inference API (or a compatible self-hosted endpoint).
    HuggingFace,
    /// Local Ollama runtime.
    Ollama,
}

impl ModelProvider {
    /// Lowercase label used in logs and diagnostics.
    pub fn label(self) -> &'static str {
        match self {
            Self::HuggingFace => "huggingface",
            Self::Ollama => "ollama",
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            summarization_provider: ModelProvider::HuggingFace,
            summarization_model: DEFAULT_SUMMARIZATION_MODEL.to_string(),
            qa_provider: ModelProvider::HuggingFace,
            qa_model: DEFAULT_QA_MODEL.to_string(),
            huggingface_url: None,
            huggingface_api_token: None,
            ollama_url: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_summary_size: DEFAULT_CHUNK_SUMMARY_SIZE,
            summary_min_length: DEFAULT_SUMMARY_MIN_LENGTH,
            chunk_concurrency: 1,
            chunk_timeout_secs: None,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            upload_max_bytes: DEFAULT_UPLOAD_MAX_BYTES,
            server_port: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, performing validation along the way.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            summarization_provider: parse_optional("SUMMARIZATION_PROVIDER")?
                .unwrap_or(defaults.summarization_provider),
            summarization_model: load_env_optional("SUMMARIZATION_MODEL")
                .unwrap_or(defaults.summarization_model),
            qa_provider: parse_optional("QA_PROVIDER")?.unwrap_or(defaults.qa_provider),
            qa_model: load_env_optional("QA_MODEL").unwrap_or(defaults.qa_model),
            huggingface_url: load_env_optional("HUGGINGFACE_URL"),
            huggingface_api_token: load_env_optional("HUGGINGFACE_API_TOKEN"),
            ollama_url: load_env_optional("OLLAMA_URL"),
            chunk_size: parse_optional("CHUNK_SIZE")?.unwrap_or(defaults.chunk_size),
            chunk_summary_size: parse_optional("CHUNK_SUMMARY_SIZE")?
                .unwrap_or(defaults.chunk_summary_size),
            summary_min_length: parse_optional("SUMMARY_MIN_LENGTH")?
                .unwrap_or(defaults.summary_min_length),
            chunk_concurrency: parse_optional("CHUNK_CONCURRENCY")?
                .unwrap_or(defaults.chunk_concurrency),
            chunk_timeout_secs: parse_optional("CHUNK_TIMEOUT_SECS")?,
            fetch_timeout_secs: parse_optional("FETCH_TIMEOUT_SECS")?
                .unwrap_or(defaults.fetch_timeout_secs),
            upload_max_bytes: parse_optional("UPLOAD_MAX_BYTES")?
                .unwrap_or(defaults.upload_max_bytes),
            server_port: parse_optional("SERVER_PORT")?,
        };

        if config.chunk_size == 0 {
            return Err(ConfigError::InvalidValue("CHUNK_SIZE".into()));
        }
        if config.chunk_summary_size == 0 {
            return Err(ConfigError::InvalidValue("CHUNK_SUMMARY_SIZE".into()));
        }
        if config.chunk_concurrency == 0 {
            return Err(ConfigError::InvalidValue("CHUNK_CONCURRENCY".into()));
        }

        Ok(config)
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_optional<T: FromStr>(key: &str) -> Result<Option<T>, ConfigError> {
    load_env_optional(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidValue(key.to_string()))
        })
        .transpose()
}

impl FromStr for ModelProvider {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "huggingface" | "hf" => Ok(Self::HuggingFace),
            "ollama" => Ok(Self::Ollama),
            _ => Err(()),
        }
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
pub fn init_config() {
    dotenvy::dotenv().ok();
    let config = Config::from_env().expect("Failed to load config from environment");
    tracing::debug!(
        summarization_provider = config.summarization_provider.label(),
        summarization_model = %config.summarization_model,
        qa_provider = config.qa_provider.label(),
        qa_model = %config.qa_model,
        chunk_size = config.chunk_size,
        chunk_summary_size = config.chunk_summary_size,
        server_port = ?config.server_port,
        "Loaded configuration"
    );
    CONFIG.set(config).expect("Failed to set config");
}
