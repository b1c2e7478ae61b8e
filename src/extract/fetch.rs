use super::{ExtractionError, html::page_text};
use reqwest::Client;
use std::time::Duration;

/// Downloads web pages and reduces them to readable text.
#[derive(Clone)]
pub struct PageFetcher {
    http: Client,
}

impl PageFetcher {
    /// Build a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, ExtractionError> {
        let http = Client::builder()
            .user_agent("rusty-digest/fetch")
            .timeout(timeout)
            .build()
            .map_err(|error| ExtractionError::Fetch {
                url: String::new(),
                message: format!("failed to construct HTTP client: {error}"),
            })?;
        Ok(Self { http })
    }

    /// Fetch `url` and return its readable text.
    ///
    /// A non-success status yields empty text rather than an error; only transport failures
    /// are reported.
    pub async fn fetch_text(&self, url: &str) -> Result<String, ExtractionError> {
        let fetch_error = |error: reqwest::Error| ExtractionError::Fetch {
            url: url.to_string(),
            message: error.to_string(),
        };

        let response = self.http.get(url).send().await.map_err(fetch_error)?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url, %status, "Page fetch returned non-success status");
            return Ok(String::new());
        }

        let body = response.text().await.map_err(fetch_error)?;
        let text = page_text(&body);
        tracing::debug!(url, chars = text.chars().count(), "Fetched page text");
        Ok(text)
    }
}
