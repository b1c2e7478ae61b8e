//! HTTP surface for Rusty Digest.
//!
//! This module exposes a compact Axum router with a handful of endpoints:
//!
//! - `POST /summarize` – Summarize inline text or a web page (`url` wins when both are given).
//!   Accepts optional `chunk_size` and `chunk_summary_size` overrides and returns
//!   `{summary, chunks, failed_chunks, chunk_size}`.
//! - `POST /ask` – Answer a question against a context passage.
//! - `POST /upload` – Summarize an uploaded `txt`, `pdf`, or `docx` file sent as multipart field
//!   `file`.
//! - `GET /metrics` – Observe summarization and question counters.
//! - `GET /commands` – Machine-readable command catalog for quick discovery by tools/hosts.
//!
//! The HTTP surface shares the same pipeline with the MCP server, so behavior is identical
//! across interfaces. Errors are returned as `{"error": message}`.

use crate::config::{CONFIG, DEFAULT_UPLOAD_MAX_BYTES};
use crate::extract::ExtractionError;
use crate::pipeline::{
    DigestApi, DigestError, DocumentSource, QaResult, SummarizeOverrides, SummaryOutcome,
};
use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, State,
        multipart::{Field, MultipartError},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

const NO_FILE_PART: &str = "No file part";
const NO_FILE_SELECTED: &str = "No file selected";
const INVALID_FILE_FORMAT: &str = "Invalid file format";

/// Build the HTTP router exposing the digest API surface.
pub fn create_router<S>(service: Arc<S>) -> Router
where
    S: DigestApi + 'static,
{
    Router::new()
        .route("/summarize", post(summarize::<S>))
        .route("/ask", post(ask::<S>))
        .route(
            "/upload",
            post(upload::<S>).layer(DefaultBodyLimit::max(upload_limit())),
        )
        .route("/metrics", get(get_metrics::<S>))
        .route("/commands", get(get_commands))
        .with_state(service)
}

fn upload_limit() -> usize {
    CONFIG
        .get()
        .map_or(DEFAULT_UPLOAD_MAX_BYTES, |config| config.upload_max_bytes)
}

/// Request body for the `POST /summarize` endpoint.
#[derive(Deserialize)]
struct SummarizeRequest {
    /// Web page to fetch; takes precedence over `text`.
    #[serde(default)]
    url: Option<String>,
    /// Inline document text.
    #[serde(default)]
    text: Option<String>,
    /// Optional chunk width override.
    #[serde(default)]
    chunk_size: Option<i64>,
    /// Optional per-chunk summary length override.
    #[serde(default)]
    chunk_summary_size: Option<i64>,
}

/// Success response shared by `POST /summarize` and `POST /upload`.
#[derive(Serialize)]
struct SummarizeResponse {
    summary: String,
    chunks: usize,
    failed_chunks: usize,
    chunk_size: usize,
}

impl From<SummaryOutcome> for SummarizeResponse {
    fn from(outcome: SummaryOutcome) -> Self {
        Self {
            summary: outcome.summary,
            chunks: outcome.chunk_count,
            failed_chunks: outcome.failed_chunks,
            chunk_size: outcome.chunk_size,
        }
    }
}

/// Summarize inline text or a fetched web page.
async fn summarize<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, AppError>
where
    S: DigestApi,
{
    let SummarizeRequest {
        url,
        text,
        chunk_size,
        chunk_summary_size,
    } = request;
    let source = match url.filter(|url| !url.is_empty()) {
        Some(url) => DocumentSource::Url(url),
        None => DocumentSource::Text(text.unwrap_or_default()),
    };
    let outcome = service
        .summarize(
            source,
            SummarizeOverrides {
                chunk_size,
                chunk_summary_size,
            },
        )
        .await?;
    Ok(Json(outcome.into()))
}

/// Request body for the `POST /ask` endpoint.
#[derive(Deserialize)]
struct AskRequest {
    #[serde(default)]
    context: Option<String>,
    #[serde(default)]
    question: Option<String>,
}

/// Response body for `POST /ask`.
#[derive(Serialize)]
struct AskResponse {
    answer: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    score: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    start: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    end: Option<usize>,
}

impl From<QaResult> for AskResponse {
    fn from(result: QaResult) -> Self {
        Self {
            answer: result.answer,
            score: result.score,
            start: result.start,
            end: result.end,
        }
    }
}

/// Answer a question against the supplied context.
async fn ask<S>(
    State(service): State<Arc<S>>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, AppError>
where
    S: DigestApi,
{
    let result = service
        .answer(
            request.context.unwrap_or_default(),
            request.question.unwrap_or_default(),
        )
        .await?;
    Ok(Json(result.into()))
}

/// Summarize an uploaded document.
///
/// Besides `file`, the form may carry `chunk_size` and `chunk_summary_size` text fields.
async fn upload<S>(
    State(service): State<Arc<S>>,
    mut multipart: Multipart,
) -> Result<Json<SummarizeResponse>, AppError>
where
    S: DigestApi,
{
    let mut file = None;
    let mut overrides = SummarizeOverrides::default();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_owned);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                file = Some((filename, bytes.to_vec()));
            }
            Some(name @ "chunk_size") => {
                overrides.chunk_size = Some(size_field(name, field).await?)
            }
            Some(name @ "chunk_summary_size") => {
                overrides.chunk_summary_size = Some(size_field(name, field).await?)
            }
            _ => {}
        }
    }

    let (filename, bytes) = file.ok_or_else(|| AppError::bad_request(NO_FILE_PART))?;
    if filename.is_empty() {
        return Err(AppError::bad_request(NO_FILE_SELECTED));
    }
    tracing::info!(filename = %filename, bytes = bytes.len(), "Upload received");

    let outcome = service
        .summarize(DocumentSource::File { filename, bytes }, overrides)
        .await?;
    Ok(Json(outcome.into()))
}

async fn size_field(name: &str, field: Field<'_>) -> Result<i64, AppError> {
    let value = field.text().await?;
    value
        .trim()
        .parse()
        .map_err(|_| AppError::bad_request(format!("{name} must be an integer")))
}

/// Return summarization and question answering counters.
async fn get_metrics<S>(State(service): State<Arc<S>>) -> Json<MetricsResponse>
where
    S: DigestApi,
{
    let snapshot = service.metrics_snapshot();
    Json(MetricsResponse {
        documents_summarized: snapshot.documents_summarized,
        chunks_summarized: snapshot.chunks_summarized,
        chunks_failed: snapshot.chunks_failed,
        questions_answered: snapshot.questions_answered,
    })
}

/// Response body for `GET /metrics`.
#[derive(Serialize)]
struct MetricsResponse {
    documents_summarized: u64,
    chunks_summarized: u64,
    chunks_failed: u64,
    questions_answered: u64,
}

/// Descriptor for a single command in the discovery catalog.
#[derive(Serialize)]
struct CommandDescriptor {
    name: &'static str,
    method: &'static str,
    path: &'static str,
    description: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_example: Option<serde_json::Value>,
}

/// Response body for `GET /commands`.
#[derive(Serialize)]
struct CommandsResponse {
    commands: Vec<CommandDescriptor>,
}

/// Enumerate supported HTTP commands for discovery/UX in hosts and tools.
async fn get_commands() -> Json<CommandsResponse> {
    Json(CommandsResponse {
        commands: vec![
            CommandDescriptor {
                name: "summarize",
                method: "POST",
                path: "/summarize",
                description: "Split text (or a fetched web page) into fixed-size chunks, summarize each chunk, and join the results. Response returns { \"summary\": string, \"chunks\": number, \"failed_chunks\": number, \"chunk_size\": number }.",
                request_example: Some(json!({
                    "text": "Document contents",
                    "url": "https://example.org/article",
                    "chunk_size": 1024,
                    "chunk_summary_size": 128
                })),
            },
            CommandDescriptor {
                name: "ask",
                method: "POST",
                path: "/ask",
                description: "Extract an answer to a question from the supplied context passage.",
                request_example: Some(json!({
                    "context": "The sky is blue because of Rayleigh scattering.",
                    "question": "Why is the sky blue?"
                })),
            },
            CommandDescriptor {
                name: "upload",
                method: "POST",
                path: "/upload",
                description: "Summarize an uploaded txt, pdf, or docx file sent as multipart form field `file`.",
                request_example: None,
            },
            CommandDescriptor {
                name: "metrics",
                method: "GET",
                path: "/metrics",
                description: "Return summarization and question answering counters.",
                request_example: None,
            },
        ],
    })
}

/// Error response carrying a status code and a client-facing message.
struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

impl From<DigestError> for AppError {
    fn from(error: DigestError) -> Self {
        match error {
            DigestError::InvalidArgument(message) => Self::bad_request(message),
            DigestError::Extraction(ExtractionError::UnsupportedType(_)) => {
                Self::bad_request(INVALID_FILE_FORMAT)
            }
            DigestError::Extraction(error @ ExtractionError::Fetch { .. }) => {
                tracing::warn!(error = %error, "Page fetch failed");
                Self {
                    status: StatusCode::BAD_GATEWAY,
                    message: error.to_string(),
                }
            }
            DigestError::Extraction(error) => Self::bad_request(error.to_string()),
            DigestError::ModelInference(error) => {
                tracing::error!(error = %error, "Model inference failed");
                Self {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: error.to_string(),
                }
            }
        }
    }
}

impl From<MultipartError> for AppError {
    fn from(error: MultipartError) -> Self {
        Self {
            status: error.status(),
            message: error.body_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{create_router, get_commands};
    use crate::extract::ExtractionError;
    use crate::metrics::MetricsSnapshot;
    use crate::models::ModelError;
    use crate::pipeline::{
        DigestApi, DigestError, DocumentSource, NO_INPUT_MESSAGE, QA_INPUT_MESSAGE, QaResult,
        SummarizeOptions, SummarizeOverrides, SummaryOutcome,
    };
    use async_trait::async_trait;
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode},
    };
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    const BOUNDARY: &str = "digest-boundary";

    #[derive(Debug, Clone)]
    enum RecordedSource {
        Text(String),
        Url(String),
        File { filename: String, bytes: Vec<u8> },
    }

    #[derive(Default)]
    struct StubDigestService {
        calls: Mutex<Vec<(RecordedSource, SummarizeOverrides)>>,
    }

    impl StubDigestService {
        async fn recorded_calls(&self) -> Vec<(RecordedSource, SummarizeOverrides)> {
            self.calls.lock().await.clone()
        }
    }

    #[async_trait]
    impl DigestApi for StubDigestService {
        async fn summarize(
            &self,
            source: DocumentSource,
            overrides: SummarizeOverrides,
        ) -> Result<SummaryOutcome, DigestError> {
            let recorded = match source {
                DocumentSource::Text(text) => RecordedSource::Text(text),
                DocumentSource::Url(url) => RecordedSource::Url(url),
                DocumentSource::File { filename, bytes } => {
                    if !filename.ends_with(".txt") {
                        return Err(ExtractionError::UnsupportedType(filename).into());
                    }
                    RecordedSource::File { filename, bytes }
                }
            };
            if let RecordedSource::Text(text) = &recorded {
                if text.is_empty() {
                    return Err(DigestError::InvalidArgument(NO_INPUT_MESSAGE.into()));
                }
            }
            self.calls.lock().await.push((recorded, overrides));
            Ok(SummaryOutcome {
                summary: "short summary".into(),
                chunk_count: 2,
                failed_chunks: 1,
                chunk_size: overrides.chunk_size.map_or(1024, |size| size as usize),
            })
        }

        async fn answer(
            &self,
            context: String,
            question: String,
        ) -> Result<QaResult, DigestError> {
            if context.is_empty() || question.is_empty() {
                return Err(DigestError::InvalidArgument(QA_INPUT_MESSAGE.into()));
            }
            if context == "FAIL" {
                return Err(ModelError::GenerationFailed("model offline".into()).into());
            }
            Ok(QaResult {
                answer: "Rayleigh scattering".into(),
                score: Some(0.9),
                start: Some(27),
                end: Some(46),
            })
        }

        fn metrics_snapshot(&self) -> MetricsSnapshot {
            MetricsSnapshot {
                documents_summarized: 3,
                chunks_summarized: 7,
                chunks_failed: 1,
                questions_answered: 2,
            }
        }

        fn defaults(&self) -> SummarizeOptions {
            SummarizeOptions::default()
        }
    }

    fn app() -> (Arc<StubDigestService>, Router) {
        let service = Arc::new(StubDigestService::default());
        (service.clone(), create_router(service))
    }

    async fn send_json(app: Router, path: &str, payload: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri(path)
                    .header("content-type", "application/json")
                    .body(Body::from(payload.to_string()))
                    .expect("request"),
            )
            .await
            .expect("router response");
        read_json(response).await
    }

    async fn send_multipart(app: Router, body: String) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/upload")
                    .header(
                        "content-type",
                        format!("multipart/form-data; boundary={BOUNDARY}"),
                    )
                    .body(Body::from(body))
                    .expect("request"),
            )
            .await
            .expect("router response");
        read_json(response).await
    }

    async fn read_json(response: axum::response::Response) -> (StatusCode, Value) {
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        (status, serde_json::from_slice(&body).expect("json body"))
    }

    fn file_part(filename: &str, contents: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n{contents}\r\n"
        )
    }

    fn text_part(name: &str, value: &str) -> String {
        format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
    }

    fn closing() -> String {
        format!("--{BOUNDARY}--\r\n")
    }

    #[tokio::test]
    async fn commands_catalog_exposes_summarize_endpoint() {
        let response = get_commands().await;
        let commands = response.0.commands;
        let summarize = commands
            .iter()
            .find(|cmd| cmd.name == "summarize")
            .expect("summarize command present");

        assert_eq!(summarize.method, "POST");
        assert_eq!(summarize.path, "/summarize");
        assert!(summarize.description.to_lowercase().contains("chunk"));
        assert!(commands.iter().any(|cmd| cmd.path == "/upload"));
    }

    #[tokio::test]
    async fn summarize_route_returns_summary_and_counts() {
        let (service, app) = app();
        let (status, body) = send_json(
            app,
            "/summarize",
            json!({ "text": "Document body", "chunk_size": 512 }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["summary"], "short summary");
        assert_eq!(body["chunks"], 2);
        assert_eq!(body["failed_chunks"], 1);
        assert_eq!(body["chunk_size"], 512);

        let calls = service.recorded_calls().await;
        assert_eq!(calls.len(), 1);
        assert!(matches!(&calls[0].0, RecordedSource::Text(text) if text == "Document body"));
        assert_eq!(calls[0].1.chunk_size, Some(512));
        assert_eq!(calls[0].1.chunk_summary_size, None);
    }

    #[tokio::test]
    async fn url_takes_precedence_over_text() {
        let (service, app) = app();
        let (status, _) = send_json(
            app,
            "/summarize",
            json!({ "text": "ignored", "url": "https://example.org/story" }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let calls = service.recorded_calls().await;
        assert!(
            matches!(&calls[0].0, RecordedSource::Url(url) if url == "https://example.org/story")
        );
    }

    #[tokio::test]
    async fn summarize_without_input_is_bad_request() {
        let (_, app) = app();
        let (status, body) = send_json(app, "/summarize", json!({})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": NO_INPUT_MESSAGE }));
    }

    #[tokio::test]
    async fn ask_route_returns_answer_span() {
        let (_, app) = app();
        let (status, body) = send_json(
            app,
            "/ask",
            json!({
                "context": "The sky is blue because of Rayleigh scattering.",
                "question": "Why is the sky blue?"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "Rayleigh scattering");
        assert_eq!(body["start"], 27);
        assert_eq!(body["end"], 46);
    }

    #[tokio::test]
    async fn ask_without_question_is_bad_request() {
        let (_, app) = app();
        let (status, body) = send_json(app, "/ask", json!({ "context": "Some context." })).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": QA_INPUT_MESSAGE }));
    }

    #[tokio::test]
    async fn ask_model_failure_is_server_error() {
        let (_, app) = app();
        let (status, body) =
            send_json(app, "/ask", json!({ "context": "FAIL", "question": "Why?" })).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().expect("message").contains("model offline"));
    }

    #[tokio::test]
    async fn upload_forwards_file_and_overrides() {
        let (service, app) = app();
        let body = format!(
            "{}{}{}",
            text_part("chunk_size", "256"),
            file_part("notes.txt", "Uploaded notes"),
            closing()
        );
        let (status, json) = send_multipart(app, body).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["chunk_size"], 256);
        let calls = service.recorded_calls().await;
        assert!(matches!(
            &calls[0].0,
            RecordedSource::File { filename, bytes }
                if filename == "notes.txt" && bytes.as_slice() == b"Uploaded notes"
        ));
    }

    #[tokio::test]
    async fn upload_without_file_part_is_rejected() {
        let (_, app) = app();
        let body = format!("{}{}", text_part("chunk_size", "256"), closing());
        let (status, json) = send_multipart(app, body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, json!({ "error": "No file part" }));
    }

    #[tokio::test]
    async fn upload_with_empty_filename_is_rejected() {
        let (_, app) = app();
        let body = format!("{}{}", file_part("", ""), closing());
        let (status, json) = send_multipart(app, body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, json!({ "error": "No file selected" }));
    }

    #[tokio::test]
    async fn upload_with_unsupported_extension_is_rejected() {
        let (_, app) = app();
        let body = format!("{}{}", file_part("image.png", "not text"), closing());
        let (status, json) = send_multipart(app, body).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json, json!({ "error": "Invalid file format" }));
    }

    #[tokio::test]
    async fn metrics_route_reports_counters() {
        let (_, app) = app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/metrics")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router response");
        let (status, body) = read_json(response).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["documents_summarized"], 3);
        assert_eq!(body["chunks_failed"], 1);
        assert_eq!(body["questions_answered"], 2);
    }
}
