//! Text extraction from uploaded files and web pages.
//!
//! Everything here normalizes a source into one plain-text string; the summarization pipeline
//! never sees file formats or HTML.

mod docx;
mod fetch;
mod html;
mod pdf;

pub use fetch::PageFetcher;
pub use html::page_text;

use thiserror::Error;

/// Errors raised while turning a source into plain text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The uploaded file extension is not one of `txt`, `pdf`, `docx`.
    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),
    /// Plain-text upload was not valid UTF-8.
    #[error("Text file is not valid UTF-8: {0}")]
    InvalidEncoding(#[from] std::string::FromUtf8Error),
    /// PDF content could not be parsed.
    #[error("PDF extraction failed: {0}")]
    Pdf(String),
    /// DOCX archive or document part could not be read.
    #[error("DOCX extraction failed: {0}")]
    Docx(String),
    /// Web page could not be fetched.
    #[error("Failed to fetch {url}: {message}")]
    Fetch {
        /// URL that was requested.
        url: String,
        /// Transport error description.
        message: String,
    },
}

/// File formats accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// UTF-8 plain text.
    Text,
    /// Portable Document Format.
    Pdf,
    /// Office Open XML word-processor document.
    Docx,
}

impl DocumentKind {
    /// Resolve the document kind from a filename's extension, case-insensitively.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let (_, extension) = filename.rsplit_once('.')?;
        match extension.to_lowercase().as_str() {
            "txt" => Some(Self::Text),
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }
}

/// Extract plain text from an uploaded file's bytes.
pub fn extract_file(filename: &str, bytes: Vec<u8>) -> Result<String, ExtractionError> {
    let kind = DocumentKind::from_filename(filename)
        .ok_or_else(|| ExtractionError::UnsupportedType(filename.to_string()))?;
    let text = match kind {
        DocumentKind::Text => String::from_utf8(bytes)?,
        DocumentKind::Pdf => pdf::extract_pdf(&bytes)?,
        DocumentKind::Docx => docx::extract_docx(&bytes)?,
    };
    tracing::debug!(filename, kind = ?kind, chars = text.chars().count(), "Extracted file text");
    Ok(text)
}
