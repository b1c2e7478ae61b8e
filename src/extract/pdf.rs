use super::ExtractionError;

/// Concatenate the text of every page in the document.
pub(super) fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractionError> {
    pdf_extract::extract_text_from_mem(bytes)
        .map_err(|error| ExtractionError::Pdf(error.to_string()))
}
