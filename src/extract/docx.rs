//! DOCX paragraph extraction.
//!
//! Reads `word/document.xml` out of the archive and joins paragraph text with single spaces.
//! Paragraphs without runs still count, so consecutive empty paragraphs produce repeated spaces.
//! Paragraphs nested inside another (text boxes, table cells) are emitted separately in the order
//! they open.

use super::ExtractionError;
use quick_xml::{events::Event, reader::Reader};
use std::io::{Cursor, Read};

const DOCUMENT_PART: &str = "word/document.xml";

pub(super) fn extract_docx(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|error| ExtractionError::Docx(format!("invalid archive: {error}")))?;
    let mut part = archive
        .by_name(DOCUMENT_PART)
        .map_err(|error| ExtractionError::Docx(format!("missing {DOCUMENT_PART}: {error}")))?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)
        .map_err(|error| ExtractionError::Docx(format!("unreadable {DOCUMENT_PART}: {error}")))?;

    Ok(document_paragraphs(&xml)?.join(" "))
}

/// Text of every `w:p` element, indexed by opening order.
fn document_paragraphs(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs: Vec<String> = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    let mut run_depth = 0usize;
    let mut in_text = false;

    loop {
        let event = reader.read_event().map_err(|error| {
            ExtractionError::Docx(format!(
                "malformed {DOCUMENT_PART} at byte {}: {error}",
                reader.buffer_position()
            ))
        })?;
        match event {
            Event::Start(element) => match element.local_name().as_ref() {
                b"p" => {
                    open.push(paragraphs.len());
                    paragraphs.push(String::new());
                }
                b"r" => run_depth += 1,
                b"t" => in_text = true,
                _ => {}
            },
            Event::End(element) => match element.local_name().as_ref() {
                b"p" => {
                    open.pop();
                }
                b"r" => run_depth = run_depth.saturating_sub(1),
                b"t" => in_text = false,
                _ => {}
            },
            Event::Empty(element) => {
                // Tab stops also live under `w:pPr`; only tabs and breaks inside a run are text.
                let token = match element.local_name().as_ref() {
                    b"p" => {
                        paragraphs.push(String::new());
                        None
                    }
                    b"tab" if run_depth > 0 => Some('\t'),
                    b"br" | b"cr" if run_depth > 0 => Some('\n'),
                    _ => None,
                };
                if let (Some(token), Some(&index)) = (token, open.last()) {
                    paragraphs[index].push(token);
                }
            }
            Event::Text(content) if in_text => {
                let text = content
                    .unescape()
                    .map_err(|error| ExtractionError::Docx(format!("bad text run: {error}")))?;
                if let Some(&index) = open.last() {
                    paragraphs[index].push_str(&text);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}
