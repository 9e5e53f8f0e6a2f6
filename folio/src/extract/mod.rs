//! Plain-text extraction for uploaded documents.
//!
//! Extraction never fails from the caller's point of view: corrupt or
//! unreadable input is logged with the document label and yields an empty
//! string, so "extracted text length 0" is the failure signal.

mod docx;
#[cfg(test)]
pub(crate) mod fixtures;
mod pdf;

use std::io::{Read, Seek, SeekFrom};

use thiserror::Error;

use crate::domain::DocumentType;

#[derive(Error, Debug)]
pub(crate) enum ExtractError {
    #[error("PDF parse error: {0}")]
    Pdf(String),

    #[error("DOCX archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("DOCX markup error: {0}")]
    Markup(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TextExtractor;

impl TextExtractor {
    pub const fn new() -> Self {
        Self
    }

    /// Rewinds `reader` before reading, since callers may already have consumed it.
    pub fn extract_from_reader<R: Read + Seek>(
        &self,
        reader: &mut R,
        doc_type: DocumentType,
        label: &str,
    ) -> String {
        let mut bytes = Vec::new();
        let read = reader
            .seek(SeekFrom::Start(0))
            .and_then(|_| reader.read_to_end(&mut bytes));

        if let Err(e) = read {
            tracing::error!(label, doc_type = %doc_type, error = %e, "failed to read document stream");
            return String::new();
        }

        self.extract(&bytes, doc_type, label)
    }

    /// Like [`extract`](Self::extract), taking the type by name (`"pdf"`, `"DOCX"`).
    pub fn extract_named(&self, bytes: &[u8], doc_type: &str, label: &str) -> String {
        match doc_type.parse::<DocumentType>() {
            Ok(doc_type) => self.extract(bytes, doc_type, label),
            Err(_) => {
                tracing::warn!(label, doc_type, "unsupported document type, nothing extracted");
                String::new()
            }
        }
    }

    pub fn extract(&self, bytes: &[u8], doc_type: DocumentType, label: &str) -> String {
        if bytes.is_empty() {
            tracing::error!(label, doc_type = %doc_type, "document content is empty");
            return String::new();
        }

        let extracted = match doc_type {
            DocumentType::Pdf => pdf::extract_pages(bytes).map(|pages| join_pages(&pages, label)),
            DocumentType::Docx => docx::extract_body(bytes),
        };

        match extracted {
            Ok(text) => {
                tracing::debug!(label, doc_type = %doc_type, length = text.len(), "text extracted");
                text
            }
            Err(e) => {
                tracing::error!(label, doc_type = %doc_type, error = %e, "text extraction failed");
                String::new()
            }
        }
    }
}

fn join_pages(pages: &[String], label: &str) -> String {
    if pages.is_empty() {
        tracing::warn!(label, "PDF has no pages");
        return String::new();
    }

    let mut text = String::with_capacity(pages.iter().map(|p| p.len() + 1).sum());
    for page in pages {
        text.push_str(page);
        text.push('\n');
    }
    text
}
