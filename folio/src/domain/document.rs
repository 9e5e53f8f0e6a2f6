use std::fmt;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::DocId;
use crate::error::FolioError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocumentType {
    Pdf,
    Docx,
}

impl DocumentType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
        }
    }

    /// Derives the type from the file extension, e.g. `Report.PDF`.
    pub fn from_file_name(file_name: &str) -> Result<Self, FolioError> {
        let extension = Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default();

        extension.parse().map_err(|_| {
            FolioError::UnsupportedDocumentType(if extension.is_empty() {
                file_name.to_string()
            } else {
                format!("{file_name} (.{})", extension.to_lowercase())
            })
        })
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocumentType {
    type Err = FolioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let name = trimmed.strip_prefix('.').unwrap_or(trimmed);
        if name.eq_ignore_ascii_case("pdf") {
            Ok(Self::Pdf)
        } else if name.eq_ignore_ascii_case("docx") {
            Ok(Self::Docx)
        } else {
            Err(FolioError::UnsupportedDocumentType(s.to_string()))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    pub id: DocId,
    pub original_file_name: String,
    pub document_type: DocumentType,
    pub upload_timestamp: DateTime<Utc>,
    pub extracted_text_length: Option<usize>,
}

impl DocumentRecord {
    pub fn new(original_file_name: impl Into<String>, document_type: DocumentType) -> Self {
        Self {
            id: DocId::generate(),
            original_file_name: original_file_name.into(),
            document_type,
            upload_timestamp: Utc::now(),
            extracted_text_length: None,
        }
    }

    pub const fn is_extracted(&self) -> bool {
        self.extracted_text_length.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("pdf".parse::<DocumentType>().unwrap(), DocumentType::Pdf);
        assert_eq!("Docx".parse::<DocumentType>().unwrap(), DocumentType::Docx);
        assert_eq!(".PDF".parse::<DocumentType>().unwrap(), DocumentType::Pdf);
        assert!("txt".parse::<DocumentType>().is_err());
    }

    #[test]
    fn test_from_file_name() {
        assert_eq!(
            DocumentType::from_file_name("Quarterly Report.PDF").unwrap(),
            DocumentType::Pdf
        );
        assert_eq!(
            DocumentType::from_file_name("notes.v2.docx").unwrap(),
            DocumentType::Docx
        );

        let err = DocumentType::from_file_name("image.png").unwrap_err();
        assert!(matches!(err, FolioError::UnsupportedDocumentType(ref msg) if msg.contains(".png")));
        assert!(DocumentType::from_file_name("README").is_err());
    }

    #[test]
    fn test_new_record_is_pending() {
        let record = DocumentRecord::new("a.pdf", DocumentType::Pdf);
        assert!(!record.is_extracted());
        assert_eq!(record.document_type.to_string(), "PDF");
    }
}
