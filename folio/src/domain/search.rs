use serde::{Deserialize, Serialize};

use super::DocId;

pub const DEFAULT_LIMIT: usize = 10;
pub const MAX_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub keywords: String,
    pub doc_type: Option<String>,
    pub limit: usize,
}

impl SearchQuery {
    pub fn new(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            doc_type: None,
            limit: DEFAULT_LIMIT,
        }
    }

    #[must_use]
    pub fn with_doc_type(mut self, doc_type: impl Into<String>) -> Self {
        self.doc_type = Some(doc_type.into());
        self
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn keywords(&self) -> Option<&str> {
        let trimmed = self.keywords.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Upper-cased filter, `None` when absent or blank.
    pub fn doc_type_filter(&self) -> Option<String> {
        self.doc_type
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_uppercase)
    }

    pub fn has_criteria(&self) -> bool {
        self.keywords().is_some() || self.doc_type_filter().is_some()
    }

    pub fn effective_limit(&self) -> usize {
        self.limit.clamp(1, MAX_LIMIT)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub document_id: DocId,
    pub file_name: String,
    pub doc_type: String,
    pub score: f32,
}
