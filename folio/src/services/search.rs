use std::sync::Arc;

use crate::config::SearchConfig;
use crate::domain::{SearchQuery, SearchResult};
use crate::error::Result;
use crate::index::IndexEngine;

pub struct SearchService {
    index: Arc<IndexEngine>,
    config: SearchConfig,
}

impl SearchService {
    pub const fn new(index: Arc<IndexEngine>, config: SearchConfig) -> Self {
        Self { index, config }
    }

    pub async fn search(&self, keywords: &str, doc_type: Option<&str>) -> Result<Vec<SearchResult>> {
        self.search_with_limit(keywords, doc_type, self.config.default_limit)
            .await
    }

    /// `limit` is capped by the configured maximum as well as the engine's own bound.
    pub async fn search_with_limit(
        &self,
        keywords: &str,
        doc_type: Option<&str>,
        limit: usize,
    ) -> Result<Vec<SearchResult>> {
        let mut query = SearchQuery::new(keywords).with_limit(limit.min(self.config.max_limit));
        if let Some(doc_type) = doc_type {
            query = query.with_doc_type(doc_type);
        }

        if !query.has_criteria() {
            tracing::debug!("search without keywords or type filter");
            return Ok(Vec::new());
        }

        let index = Arc::clone(&self.index);
        let results = tokio::task::spawn_blocking(move || index.search(&query)).await??;
        tracing::debug!(keywords, ?doc_type, hits = results.len(), "search completed");
        Ok(results)
    }
}
