use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{FolioError, Result};
use crate::index::IndexEngine;
use crate::ports::{DocumentRepository, ScopeFactory};
use crate::queue::JobScope;

/// Hands each work item the shared repository and index engine.
pub struct PipelineScopes {
    documents: Arc<dyn DocumentRepository>,
    index: Arc<IndexEngine>,
}

impl PipelineScopes {
    pub fn new(documents: Arc<dyn DocumentRepository>, index: Arc<IndexEngine>) -> Self {
        Self { documents, index }
    }
}

#[async_trait]
impl ScopeFactory for PipelineScopes {
    async fn create_scope(&self) -> Result<JobScope> {
        if self.index.is_closed() {
            return Err(FolioError::IndexClosed);
        }
        Ok(JobScope::new(
            Arc::clone(&self.documents),
            Arc::clone(&self.index),
        ))
    }
}
