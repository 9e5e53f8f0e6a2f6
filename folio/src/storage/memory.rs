use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{DocId, DocumentRecord};
use crate::error::{FolioError, Result};
use crate::ports::DocumentRepository;

/// Process-local metadata store; records are lost when the process exits.
#[derive(Debug, Default)]
pub struct InMemoryDocumentRepository {
    records: RwLock<HashMap<DocId, DocumentRecord>>,
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentRepository for InMemoryDocumentRepository {
    async fn create(&self, record: &DocumentRecord) -> Result<DocId> {
        self.records
            .write()
            .await
            .insert(record.id.clone(), record.clone());
        Ok(record.id.clone())
    }

    async fn get(&self, id: &DocId) -> Result<Option<DocumentRecord>> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn list(&self) -> Result<Vec<DocumentRecord>> {
        let mut records: Vec<_> = self.records.read().await.values().cloned().collect();
        records.sort_by(|a, b| a.upload_timestamp.cmp(&b.upload_timestamp));
        Ok(records)
    }

    async fn set_extracted_text_length(&self, id: &DocId, length: usize) -> Result<()> {
        let mut records = self.records.write().await;
        let record = records
            .get_mut(id)
            .ok_or_else(|| FolioError::DocumentNotFound(id.to_string()))?;
        record.extracted_text_length = Some(length);
        Ok(())
    }

    async fn delete(&self, id: &DocId) -> Result<()> {
        self.records.write().await.remove(id);
        Ok(())
    }
}
