use async_trait::async_trait;

use crate::domain::{DocId, DocumentRecord};
use crate::error::Result;

/// Metadata store for uploaded documents.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn create(&self, record: &DocumentRecord) -> Result<DocId>;
    async fn get(&self, id: &DocId) -> Result<Option<DocumentRecord>>;
    async fn list(&self) -> Result<Vec<DocumentRecord>>;
    async fn set_extracted_text_length(&self, id: &DocId, length: usize) -> Result<()>;
    async fn delete(&self, id: &DocId) -> Result<()>;
}
