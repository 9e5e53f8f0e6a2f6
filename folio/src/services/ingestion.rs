use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use super::pipeline::{index_document_job, process_document};
use crate::domain::{DocId, DocumentRecord, DocumentType};
use crate::error::{FolioError, Result};
use crate::extract::TextExtractor;
use crate::ports::{DocumentRepository, ScopeFactory};
use crate::queue::{EnqueueStatus, WorkQueue};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum SubmitOutcome {
    Enqueued {
        id: DocId,
    },
    #[serde(rename_all = "camelCase")]
    Processed {
        id: DocId,
        extracted_text_length: usize,
    },
    /// The record was stored but the queue no longer accepts work, so the
    /// document will not be indexed by this process.
    QueueClosed {
        id: DocId,
    },
}

impl SubmitOutcome {
    pub const fn id(&self) -> &DocId {
        match self {
            Self::Enqueued { id } | Self::Processed { id, .. } | Self::QueueClosed { id } => id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UploadFile {
    pub file_name: String,
    pub content: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub successful_uploads: Vec<String>,
    pub errors: Vec<String>,
}

pub struct IngestionCoordinator<D>
where
    D: DocumentRepository,
{
    documents: Arc<D>,
    queue: Arc<WorkQueue>,
    scopes: Arc<dyn ScopeFactory>,
    extractor: TextExtractor,
    synchronous: bool,
}

impl<D> IngestionCoordinator<D>
where
    D: DocumentRepository,
{
    pub fn new(documents: Arc<D>, queue: Arc<WorkQueue>, scopes: Arc<dyn ScopeFactory>) -> Self {
        Self {
            documents,
            queue,
            scopes,
            extractor: TextExtractor::new(),
            synchronous: false,
        }
    }

    /// Process uploads inline instead of deferring them to the worker.
    #[must_use]
    pub const fn synchronous(mut self, synchronous: bool) -> Self {
        self.synchronous = synchronous;
        self
    }

    pub async fn submit_document(&self, file_name: &str, content: Vec<u8>) -> Result<SubmitOutcome> {
        if content.is_empty() {
            return Err(FolioError::EmptyUpload(file_name.to_string()));
        }
        let doc_type = DocumentType::from_file_name(file_name)?;

        let record = DocumentRecord::new(file_name, doc_type);
        let id = self.documents.create(&record).await?;
        tracing::info!(document_id = %id, file_name, doc_type = %doc_type, "document accepted");

        let content: Arc<[u8]> = content.into();

        if self.synchronous {
            return Ok(self.process_now(id, content).await);
        }

        match self.queue.enqueue(index_document_job(id.clone(), file_name, content)).await {
            EnqueueStatus::Enqueued => Ok(SubmitOutcome::Enqueued { id }),
            EnqueueStatus::Closed => Ok(SubmitOutcome::QueueClosed { id }),
        }
    }

    async fn process_now(&self, id: DocId, content: Arc<[u8]>) -> SubmitOutcome {
        let result = match self.scopes.create_scope().await {
            Ok(scope) => process_document(&scope, &id, content, &CancellationToken::new()).await,
            Err(e) => Err(e),
        };

        let extracted_text_length = result.unwrap_or_else(|e| {
            tracing::error!(document_id = %id, error = %e, "synchronous processing failed");
            0
        });
        SubmitOutcome::Processed {
            id,
            extracted_text_length,
        }
    }

    /// Submits every file, collecting a message per rejected file instead of
    /// stopping at the first one.
    pub async fn submit_batch(&self, files: Vec<UploadFile>) -> Result<UploadSummary> {
        if files.is_empty() {
            return Err(FolioError::EmptyUpload("no files uploaded".to_string()));
        }

        let mut summary = UploadSummary::default();
        for file in files {
            match self.submit_document(&file.file_name, file.content).await {
                Ok(outcome) => {
                    if matches!(outcome, SubmitOutcome::QueueClosed { .. }) {
                        summary
                            .errors
                            .push(format!("{} was stored but not queued for indexing", file.file_name));
                    } else {
                        summary.successful_uploads.push(file.file_name);
                    }
                }
                Err(FolioError::EmptyUpload(_)) => {
                    tracing::warn!(file_name = %file.file_name, "skipping empty file part");
                    summary.errors.push("An empty file part was skipped.".to_string());
                }
                Err(FolioError::UnsupportedDocumentType(detail)) => {
                    tracing::warn!(file_name = %file.file_name, "invalid file type");
                    summary.errors.push(format!(
                        "Invalid file type: {detail}. Only PDF or DOCX are allowed."
                    ));
                }
                Err(e) => {
                    tracing::error!(file_name = %file.file_name, error = %e, "upload failed");
                    summary
                        .errors
                        .push(format!("Error processing {}: {e}", file.file_name));
                }
            }
        }
        Ok(summary)
    }

    /// Extracts text for a caller-supplied type name without touching any store.
    pub async fn extract_text(&self, content: Vec<u8>, doc_type: &str, label: &str) -> Result<String> {
        let extractor = self.extractor;
        let doc_type = doc_type.to_string();
        let label = label.to_string();
        let text =
            tokio::task::spawn_blocking(move || extractor.extract_named(&content, &doc_type, &label))
                .await?;
        Ok(text)
    }
}
