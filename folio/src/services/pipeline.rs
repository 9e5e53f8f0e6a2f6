use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::domain::DocId;
use crate::error::{FolioError, Result};
use crate::queue::{JobScope, WorkItem};

/// Extracts, records the text length, and indexes one stored document.
///
/// Returns the extracted length in characters. A record that no longer exists
/// is also dropped from the index so the two stores agree.
pub async fn process_document(
    scope: &JobScope,
    id: &DocId,
    content: Arc<[u8]>,
    cancel: &CancellationToken,
) -> Result<usize> {
    let Some(record) = scope.documents.get(id).await? else {
        tracing::warn!(document_id = %id, "metadata missing, dropping index entry");
        let index = Arc::clone(&scope.index);
        let stale = id.clone();
        tokio::task::spawn_blocking(move || index.remove(&stale)).await??;
        return Err(FolioError::DocumentNotFound(id.to_string()));
    };

    if cancel.is_cancelled() {
        return Err(FolioError::Cancelled);
    }

    let extractor = scope.extractor;
    let doc_type = record.document_type;
    let label = record.original_file_name.clone();
    let text = tokio::task::spawn_blocking(move || extractor.extract(&content, doc_type, &label))
        .await?;

    let length = text.chars().count();
    scope.documents.set_extracted_text_length(id, length).await?;
    tracing::info!(
        document_id = %id,
        file_name = %record.original_file_name,
        length,
        "text extracted"
    );

    if cancel.is_cancelled() {
        return Err(FolioError::Cancelled);
    }

    let index = Arc::clone(&scope.index);
    let document_id = id.clone();
    tokio::task::spawn_blocking(move || {
        index.upsert(
            &document_id,
            &record.original_file_name,
            record.document_type,
            &text,
        )
    })
    .await??;

    Ok(length)
}

/// Deferred form of [`process_document`]. Only the id and the uploaded bytes
/// travel with the item.
pub fn index_document_job(id: DocId, file_name: &str, content: Arc<[u8]>) -> WorkItem {
    WorkItem::new(
        format!("index {file_name} ({id})"),
        move |scope, cancel| async move {
            process_document(&scope, &id, content, &cancel).await.map(drop)
        },
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::domain::{DocumentRecord, DocumentType, SearchQuery};
    use crate::extract::fixtures;
    use crate::index::{DEFAULT_WRITER_MEMORY, IndexEngine};
    use crate::storage::InMemoryDocumentRepository;

    fn scope() -> JobScope {
        JobScope::new(
            Arc::new(InMemoryDocumentRepository::new()),
            Arc::new(IndexEngine::in_memory(DEFAULT_WRITER_MEMORY).unwrap()),
        )
    }

    #[tokio::test]
    async fn test_process_document_records_length_and_indexes() {
        let scope = scope();
        let record = DocumentRecord::new("notes.docx", DocumentType::Docx);
        let id = scope.documents.create(&record).await.unwrap();
        let bytes: Arc<[u8]> = fixtures::docx(&["quarterly budget", "review"]).into();

        let length = process_document(&scope, &id, bytes, &CancellationToken::new())
            .await
            .unwrap();

        assert_eq!(length, "quarterly budget\nreview".chars().count());
        let stored = scope.documents.get(&id).await.unwrap().unwrap();
        assert_eq!(stored.extracted_text_length, Some(length));

        let results = scope.index.search(&SearchQuery::new("budget")).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].document_id, id);
        assert_eq!(results[0].file_name, "notes.docx");
    }

    #[tokio::test]
    async fn test_corrupt_document_is_indexed_with_zero_length() {
        let scope = scope();
        let record = DocumentRecord::new("broken.pdf", DocumentType::Pdf);
        let id = scope.documents.create(&record).await.unwrap();

        let length = process_document(
            &scope,
            &id,
            Arc::from(&b"not a pdf"[..]),
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        assert_eq!(length, 0);
        assert_eq!(scope.index.num_docs(), 1);
    }

    #[tokio::test]
    async fn test_missing_record_is_removed_from_index() {
        let scope = scope();
        let id = DocId::generate();
        scope
            .index
            .upsert(&id, "ghost.pdf", DocumentType::Pdf, "ghost")
            .unwrap();

        let err = process_document(&scope, &id, Arc::from(&b"x"[..]), &CancellationToken::new())
            .await
            .unwrap_err();

        assert!(matches!(err, FolioError::DocumentNotFound(_)));
        assert_eq!(scope.index.num_docs(), 0);
    }

    #[tokio::test]
    async fn test_cancelled_before_extraction() {
        let scope = scope();
        let record = DocumentRecord::new("late.docx", DocumentType::Docx);
        let id = scope.documents.create(&record).await.unwrap();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = process_document(&scope, &id, fixtures::docx(&["late"]).into(), &cancel)
            .await
            .unwrap_err();

        assert!(err.is_cancelled());
        let stored = scope.documents.get(&id).await.unwrap().unwrap();
        assert_eq!(stored.extracted_text_length, None);
        assert_eq!(scope.index.num_docs(), 0);
    }

    #[tokio::test]
    async fn test_job_label_names_the_file() {
        let id = DocId::generate();
        let job = index_document_job(id.clone(), "plan.pdf", Arc::from(&b"x"[..]));
        assert_eq!(job.label(), format!("index plan.pdf ({id})"));
    }
}
