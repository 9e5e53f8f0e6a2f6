mod common;

use pretty_assertions::assert_eq;
use tokio_util::sync::CancellationToken;

use common::{Pipeline, docx, pdf};
use folio::domain::{DocId, DocumentRecord, DocumentType, SearchQuery};
use folio::extract::TextExtractor;
use folio::index::{DEFAULT_WRITER_MEMORY, IndexEngine};
use folio::ports::DocumentRepository;
use folio::queue::WorkerStatsSnapshot;
use folio::services::{SubmitOutcome, UploadFile, process_document};

#[test]
fn test_pdf_pages_are_extracted_in_order() {
    let bytes = pdf(&["first page budget", "second page review"]);
    let text = TextExtractor::new().extract(&bytes, DocumentType::Pdf, "two-pages.pdf");

    let first = text.find("budget").expect("first page text");
    let second = text.find("review").expect("second page text");
    assert!(first < second);
    assert!(text.ends_with('\n'));
}

#[tokio::test]
async fn test_queued_pdf_becomes_searchable() {
    let mut pipeline = Pipeline::new();

    let outcome = pipeline
        .coordinator
        .submit_document("budget.pdf", pdf(&["quarterly budget review"]))
        .await
        .unwrap();
    let SubmitOutcome::Enqueued { id } = outcome else {
        panic!("expected the upload to be queued, got {outcome:?}");
    };

    let stats = pipeline.drain().await;
    assert_eq!(stats.processed, 1);

    let results = pipeline.search.search("budget", None).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].document_id, id);
    assert_eq!(results[0].file_name, "budget.pdf");
    assert_eq!(results[0].doc_type, "PDF");
    assert!(results[0].score > 0.0);

    let docx_only = pipeline.search.search("budget", Some("DOCX")).await.unwrap();
    assert!(docx_only.is_empty());

    let record = pipeline.documents.get(&id).await.unwrap().unwrap();
    assert!(record.extracted_text_length.unwrap_or_default() > 0);
}

#[tokio::test]
async fn test_reprocessing_keeps_one_entry_per_document() {
    let pipeline = Pipeline::new();
    let scope = pipeline.scope().await;
    let id = pipeline
        .documents
        .create(&DocumentRecord::new("policy.docx", DocumentType::Docx))
        .await
        .unwrap();

    for text in ["draft policy", "final policy"] {
        process_document(&scope, &id, docx(&[text]).into(), &CancellationToken::new())
            .await
            .unwrap();
    }

    assert_eq!(pipeline.index.num_docs(), 1);
    assert!(pipeline.search.search("draft", None).await.unwrap().is_empty());
    let results = pipeline.search.search("final", None).await.unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].document_id, id);
}

#[tokio::test]
async fn test_worker_skips_failed_item_and_continues() {
    let mut pipeline = Pipeline::new();

    let doomed = pipeline
        .coordinator
        .submit_document("doomed.docx", docx(&["never indexed"]))
        .await
        .unwrap();
    pipeline
        .coordinator
        .submit_document("kept.docx", docx(&["survivor text"]))
        .await
        .unwrap();
    pipeline.documents.delete(doomed.id()).await.unwrap();

    let stats = pipeline.drain().await;
    assert_eq!(
        stats,
        WorkerStatsSnapshot {
            processed: 1,
            failed: 1,
            cancelled: 0,
        }
    );
    assert!(pipeline.search.search("never", None).await.unwrap().is_empty());
    assert_eq!(pipeline.search.search("survivor", None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_corrupt_upload_is_indexed_without_text() {
    let mut pipeline = Pipeline::new();

    let outcome = pipeline
        .coordinator
        .submit_document("scan.pdf", b"%PDF-1.7 truncated".to_vec())
        .await
        .unwrap();
    let stats = pipeline.drain().await;

    assert_eq!(stats.processed, 1);
    let record = pipeline.documents.get(outcome.id()).await.unwrap().unwrap();
    assert_eq!(record.extracted_text_length, Some(0));

    let by_type = pipeline.search.search("", Some("pdf")).await.unwrap();
    assert_eq!(by_type.len(), 1);
    assert_eq!(by_type[0].file_name, "scan.pdf");
}

#[tokio::test]
async fn test_closed_queue_does_not_fail_uploads() {
    let mut pipeline = Pipeline::new();
    let handle = pipeline.start_worker();
    pipeline.queue.close();

    let outcome = pipeline
        .coordinator
        .submit_document("late.docx", docx(&["late arrival"]))
        .await
        .unwrap();

    assert!(matches!(outcome, SubmitOutcome::QueueClosed { .. }));
    assert_eq!(handle.await.unwrap(), WorkerStatsSnapshot::default());
    assert_eq!(pipeline.index.num_docs(), 0);
}

#[tokio::test]
async fn test_shutdown_stops_worker_with_pending_items() {
    let mut pipeline = Pipeline::new();
    pipeline.shutdown.cancel();
    let handle = pipeline.start_worker();

    pipeline
        .coordinator
        .submit_document("pending.docx", docx(&["pending"]))
        .await
        .unwrap();

    let stats = handle.await.unwrap();
    assert_eq!(stats.processed, 0);
}

#[tokio::test]
async fn test_batch_upload_reports_skipped_files() {
    let pipeline = Pipeline::synchronous();

    let summary = pipeline
        .coordinator
        .submit_batch(vec![
            UploadFile::new("budget.pdf", pdf(&["quarterly budget review"])),
            UploadFile::new("photo.png", b"\x89PNG".to_vec()),
            UploadFile::new("blank.docx", Vec::new()),
            UploadFile::new("minutes.DOCX", docx(&["budget minutes"])),
        ])
        .await
        .unwrap();

    assert_eq!(summary.successful_uploads, vec!["budget.pdf", "minutes.DOCX"]);
    assert_eq!(summary.errors.len(), 2);
    assert!(summary.errors[0].contains("photo.png"));

    let results = pipeline.search.search("budget", None).await.unwrap();
    assert_eq!(results.len(), 2);

    let pdf_only = pipeline.search.search("budget", Some("pdf")).await.unwrap();
    assert_eq!(pdf_only.len(), 1);
    assert_eq!(pdf_only[0].file_name, "budget.pdf");
}

#[tokio::test]
async fn test_on_disk_index_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let id = {
        let pipeline = Pipeline::with_index(
            IndexEngine::open_in_dir(dir.path(), DEFAULT_WRITER_MEMORY).unwrap(),
            true,
        );
        let outcome = pipeline
            .coordinator
            .submit_document("archive.docx", docx(&["archived handbook"]))
            .await
            .unwrap();
        pipeline.index.shutdown().unwrap();
        outcome.id().clone()
    };

    let reopened = IndexEngine::open_in_dir(dir.path(), DEFAULT_WRITER_MEMORY).unwrap();
    let results = reopened.search(&SearchQuery::new("handbook")).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].document_id, id);
}

#[tokio::test]
async fn test_ids_are_shared_between_metadata_and_index() {
    let pipeline = Pipeline::synchronous();
    let outcome = pipeline
        .coordinator
        .submit_document("shared.docx", docx(&["shared identity"]))
        .await
        .unwrap();

    let results = pipeline.search.search("identity", None).await.unwrap();
    let from_index = DocId::from_string(results[0].document_id.as_str());
    assert!(pipeline.documents.get(&from_index).await.unwrap().is_some());
    assert_eq!(&from_index, outcome.id());
}
