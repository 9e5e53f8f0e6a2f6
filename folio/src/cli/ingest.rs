use std::path::PathBuf;
use std::sync::Arc;

use console::style;
use serde::Serialize;

use folio::config::Config;
use folio::error::{FolioError, Result};
use folio::queue::{IngestionWorker, WorkQueue, WorkerStatsSnapshot};
use folio::services::{IngestionCoordinator, PipelineScopes, UploadFile, UploadSummary};
use folio::storage::InMemoryDocumentRepository;

use super::{open_index, print_json, shutdown_on_ctrl_c};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct IngestReport {
    #[serde(flatten)]
    summary: UploadSummary,
    processed: u64,
    failed: u64,
    cancelled: u64,
    indexed_documents: u64,
}

pub async fn run(config: &Config, files: Vec<PathBuf>, sync: bool, json: bool) -> Result<()> {
    let index = open_index(config)?;
    let documents = Arc::new(InMemoryDocumentRepository::new());
    let queue = Arc::new(WorkQueue::bounded(config.queue.capacity)?);
    let consumer = queue
        .consumer()
        .ok_or_else(|| FolioError::Task("work queue consumer already taken".to_string()))?;

    let scopes = Arc::new(PipelineScopes::new(documents.clone(), Arc::clone(&index)));
    let shutdown = shutdown_on_ctrl_c();
    let worker = IngestionWorker::new(consumer, scopes.clone()).spawn(shutdown.clone());

    let coordinator = IngestionCoordinator::new(documents, Arc::clone(&queue), scopes)
        .synchronous(sync || config.queue.process_synchronously);

    let mut summary = UploadSummary::default();
    let mut uploads = Vec::with_capacity(files.len());
    for path in files {
        let file_name = path
            .file_name()
            .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
        match tokio::fs::read(&path).await {
            Ok(content) => uploads.push(UploadFile::new(file_name, content)),
            Err(e) => summary
                .errors
                .push(format!("Error processing {file_name}: {e}")),
        }
    }

    if !uploads.is_empty() {
        let batch = coordinator.submit_batch(uploads).await?;
        summary.successful_uploads.extend(batch.successful_uploads);
        summary.errors.extend(batch.errors);
    }

    queue.close();
    let stats = worker.await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "ingestion worker task failed");
        WorkerStatsSnapshot::default()
    });

    let indexed_documents = index.num_docs();
    index.shutdown()?;

    let report = IngestReport {
        summary,
        processed: stats.processed,
        failed: stats.failed,
        cancelled: stats.cancelled,
        indexed_documents,
    };

    if json {
        print_json(&report)?;
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &IngestReport) {
    for name in &report.summary.successful_uploads {
        println!("{} {name}", style("accepted").green());
    }
    for error in &report.summary.errors {
        println!("{} {error}", style("skipped").yellow());
    }
    if report.failed > 0 || report.cancelled > 0 {
        println!(
            "{} {} failed, {} cancelled",
            style("warning").red().bold(),
            report.failed,
            report.cancelled
        );
    }
    println!(
        "{} documents in index",
        style(report.indexed_documents).bold()
    );
}
