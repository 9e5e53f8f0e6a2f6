//! Single-consumer ingestion loop.
//!
//! The worker executes one item at a time, so the index only ever sees
//! serialized upserts. A failing or panicking item is logged and the loop
//! moves on; cancellation is treated as shutdown and never retried.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::{Dequeued, QueueConsumer, WorkItem};
use crate::ports::ScopeFactory;

#[derive(Debug, Default)]
pub struct WorkerStats {
    processed: AtomicU64,
    failed: AtomicU64,
    cancelled: AtomicU64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStatsSnapshot {
    pub processed: u64,
    pub failed: u64,
    pub cancelled: u64,
}

impl WorkerStats {
    pub fn snapshot(&self) -> WorkerStatsSnapshot {
        WorkerStatsSnapshot {
            processed: self.processed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            cancelled: self.cancelled.load(Ordering::Relaxed),
        }
    }

    fn record(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

pub struct IngestionWorker {
    consumer: QueueConsumer,
    scopes: Arc<dyn ScopeFactory>,
    stats: Arc<WorkerStats>,
}

impl IngestionWorker {
    pub fn new(consumer: QueueConsumer, scopes: Arc<dyn ScopeFactory>) -> Self {
        Self {
            consumer,
            scopes,
            stats: Arc::new(WorkerStats::default()),
        }
    }

    pub fn stats(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    pub fn spawn(self, shutdown: CancellationToken) -> JoinHandle<WorkerStatsSnapshot> {
        tokio::spawn(self.run(shutdown))
    }

    /// Runs until `shutdown` fires or the queue is closed and drained. An item
    /// already executing when shutdown fires is allowed to finish.
    pub async fn run(mut self, shutdown: CancellationToken) -> WorkerStatsSnapshot {
        tracing::info!("ingestion worker starting");

        loop {
            let item = match self.consumer.dequeue(&shutdown).await {
                Ok(Dequeued::Item(item)) => item,
                Ok(Dequeued::Closed) => {
                    tracing::info!("work queue closed and drained");
                    break;
                }
                Err(e) => {
                    tracing::debug!(reason = %e, "stopped waiting for work");
                    break;
                }
            };

            self.process(item, &shutdown).await;
        }

        let stats = self.stats.snapshot();
        tracing::info!(
            processed = stats.processed,
            failed = stats.failed,
            cancelled = stats.cancelled,
            pending = self.consumer.len(),
            "ingestion worker stopped"
        );
        stats
    }

    async fn process(&self, item: WorkItem, shutdown: &CancellationToken) {
        let label = item.label().to_string();

        let scope = match self.scopes.create_scope().await {
            Ok(scope) => scope,
            Err(e) => {
                tracing::error!(label = %label, error = %e, "could not acquire job scope, work item discarded");
                WorkerStats::record(&self.stats.failed);
                return;
            }
        };

        // The scope moves into the task and is dropped when the item completes.
        let outcome = tokio::spawn(item.execute(scope, shutdown.child_token())).await;

        match outcome {
            Ok(Ok(())) => {
                tracing::info!(label = %label, "work item processed");
                WorkerStats::record(&self.stats.processed);
            }
            Ok(Err(e)) if e.is_cancelled() => {
                tracing::warn!(label = %label, "work item cancelled");
                WorkerStats::record(&self.stats.cancelled);
            }
            Ok(Err(e)) => {
                tracing::error!(label = %label, error = %e, "work item failed");
                WorkerStats::record(&self.stats.failed);
            }
            Err(e) if e.is_panic() => {
                tracing::error!(label = %label, "work item panicked");
                WorkerStats::record(&self.stats.failed);
            }
            Err(_) => {
                tracing::warn!(label = %label, "work item task was cancelled");
                WorkerStats::record(&self.stats.cancelled);
            }
        }
    }
}
