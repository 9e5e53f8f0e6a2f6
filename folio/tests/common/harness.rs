use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use folio::config::SearchConfig;
use folio::index::{DEFAULT_WRITER_MEMORY, IndexEngine};
use folio::ports::ScopeFactory;
use folio::queue::{IngestionWorker, JobScope, QueueConsumer, WorkQueue, WorkerStatsSnapshot};
use folio::services::{IngestionCoordinator, PipelineScopes, SearchService};
use folio::storage::InMemoryDocumentRepository;

/// Coordinator, worker, engine and search service wired the way the binary
/// wires them, with an in-memory index by default.
pub struct Pipeline {
    pub documents: Arc<InMemoryDocumentRepository>,
    pub index: Arc<IndexEngine>,
    pub queue: Arc<WorkQueue>,
    pub coordinator: IngestionCoordinator<InMemoryDocumentRepository>,
    pub search: SearchService,
    pub shutdown: CancellationToken,
    scopes: Arc<PipelineScopes>,
    consumer: Option<QueueConsumer>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::with_index(IndexEngine::in_memory(DEFAULT_WRITER_MEMORY).unwrap(), false)
    }

    pub fn synchronous() -> Self {
        Self::with_index(IndexEngine::in_memory(DEFAULT_WRITER_MEMORY).unwrap(), true)
    }

    pub fn with_index(index: IndexEngine, synchronous: bool) -> Self {
        let documents = Arc::new(InMemoryDocumentRepository::new());
        let index = Arc::new(index);
        let queue = Arc::new(WorkQueue::bounded(16).unwrap());
        let consumer = queue.consumer();
        let scopes = Arc::new(PipelineScopes::new(documents.clone(), Arc::clone(&index)));
        let coordinator = IngestionCoordinator::new(
            Arc::clone(&documents),
            Arc::clone(&queue),
            scopes.clone(),
        )
        .synchronous(synchronous);
        let search = SearchService::new(Arc::clone(&index), SearchConfig::default());

        Self {
            documents,
            index,
            queue,
            coordinator,
            search,
            shutdown: CancellationToken::new(),
            scopes,
            consumer,
        }
    }

    pub async fn scope(&self) -> JobScope {
        self.scopes.create_scope().await.unwrap()
    }

    pub fn start_worker(&mut self) -> JoinHandle<WorkerStatsSnapshot> {
        let consumer = self.consumer.take().expect("worker already started");
        IngestionWorker::new(consumer, self.scopes.clone()).spawn(self.shutdown.clone())
    }

    /// Closes the queue and waits until the worker has processed everything.
    pub async fn drain(&mut self) -> WorkerStatsSnapshot {
        let handle = self.start_worker();
        self.queue.close();
        handle.await.unwrap()
    }
}
