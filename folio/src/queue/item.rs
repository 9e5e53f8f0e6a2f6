use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::extract::TextExtractor;
use crate::index::IndexEngine;
use crate::ports::DocumentRepository;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

type WorkFn = Box<dyn FnOnce(JobScope, CancellationToken) -> BoxFuture<Result<()>> + Send>;

/// Resources handed to one work item. Acquired when the item starts and
/// dropped as soon as it finishes.
#[derive(Clone)]
pub struct JobScope {
    pub documents: Arc<dyn DocumentRepository>,
    pub index: Arc<IndexEngine>,
    pub extractor: TextExtractor,
}

impl JobScope {
    pub fn new(documents: Arc<dyn DocumentRepository>, index: Arc<IndexEngine>) -> Self {
        Self {
            documents,
            index,
            extractor: TextExtractor::new(),
        }
    }
}

impl fmt::Debug for JobScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobScope")
            .field("index", &self.index.location())
            .finish_non_exhaustive()
    }
}

/// A deferred unit of work. It carries the data it needs, never a resource;
/// resources arrive through the [`JobScope`] at execution time.
pub struct WorkItem {
    label: String,
    run: WorkFn,
}

impl WorkItem {
    pub fn new<F, Fut>(label: impl Into<String>, run: F) -> Self
    where
        F: FnOnce(JobScope, CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        Self {
            label: label.into(),
            run: Box::new(move |scope, cancel| Box::pin(run(scope, cancel))),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn execute(self, scope: JobScope, cancel: CancellationToken) -> BoxFuture<Result<()>> {
        (self.run)(scope, cancel)
    }
}

impl fmt::Debug for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkItem")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}
