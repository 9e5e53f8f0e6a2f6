//! Deferred ingestion work.
//!
//! A bounded FIFO [`WorkQueue`] feeds exactly one [`IngestionWorker`]. Many
//! producers may enqueue concurrently; a full queue makes them wait rather
//! than dropping work.

mod item;
mod worker;

use std::sync::{Mutex, PoisonError};

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_util::sync::CancellationToken;

pub use item::{JobScope, WorkItem};
pub use worker::{IngestionWorker, WorkerStats, WorkerStatsSnapshot};

use crate::error::{FolioError, Result};

pub const DEFAULT_CAPACITY: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnqueueStatus {
    Enqueued,
    /// The queue no longer accepts work; the item was discarded.
    Closed,
}

#[derive(Debug)]
pub enum Dequeued {
    Item(WorkItem),
    /// Closed and fully drained.
    Closed,
}

pub struct WorkQueue {
    sender: Mutex<Option<mpsc::Sender<WorkItem>>>,
    receiver: Mutex<Option<mpsc::Receiver<WorkItem>>>,
    capacity: usize,
}

impl WorkQueue {
    pub fn bounded(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(FolioError::InvalidCapacity(capacity));
        }

        let (sender, receiver) = mpsc::channel(capacity);
        Ok(Self {
            sender: Mutex::new(Some(sender)),
            receiver: Mutex::new(Some(receiver)),
            capacity,
        })
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// The single consumer handle. Only the first call returns `Some`.
    pub fn consumer(&self) -> Option<QueueConsumer> {
        self.receiver
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .map(|receiver| QueueConsumer { receiver })
    }

    /// Waits for space when the queue is full. A closed queue is logged and
    /// reported through the returned status, never as an error.
    pub async fn enqueue(&self, item: WorkItem) -> EnqueueStatus {
        let Some(sender) = self.sender() else {
            tracing::warn!(label = item.label(), "work queue is closed, work item discarded");
            return EnqueueStatus::Closed;
        };

        match sender.try_send(item) {
            Ok(()) => EnqueueStatus::Enqueued,
            Err(TrySendError::Full(item)) => {
                tracing::debug!(
                    label = item.label(),
                    capacity = self.capacity,
                    "work queue full, waiting for space"
                );
                match sender.send(item).await {
                    Ok(()) => EnqueueStatus::Enqueued,
                    Err(mpsc::error::SendError(item)) => {
                        tracing::warn!(label = item.label(), "work queue closed while waiting, work item discarded");
                        EnqueueStatus::Closed
                    }
                }
            }
            Err(TrySendError::Closed(item)) => {
                tracing::warn!(label = item.label(), "work queue has no consumer, work item discarded");
                EnqueueStatus::Closed
            }
        }
    }

    /// Stops accepting new items. Items already queued are still delivered.
    pub fn close(&self) {
        let closed = self
            .sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some();
        if closed {
            tracing::info!("work queue closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender().is_none_or(|sender| sender.is_closed())
    }

    fn sender(&self) -> Option<mpsc::Sender<WorkItem>> {
        self.sender
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

pub struct QueueConsumer {
    receiver: mpsc::Receiver<WorkItem>,
}

impl QueueConsumer {
    /// Waits for the next item. Cancellation of `shutdown` yields
    /// [`FolioError::Cancelled`] and takes priority over pending items.
    pub async fn dequeue(&mut self, shutdown: &CancellationToken) -> Result<Dequeued> {
        tokio::select! {
            biased;
            () = shutdown.cancelled() => Err(FolioError::Cancelled),
            item = self.receiver.recv() => Ok(item.map_or(Dequeued::Closed, Dequeued::Item)),
        }
    }

    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}
