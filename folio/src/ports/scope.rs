use async_trait::async_trait;

use crate::error::Result;
use crate::queue::JobScope;

/// Hands the worker a fresh set of per-item resources for every work item.
#[async_trait]
pub trait ScopeFactory: Send + Sync {
    async fn create_scope(&self) -> Result<JobScope>;
}
