mod ingestion;
mod pipeline;
mod scopes;
mod search;

pub use ingestion::{IngestionCoordinator, SubmitOutcome, UploadFile, UploadSummary};
pub use pipeline::{index_document_job, process_document};
pub use scopes::PipelineScopes;
pub use search::SearchService;
