pub mod document;
pub mod id;
pub mod search;

pub use document::{DocumentRecord, DocumentType};
pub use id::DocId;
pub use search::{DEFAULT_LIMIT, MAX_LIMIT, SearchQuery, SearchResult};
