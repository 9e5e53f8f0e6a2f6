use thiserror::Error;

#[derive(Error, Debug)]
pub enum FolioError {
    #[error("Unsupported document type: {0} (only PDF or DOCX are allowed)")]
    UnsupportedDocumentType(String),

    #[error("Empty upload: {0}")]
    EmptyUpload(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Queue capacity must be positive, got {0}")]
    InvalidCapacity(usize),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Index is already owned by another writer: {0}")]
    IndexLocked(String),

    #[error("Index engine has been shut down")]
    IndexClosed,

    #[error("Index error: {0}")]
    Index(#[from] tantivy::TantivyError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Background task failed: {0}")]
    Task(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl FolioError {
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::DocumentNotFound(_) => 1,
            Self::UnsupportedDocumentType(_) | Self::EmptyUpload(_) => 2,
            Self::InvalidCapacity(_) | Self::Config(_) => 3,
            Self::IndexLocked(_) | Self::IndexClosed | Self::Index(_) => 4,
            Self::Cancelled => 5,
            Self::Task(_) | Self::Io(_) | Self::Serialization(_) => 10,
        }
    }

    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<tokio::task::JoinError> for FolioError {
    fn from(e: tokio::task::JoinError) -> Self {
        if e.is_cancelled() {
            Self::Cancelled
        } else {
            Self::Task(e.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, FolioError>;
