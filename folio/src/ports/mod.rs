pub mod repository;
pub mod scope;

pub use repository::DocumentRepository;
pub use scope::ScopeFactory;
