//! Full-text index over extracted document text.
//!
//! One [`IndexEngine`] owns the underlying tantivy index and its only writer.
//! Mutations are serialized behind the engine; every search runs against a
//! point-in-time [`IndexSnapshot`].

mod engine;
mod query;
mod schema;

pub use engine::{DEFAULT_WRITER_MEMORY, IndexEngine, IndexSnapshot, MIN_WRITER_MEMORY};
