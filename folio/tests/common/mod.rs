// Shared helpers for pipeline integration tests

#![allow(dead_code)]

#[path = "../../src/extract/fixtures.rs"]
pub mod docx_fixtures;
pub mod fixtures;
pub mod harness;

pub use docx_fixtures::docx;

pub use fixtures::*;
pub use harness::*;
