pub mod config;
pub mod domain;
pub mod error;
pub mod extract;
pub mod index;
pub mod logging;
pub mod ports;
pub mod queue;
pub mod services;
pub mod storage;

pub use error::{FolioError, Result};
