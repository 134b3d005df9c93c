//! Filesystem loader for rule pipeline documents.
//!
//! Scans a directory for YAML and JSON pipeline files and keeps the parsed
//! documents in an in-memory map keyed by `metadata.id`.

mod core;
mod error;


pub use self::core::PipelineLoader;
pub use self::error::{LoadResult, LoadStatus, Result, RuleError};
