//! Alert rule query pipelines and simple-condition shape matching.
//!
//! This crate provides:
//! - Typed schema for data queries and expression steps (reduce, threshold, ...)
//! - A matcher deciding whether a pipeline fits the simple-condition editor
//! - The `SimpleCondition` editor model, read from and written back to expressions
//! - A filesystem loader for YAML/JSON pipeline documents

pub mod loader;
pub mod matcher;
pub mod report;
pub mod schema;
pub mod simple_condition;

pub use matcher::{check_simple_condition, is_simple_condition, ShapeMismatch, SimpleShape};
pub use simple_condition::{ConditionError, SimpleCondition};
