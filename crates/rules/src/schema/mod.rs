//! Typed schema for alert rule query pipelines.
//!
//! - `DataQuery` / `ExpressionQuery`: the two kinds of alert query
//! - `ExpressionModel`: expression steps tagged by `type` (reduce, threshold, ...)
//! - `RulePipeline`: the on-disk document grouping a rule's queries
//! - `SimpleConditionIdentifier`: canonical refIds of the simple shape

mod expression;
mod identifier;
mod metadata;
mod pipeline;
mod query;
mod threshold;

pub use expression::*;
pub use identifier::*;
pub use metadata::*;
pub use pipeline::*;
pub use query::*;
pub use threshold::*;

#[cfg(test)]
mod tests;
