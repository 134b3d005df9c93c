//! Canonical refIds of the simple-condition pipeline.

/// The three refIds that anchor a simple condition.
///
/// A simple condition is always `A` (data query) → `B` (reduce) → `C` (threshold).
/// Every identity check in the matcher reads from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleConditionIdentifier;

impl SimpleConditionIdentifier {
    /// RefId of the single data query.
    pub const QUERY_ID: &'static str = "A";
    /// RefId of the reduce expression.
    pub const REDUCER_ID: &'static str = "B";
    /// RefId of the threshold expression.
    pub const THRESHOLD_ID: &'static str = "C";
}
