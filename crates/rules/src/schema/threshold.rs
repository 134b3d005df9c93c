//! Threshold conditions and evaluator functions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One comparison inside a threshold (or classic conditions) step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdCondition {
    pub evaluator: Evaluator,
    /// Recovery comparison: once firing, the alert resolves only when this
    /// evaluator passes. `null` is treated the same as absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unload_evaluator: Option<Evaluator>,
    #[serde(default)]
    pub query: ConditionQuery,
    #[serde(default)]
    pub reducer: ConditionReducer,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<ConditionOperator>,
    #[serde(rename = "type", default = "default_condition_type")]
    pub kind: String,
}

impl ThresholdCondition {
    /// A `query` condition over `input` with no recovery evaluator.
    pub fn new(evaluator: Evaluator, input: impl Into<String>) -> Self {
        Self {
            evaluator,
            unload_evaluator: None,
            query: ConditionQuery {
                params: vec![input.into()],
            },
            reducer: ConditionReducer {
                params: Vec::new(),
                kind: "last".to_string(),
            },
            operator: None,
            kind: default_condition_type(),
        }
    }
}

fn default_condition_type() -> String {
    "query".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConditionQuery {
    #[serde(default)]
    pub params: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConditionReducer {
    #[serde(default)]
    pub params: Vec<serde_json::Value>,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Boolean joiner used by classic conditions (`and` / `or`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConditionOperator {
    #[serde(rename = "type")]
    pub kind: String,
}

/// Comparison function plus its numeric parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Evaluator {
    #[serde(default)]
    pub params: Vec<f64>,
    #[serde(rename = "type")]
    pub kind: EvalFunction,
}

impl Evaluator {
    pub fn new(kind: EvalFunction, params: Vec<f64>) -> Self {
        Self { params, kind }
    }
}

impl Default for Evaluator {
    /// `gt 0`, the evaluator new simple conditions start from.
    fn default() -> Self {
        Self {
            params: vec![0.0],
            kind: EvalFunction::IsAbove,
        }
    }
}

/// Supported comparison functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EvalFunction {
    #[serde(rename = "gt")]
    IsAbove,
    #[serde(rename = "lt")]
    IsBelow,
    #[serde(rename = "gte")]
    IsGreaterThanEqual,
    #[serde(rename = "lte")]
    IsLessThanEqual,
    #[serde(rename = "eq")]
    IsEqual,
    #[serde(rename = "ne")]
    IsNotEqual,
    #[serde(rename = "within_range")]
    IsWithinRange,
    #[serde(rename = "outside_range")]
    IsOutsideRange,
    #[serde(rename = "within_range_included")]
    IsWithinRangeIncluded,
    #[serde(rename = "outside_range_included")]
    IsOutsideRangeIncluded,
    #[serde(rename = "no_value")]
    HasNoValue,
}

impl EvalFunction {
    pub fn is_range(&self) -> bool {
        matches!(
            self,
            EvalFunction::IsWithinRange
                | EvalFunction::IsOutsideRange
                | EvalFunction::IsWithinRangeIncluded
                | EvalFunction::IsOutsideRangeIncluded
        )
    }

    /// Number of params the function reads.
    pub fn arity(&self) -> usize {
        match self {
            EvalFunction::HasNoValue => 0,
            f if f.is_range() => 2,
            _ => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EvalFunction::IsAbove => "gt",
            EvalFunction::IsBelow => "lt",
            EvalFunction::IsGreaterThanEqual => "gte",
            EvalFunction::IsLessThanEqual => "lte",
            EvalFunction::IsEqual => "eq",
            EvalFunction::IsNotEqual => "ne",
            EvalFunction::IsWithinRange => "within_range",
            EvalFunction::IsOutsideRange => "outside_range",
            EvalFunction::IsWithinRangeIncluded => "within_range_included",
            EvalFunction::IsOutsideRangeIncluded => "outside_range_included",
            EvalFunction::HasNoValue => "no_value",
        }
    }
}

impl fmt::Display for EvalFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
