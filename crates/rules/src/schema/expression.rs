//! Expression models, tagged by `type`.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ThresholdCondition;

/// Server-side expression step. The `type` field selects the variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ExpressionModel {
    Math(MathExpression),
    Reduce(ReduceExpression),
    Resample(ResampleExpression),
    ClassicConditions(ClassicConditionsExpression),
    Threshold(ThresholdExpression),
    Sql(SqlExpression),
}

impl ExpressionModel {
    /// The model's own refId.
    pub fn ref_id(&self) -> &str {
        match self {
            ExpressionModel::Math(e) => &e.ref_id,
            ExpressionModel::Reduce(e) => &e.ref_id,
            ExpressionModel::Resample(e) => &e.ref_id,
            ExpressionModel::ClassicConditions(e) => &e.ref_id,
            ExpressionModel::Threshold(e) => &e.ref_id,
            ExpressionModel::Sql(e) => &e.ref_id,
        }
    }

    /// Wire name of the expression type.
    pub fn type_name(&self) -> &'static str {
        match self {
            ExpressionModel::Math(_) => "math",
            ExpressionModel::Reduce(_) => "reduce",
            ExpressionModel::Resample(_) => "resample",
            ExpressionModel::ClassicConditions(_) => "classic_conditions",
            ExpressionModel::Threshold(_) => "threshold",
            ExpressionModel::Sql(_) => "sql",
        }
    }

    pub fn as_reduce(&self) -> Option<&ReduceExpression> {
        match self {
            ExpressionModel::Reduce(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_threshold(&self) -> Option<&ThresholdExpression> {
        match self {
            ExpressionModel::Threshold(e) => Some(e),
            _ => None,
        }
    }
}

// ── Reduce ───────────────────────────────────────────────────────────

/// Collapses each series of its input into a single number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReduceExpression {
    #[serde(default)]
    pub ref_id: String,
    /// RefId of the input query.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reducer: Option<ReducerFunction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<ReduceSettings>,
}

impl ReduceExpression {
    /// Declared numeric-handling mode, if any.
    pub fn mode(&self) -> Option<ReducerMode> {
        self.settings.as_ref().and_then(|s| s.mode)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReduceSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<ReducerMode>,
    /// Substitute for non-numbers under [`ReducerMode::ReplaceNonNumbers`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replace_with_value: Option<f64>,
}

/// How a reduction treats NaN, null and other non-numeric points.
///
/// `Strict` is persisted as the empty string, the only spelling the alerting
/// backend accepts; `strict` is read as an alias for hand-written files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReducerMode {
    #[serde(rename = "", alias = "strict")]
    Strict,
    #[serde(rename = "replaceNN")]
    ReplaceNonNumbers,
    #[serde(rename = "dropNN")]
    DropNonNumbers,
}

impl fmt::Display for ReducerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReducerMode::Strict => write!(f, "strict"),
            ReducerMode::ReplaceNonNumbers => write!(f, "replaceNN"),
            ReducerMode::DropNonNumbers => write!(f, "dropNN"),
        }
    }
}

/// Reduction function applied by a reduce step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReducerFunction {
    #[default]
    Last,
    Mean,
    Min,
    Max,
    Sum,
    Count,
    Median,
}

impl fmt::Display for ReducerFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReducerFunction::Last => "last",
            ReducerFunction::Mean => "mean",
            ReducerFunction::Min => "min",
            ReducerFunction::Max => "max",
            ReducerFunction::Sum => "sum",
            ReducerFunction::Count => "count",
            ReducerFunction::Median => "median",
        };
        f.write_str(name)
    }
}

// ── Threshold ────────────────────────────────────────────────────────

/// Compares its input against one or more evaluator conditions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdExpression {
    #[serde(default)]
    pub ref_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Vec<ThresholdCondition>>,
}

impl ThresholdExpression {
    /// Index of the first condition carrying an unload evaluator.
    pub fn unload_evaluator_index(&self) -> Option<usize> {
        self.conditions
            .as_deref()?
            .iter()
            .position(|c| c.unload_evaluator.is_some())
    }
}

// ── Other expression kinds ───────────────────────────────────────────

/// Arithmetic over other queries, e.g. `$A * 100`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MathExpression {
    #[serde(default)]
    pub ref_id: String,
    #[serde(default)]
    pub expression: String,
}

/// Realigns a series onto a fixed window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResampleExpression {
    #[serde(default)]
    pub ref_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downsampler: Option<ReducerFunction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upsampler: Option<String>,
}

/// Legacy condition list combined with and/or operators.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClassicConditionsExpression {
    #[serde(default)]
    pub ref_id: String,
    #[serde(default)]
    pub conditions: Vec<ThresholdCondition>,
}

/// SQL over the results of other queries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SqlExpression {
    #[serde(default)]
    pub ref_id: String,
    #[serde(default)]
    pub expression: String,
}
