//! Simple-condition shape matching.
//!
//! Decides whether a rule's data queries and expressions can be shown in the
//! simplified editor: exactly one data query `A`, one strict reduce `B` and
//! one threshold `C` without recovery evaluators. Anything else needs the
//! full expression editor.

use thiserror::Error;
use tracing::debug;

use crate::schema::{
    DataQuery, ExpressionModel, ExpressionQuery, ReduceExpression, ReducerMode,
    SimpleConditionIdentifier as Id, ThresholdExpression,
};

/// First check that rejected the simple-condition shape.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShapeMismatch {
    #[error("expected exactly 1 data query, found {0}")]
    DataQueryCount(usize),

    #[error("expected exactly 2 expressions, found {0}")]
    ExpressionCount(usize),

    #[error("data query refId is '{found}', expected '{}'", Id::QUERY_ID)]
    DataQueryRefId { found: String },

    #[error("no reduce expression with refId '{}'", Id::REDUCER_ID)]
    MissingReducer,

    #[error("no threshold expression with refId '{}'", Id::THRESHOLD_ID)]
    MissingThreshold,

    #[error("reduce expression mode is {}, expected strict", describe_mode(.mode))]
    ReducerNotStrict { mode: Option<ReducerMode> },

    #[error("threshold condition {index} has an unload evaluator")]
    ThresholdHasUnloadEvaluator { index: usize },
}

fn describe_mode(mode: &Option<ReducerMode>) -> String {
    match mode {
        Some(m) => m.to_string(),
        None => "unset".to_string(),
    }
}

/// Borrowed view of the three parts of a matching pipeline.
#[derive(Debug, Clone, Copy)]
pub struct SimpleShape<'a> {
    pub data: &'a DataQuery,
    pub reducer: &'a ReduceExpression,
    pub threshold: &'a ThresholdExpression,
}

/// Whether the queries can be represented as a simple condition.
pub fn is_simple_condition(data_queries: &[DataQuery], expression_queries: &[ExpressionQuery]) -> bool {
    check_simple_condition(data_queries, expression_queries).is_ok()
}

/// Run the shape checks in order and stop at the first failure.
pub fn check_simple_condition<'a>(
    data_queries: &'a [DataQuery],
    expression_queries: &'a [ExpressionQuery],
) -> Result<SimpleShape<'a>, ShapeMismatch> {
    let result = match_shape(data_queries, expression_queries);
    if let Err(reason) = &result {
        debug!(reason = %reason, "queries do not form a simple condition");
    }
    result
}

fn match_shape<'a>(
    data_queries: &'a [DataQuery],
    expression_queries: &'a [ExpressionQuery],
) -> Result<SimpleShape<'a>, ShapeMismatch> {
    let [data] = data_queries else {
        return Err(ShapeMismatch::DataQueryCount(data_queries.len()));
    };

    if expression_queries.len() != 2 {
        return Err(ShapeMismatch::ExpressionCount(expression_queries.len()));
    }

    if data.ref_id != Id::QUERY_ID {
        return Err(ShapeMismatch::DataQueryRefId {
            found: data.ref_id.clone(),
        });
    }

    // Located by type and refId, never by position.
    let reducer = expression_queries
        .iter()
        .find_map(|q| match &q.model {
            ExpressionModel::Reduce(reduce) if q.ref_id == Id::REDUCER_ID => Some(reduce),
            _ => None,
        })
        .ok_or(ShapeMismatch::MissingReducer)?;

    let threshold = expression_queries
        .iter()
        .find_map(|q| match &q.model {
            ExpressionModel::Threshold(threshold) if q.ref_id == Id::THRESHOLD_ID => Some(threshold),
            _ => None,
        })
        .ok_or(ShapeMismatch::MissingThreshold)?;

    let mode = reducer.mode();
    if mode != Some(ReducerMode::Strict) {
        return Err(ShapeMismatch::ReducerNotStrict { mode });
    }

    if let Some(index) = threshold.unload_evaluator_index() {
        return Err(ShapeMismatch::ThresholdHasUnloadEvaluator { index });
    }

    Ok(SimpleShape {
        data,
        reducer,
        threshold,
    })
}
