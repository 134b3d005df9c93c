//! Editor-side model of a simple condition.
//!
//! A [`SimpleCondition`] is what the simplified editor shows: which reduction
//! to apply ("when") and the threshold evaluator ("is above 0"). It can be
//! read out of a matching pipeline and turned back into the canonical
//! reduce + threshold expression pair.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matcher::SimpleShape;
use crate::schema::{
    Evaluator, EvalFunction, ExpressionModel, ExpressionQuery, ReduceExpression, ReduceSettings,
    ReducerFunction, ReducerMode, SimpleConditionIdentifier as Id, ThresholdCondition,
    ThresholdExpression,
};

/// Invalid evaluator parameters for a simple condition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConditionError {
    #[error("'{function}' takes {expected} threshold parameter(s), got {got}")]
    Arity {
        function: EvalFunction,
        expected: usize,
        got: usize,
    },

    #[error("threshold parameter {index} is not a finite number")]
    NonFinite { index: usize },
}

/// Reducer plus threshold evaluator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SimpleCondition {
    pub when_field: ReducerFunction,
    pub evaluator: Evaluator,
}

impl SimpleCondition {
    /// Build a condition, checking the evaluator has the params its function reads.
    pub fn new(when_field: ReducerFunction, evaluator: Evaluator) -> Result<Self, ConditionError> {
        let expected = evaluator.kind.arity();
        if evaluator.params.len() != expected {
            return Err(ConditionError::Arity {
                function: evaluator.kind,
                expected,
                got: evaluator.params.len(),
            });
        }
        if let Some(index) = evaluator.params.iter().position(|p| !p.is_finite()) {
            return Err(ConditionError::NonFinite { index });
        }
        Ok(Self {
            when_field,
            evaluator,
        })
    }

    /// Read the condition out of a pipeline already known to match.
    pub fn from_shape(shape: &SimpleShape<'_>) -> Self {
        Self {
            when_field: shape.reducer.reducer.unwrap_or_default(),
            evaluator: first_evaluator(shape.threshold).unwrap_or_default(),
        }
    }

    /// Read the condition from the canonical `B` / `C` expressions.
    ///
    /// Missing pieces fall back to the defaults (`last`, `gt 0`), so this also
    /// seeds the editor for pipelines that are only partially set up.
    pub fn from_expressions(expressions: &[ExpressionQuery]) -> Self {
        let reducer = expressions
            .iter()
            .filter(|q| q.ref_id == Id::REDUCER_ID)
            .find_map(|q| q.model.as_reduce());
        let threshold = expressions
            .iter()
            .filter(|q| q.ref_id == Id::THRESHOLD_ID)
            .find_map(|q| q.model.as_threshold());

        Self {
            when_field: reducer.and_then(|r| r.reducer).unwrap_or_default(),
            evaluator: threshold.and_then(first_evaluator).unwrap_or_default(),
        }
    }

    /// Canonical `[B reduce(A, strict), C threshold(B)]` expressions.
    pub fn to_expressions(&self) -> Vec<ExpressionQuery> {
        let reduce = ExpressionModel::Reduce(ReduceExpression {
            ref_id: Id::REDUCER_ID.to_string(),
            expression: Some(Id::QUERY_ID.to_string()),
            reducer: Some(self.when_field),
            settings: Some(ReduceSettings {
                mode: Some(ReducerMode::Strict),
                replace_with_value: None,
            }),
        });
        let threshold = ExpressionModel::Threshold(ThresholdExpression {
            ref_id: Id::THRESHOLD_ID.to_string(),
            expression: Some(Id::REDUCER_ID.to_string()),
            conditions: Some(vec![ThresholdCondition::new(
                self.evaluator.clone(),
                Id::REDUCER_ID,
            )]),
        });
        vec![ExpressionQuery::new(reduce), ExpressionQuery::new(threshold)]
    }
}

fn first_evaluator(threshold: &ThresholdExpression) -> Option<Evaluator> {
    threshold
        .conditions
        .as_ref()?
        .first()
        .map(|c| c.evaluator.clone())
}
