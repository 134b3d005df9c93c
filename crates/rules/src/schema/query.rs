//! Alert queries: data queries against real datasources and expression steps.

use serde::{Deserialize, Serialize};

use super::ExpressionModel;

/// Datasource UID reserved for server-side expressions.
pub const EXPRESSION_DATASOURCE_UID: &str = "__expr__";

/// `queryType` carried by every expression query.
pub const EXPRESSION_QUERY_TYPE: &str = "expression";

/// Time window a query evaluates over, in seconds relative to now.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RelativeTimeRange {
    pub from: u64,
    pub to: u64,
}

/// A query against a real datasource.
///
/// The `model` is datasource-specific and kept as an opaque JSON object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DataQuery {
    pub ref_id: String,
    #[serde(default)]
    pub query_type: String,
    pub datasource_uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_time_range: Option<RelativeTimeRange>,
    pub model: serde_json::Map<String, serde_json::Value>,
}

impl DataQuery {
    /// Build a data query whose model carries the same `refId`.
    pub fn new(ref_id: impl Into<String>, datasource_uid: impl Into<String>) -> Self {
        let ref_id = ref_id.into();
        let mut model = serde_json::Map::new();
        model.insert(
            "refId".to_string(),
            serde_json::Value::String(ref_id.clone()),
        );
        Self {
            ref_id,
            query_type: String::new(),
            datasource_uid: datasource_uid.into(),
            relative_time_range: None,
            model,
        }
    }
}

/// A computed step that references other queries by refId.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionQuery {
    pub ref_id: String,
    #[serde(default = "default_expression_query_type")]
    pub query_type: String,
    #[serde(default = "default_expression_datasource_uid")]
    pub datasource_uid: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_time_range: Option<RelativeTimeRange>,
    pub model: ExpressionModel,
}

impl ExpressionQuery {
    /// Wrap a model, taking the query refId from the model.
    pub fn new(model: ExpressionModel) -> Self {
        Self {
            ref_id: model.ref_id().to_string(),
            query_type: EXPRESSION_QUERY_TYPE.to_string(),
            datasource_uid: EXPRESSION_DATASOURCE_UID.to_string(),
            relative_time_range: None,
            model,
        }
    }
}

fn default_expression_query_type() -> String {
    EXPRESSION_QUERY_TYPE.to_string()
}

fn default_expression_datasource_uid() -> String {
    EXPRESSION_DATASOURCE_UID.to_string()
}
