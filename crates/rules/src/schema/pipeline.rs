//! Rule pipeline document: the queries and expressions behind one alert rule.

use serde::{Deserialize, Serialize};

use super::{CommonMetadata, DataQuery, ExpressionQuery};
use crate::matcher::{check_simple_condition, ShapeMismatch, SimpleShape};
use crate::simple_condition::SimpleCondition;

/// Only supported `apiVersion`.
pub const API_VERSION: &str = "v1";

/// `kind` of a pipeline document.
pub const PIPELINE_KIND: &str = "RulePipeline";

/// An alert rule's query pipeline as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RulePipeline {
    #[serde(rename = "apiVersion")]
    pub api_version: String,
    pub kind: String,
    pub metadata: CommonMetadata,
    #[serde(default)]
    pub data: Vec<DataQuery>,
    #[serde(default)]
    pub expressions: Vec<ExpressionQuery>,
    /// RefId whose result fires the alert.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
}

impl RulePipeline {
    /// Whether the pipeline can be edited as a simple condition.
    pub fn is_simple_condition(&self) -> bool {
        self.check_simple_condition().is_ok()
    }

    /// Like [`is_simple_condition`](Self::is_simple_condition) but names the failed check.
    pub fn check_simple_condition(&self) -> Result<SimpleShape<'_>, ShapeMismatch> {
        check_simple_condition(&self.data, &self.expressions)
    }

    /// Editor view of the pipeline, when it has the simple shape.
    pub fn simple_condition(&self) -> Option<SimpleCondition> {
        self.check_simple_condition()
            .ok()
            .map(|shape| SimpleCondition::from_shape(&shape))
    }

    /// Serialize back to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
