//! Per-pipeline verdicts printed by `shape-check`.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::loader::{LoadStatus, PipelineLoader, Result};
use crate::schema::RulePipeline;
use crate::simple_condition::SimpleCondition;

/// Which editor a pipeline can be opened in, or why it could not be read.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
    /// Fits the simple-condition editor.
    Simple { condition: SimpleCondition },
    /// Needs the full expression editor.
    Advanced { reason: String },
    /// The file did not load.
    Error { error: String },
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PipelineReport {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pipeline_id: Option<String>,
    #[serde(flatten)]
    pub verdict: Verdict,
}

impl PipelineReport {
    /// Classify a loaded pipeline.
    pub fn for_pipeline(path: &Path, pipeline: &RulePipeline) -> Self {
        let verdict = match pipeline.check_simple_condition() {
            Ok(shape) => Verdict::Simple {
                condition: SimpleCondition::from_shape(&shape),
            },
            Err(mismatch) => Verdict::Advanced {
                reason: mismatch.to_string(),
            },
        };
        Self {
            path: path.to_path_buf(),
            pipeline_id: Some(pipeline.metadata.id.clone()),
            verdict,
        }
    }

    /// Report for a file that failed to load.
    pub fn failed(path: &Path, error: impl ToString) -> Self {
        Self {
            path: path.to_path_buf(),
            pipeline_id: None,
            verdict: Verdict::Error {
                error: error.to_string(),
            },
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.verdict, Verdict::Error { .. })
    }

    /// One human-readable line.
    pub fn line(&self) -> String {
        let name = self
            .pipeline_id
            .clone()
            .unwrap_or_else(|| self.path.display().to_string());
        match &self.verdict {
            Verdict::Simple { condition } => {
                let params = condition
                    .evaluator
                    .params
                    .iter()
                    .map(|p| p.to_string())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!(
                    "{name}: simple ({} {} [{params}])",
                    condition.when_field, condition.evaluator.kind
                )
            }
            Verdict::Advanced { reason } => format!("{name}: advanced: {reason}"),
            Verdict::Error { error } => format!("{name}: error: {error}"),
        }
    }
}

/// Load every pipeline under the loader's directory and classify each file.
///
/// Skipped files produce no report; files that failed to load produce an
/// error report.
pub fn scan_reports(loader: &PipelineLoader) -> Result<Vec<PipelineReport>> {
    let mut reports = Vec::new();
    for result in loader.load_all()? {
        match result.status {
            LoadStatus::Loaded { pipeline_id } => {
                if let Some(pipeline) = loader.get(&pipeline_id) {
                    reports.push(PipelineReport::for_pipeline(&result.path, &pipeline));
                }
            }
            LoadStatus::Skipped { reason } => {
                debug!(path = %result.path.display(), reason = %reason, "skipped");
            }
            LoadStatus::Failed { error } => {
                reports.push(PipelineReport::failed(&result.path, error));
            }
        }
    }
    Ok(reports)
}
