//! Core [`PipelineLoader`] struct: filesystem-backed pipeline loading.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use alertshape_core::PipelinesConfig;
use tracing::{debug, info, warn};

use crate::schema::{RulePipeline, API_VERSION, PIPELINE_KIND};

use super::error::{LoadResult, LoadStatus, Result, RuleError};

/// On-disk encoding of a pipeline file, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Yaml,
    Json,
}

impl Format {
    fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yml") | Some("yaml") => Some(Format::Yaml),
            Some("json") => Some(Format::Json),
            _ => None,
        }
    }
}

/// Filesystem-backed pipeline loader.
///
/// Scans a directory for `*.yml` / `*.yaml` / `*.json` files, deserializes
/// them into [`RulePipeline`] documents and keeps an in-memory map keyed by
/// pipeline ID.
pub struct PipelineLoader {
    /// Root directory containing pipeline files.
    pipelines_dir: PathBuf,
    /// Descend into subdirectories during [`load_all`](Self::load_all).
    recursive: bool,
    /// In-memory store of all pipelines keyed by `metadata.id`.
    pipelines: Arc<RwLock<HashMap<String, RulePipeline>>>,
}

impl PipelineLoader {
    /// Create a recursive loader for the given directory.
    pub fn new(pipelines_dir: PathBuf) -> Self {
        Self {
            pipelines_dir,
            recursive: true,
            pipelines: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Create a loader from workspace config.
    pub fn from_config(config: &PipelinesConfig) -> Self {
        Self::new(config.dir.clone()).with_recursive(config.recursive)
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Scan the pipelines directory and load every supported file.
    ///
    /// Dotfiles and unsupported extensions are skipped. Parse errors are
    /// reported per-file but do not abort the scan. A missing directory
    /// yields an empty result.
    ///
    /// A file whose `metadata.id` was already loaded earlier in the same scan
    /// is reported as `Failed` and does not replace the first document.
    pub fn load_all(&self) -> Result<Vec<LoadResult>> {
        let mut results = Vec::new();
        let mut seen = HashMap::new();
        self.scan_dir(&self.pipelines_dir, &mut seen, &mut results)?;
        Ok(results)
    }

    fn scan_dir(
        &self,
        dir: &Path,
        seen: &mut HashMap<String, PathBuf>,
        results: &mut Vec<LoadResult>,
    ) -> Result<()> {
        let entries = match fs::read_dir(dir) {
            Ok(e) => e,
            Err(e) => {
                warn!(path = %dir.display(), error = %e, "failed to read directory");
                return Ok(());
            }
        };

        // Sorted so results come back in a stable order.
        let mut paths = entries
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        paths.sort();

        for path in paths {
            // Skip dotfiles/dotdirs
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if name.starts_with('.') {
                    if path.is_file() {
                        results.push(LoadResult {
                            path,
                            status: LoadStatus::Skipped {
                                reason: "dotfile".to_string(),
                            },
                        });
                    }
                    continue;
                }
            }

            if path.is_dir() {
                if self.recursive {
                    self.scan_dir(&path, seen, results)?;
                } else {
                    debug!(path = %path.display(), "not descending into subdirectory");
                }
                continue;
            }

            if Format::from_path(&path).is_none() {
                results.push(LoadResult {
                    path,
                    status: LoadStatus::Skipped {
                        reason: "not a YAML or JSON file".to_string(),
                    },
                });
                continue;
            }

            let loaded = Self::load_file(&path).and_then(|pipeline| {
                match seen.get(&pipeline.metadata.id) {
                    Some(first) => Err(RuleError::Validation(format!(
                        "duplicate pipeline id '{}', already loaded from {}",
                        pipeline.metadata.id,
                        first.display()
                    ))),
                    None => Ok(pipeline),
                }
            });

            match loaded {
                Ok(pipeline) => {
                    let pipeline_id = pipeline.metadata.id.clone();
                    seen.insert(pipeline_id.clone(), path.clone());
                    info!(
                        pipeline_id = %pipeline_id,
                        simple = pipeline.is_simple_condition(),
                        path = %path.display(),
                        "loaded pipeline"
                    );
                    self.insert(pipeline_id.clone(), pipeline);
                    results.push(LoadResult {
                        path,
                        status: LoadStatus::Loaded { pipeline_id },
                    });
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load pipeline file");
                    results.push(LoadResult {
                        path,
                        status: LoadStatus::Failed {
                            error: e.to_string(),
                        },
                    });
                }
            }
        }

        Ok(())
    }

    fn insert(&self, id: String, pipeline: RulePipeline) {
        self.pipelines
            .write()
            .expect("pipelines lock poisoned")
            .insert(id, pipeline);
    }

    /// Parse and validate a single pipeline file.
    ///
    /// `.json` files are read as JSON, everything else as YAML.
    pub fn load_file(path: &Path) -> Result<RulePipeline> {
        let contents = fs::read_to_string(path)?;

        let pipeline: RulePipeline = match Format::from_path(path) {
            Some(Format::Json) => serde_json::from_str(&contents)?,
            _ => serde_yaml::from_str(&contents)?,
        };

        validate(&pipeline)?;
        Ok(pipeline)
    }

    /// Get the pipelines directory path.
    pub fn pipelines_dir(&self) -> &Path {
        &self.pipelines_dir
    }

    /// Get the shared map of loaded pipelines.
    pub fn pipelines(&self) -> Arc<RwLock<HashMap<String, RulePipeline>>> {
        Arc::clone(&self.pipelines)
    }

    /// Look up a loaded pipeline by id.
    pub fn get(&self, id: &str) -> Option<RulePipeline> {
        self.pipelines
            .read()
            .expect("pipelines lock poisoned")
            .get(id)
            .cloned()
    }

    /// Atomically write a pipeline to `<id>.yml`.
    ///
    /// Writes to a `.tmp` file first, then renames to the final path to
    /// avoid partial writes on crash.
    pub fn write_pipeline(&self, pipeline: &RulePipeline) -> Result<PathBuf> {
        validate(pipeline)?;

        let id = &pipeline.metadata.id;
        let final_path = self.pipelines_dir.join(format!("{}.yml", id));
        let tmp_path = self.pipelines_dir.join(format!(".{}.tmp", id));

        fs::create_dir_all(&self.pipelines_dir)?;
        let yaml = pipeline.to_yaml()?;
        fs::write(&tmp_path, yaml)?;
        fs::rename(&tmp_path, &final_path)?;

        info!(pipeline_id = %id, path = %final_path.display(), "wrote pipeline file");

        self.insert(id.clone(), pipeline.clone());
        Ok(final_path)
    }
}

fn validate(pipeline: &RulePipeline) -> Result<()> {
    if pipeline.metadata.id.is_empty() {
        return Err(RuleError::Validation(
            "pipeline metadata.id must not be empty".to_string(),
        ));
    }
    // The id doubles as the file name in `write_pipeline`.
    let id = &pipeline.metadata.id;
    if id.starts_with('.') || id.contains(['/', '\\']) {
        return Err(RuleError::Validation(format!(
            "pipeline metadata.id must be a plain file name (no path separators or leading '.'), got '{}'",
            id
        )));
    }
    if pipeline.api_version != API_VERSION {
        return Err(RuleError::Validation(format!(
            "apiVersion must be '{}', got '{}'",
            API_VERSION, pipeline.api_version
        )));
    }
    if pipeline.kind != PIPELINE_KIND {
        return Err(RuleError::Validation(format!(
            "kind must be '{}', got '{}'",
            PIPELINE_KIND, pipeline.kind
        )));
    }
    Ok(())
}
