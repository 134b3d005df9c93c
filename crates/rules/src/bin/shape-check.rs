//! shape-check — report which alert rule pipelines fit the simple-condition editor.
//!
//! With file arguments, each file is checked. Without, the configured
//! pipelines directory (`PIPELINES_DIR`) is scanned.

use std::path::PathBuf;

use clap::Parser;
use tracing::info;

use alertshape_core::{load_dotenv, Config};
use alertshape_rules::loader::PipelineLoader;
use alertshape_rules::report::{scan_reports, PipelineReport, Verdict};

// ── CLI ─────────────────────────────────────────────────────────────

/// Classify rule pipelines as simple-condition or advanced.
#[derive(Parser, Debug)]
#[command(name = "shape-check", version, about)]
struct Cli {
    /// Pipeline files to check. When empty, the pipelines directory is scanned.
    paths: Vec<PathBuf>,

    /// Directory to scan instead of the configured one.
    #[arg(long)]
    dir: Option<PathBuf>,

    /// Emit JSON (active config plus one entry per pipeline) instead of text lines.
    #[arg(long)]
    json: bool,

    /// Exit non-zero when any file fails to load.
    #[arg(long, env = "SHAPE_CHECK_STRICT")]
    strict: bool,
}

// ── main ────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    load_dotenv();
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.filter)),
        )
        .init();

    let cli = Cli::parse();
    config.log_summary();

    let reports = if cli.paths.is_empty() {
        scan_dir(&config, cli.dir)?
    } else {
        check_files(&cli.paths)
    };

    if cli.json {
        let output = serde_json::json!({
            "config": config.summary(),
            "pipelines": reports,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for report in &reports {
            println!("{}", report.line());
        }
    }

    let failed = reports.iter().filter(|r| r.is_error()).count();
    let simple = reports
        .iter()
        .filter(|r| matches!(r.verdict, Verdict::Simple { .. }))
        .count();
    info!(total = reports.len(), simple, failed, "shape check complete");

    if cli.strict && failed > 0 {
        anyhow::bail!("{} pipeline file(s) failed to load", failed);
    }
    Ok(())
}

fn check_files(paths: &[PathBuf]) -> Vec<PipelineReport> {
    paths
        .iter()
        .map(|path| match PipelineLoader::load_file(path) {
            Ok(pipeline) => PipelineReport::for_pipeline(path, &pipeline),
            Err(e) => PipelineReport::failed(path, e),
        })
        .collect()
}

fn scan_dir(config: &Config, dir: Option<PathBuf>) -> anyhow::Result<Vec<PipelineReport>> {
    let loader = match dir {
        Some(dir) => PipelineLoader::new(dir).with_recursive(config.pipelines.recursive),
        None => PipelineLoader::from_config(&config.pipelines),
    };
    info!(path = %loader.pipelines_dir().display(), "scanning pipelines");
    Ok(scan_reports(&loader)?)
}
