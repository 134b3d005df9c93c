use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_bool(profile: &str, key: &str, default: bool) -> bool {
    match profiled_env_opt(profile, key) {
        Some(v) => parse_bool(&v).unwrap_or(default),
        None => default,
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub pipelines: PipelinesConfig,
    pub log: LogConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `ALERTSHAPE_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("ALERTSHAPE_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            pipelines: PipelinesConfig::from_env_profiled(p),
            log: LogConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!(
            "  pipelines:   dir={}, recursive={}",
            self.pipelines.dir.display(),
            self.pipelines.recursive
        );
        tracing::info!("  log:         filter={}", self.log.filter);
    }

    /// Config as JSON, for `--json` output and debugging.
    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "profile": self.profile_label(),
            "pipelines": { "dir": self.pipelines.dir, "recursive": self.pipelines.recursive },
            "log": { "filter": self.log.filter },
        })
    }
}

// ── Pipelines ─────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelinesConfig {
    /// Directory holding rule pipeline documents.
    pub dir: PathBuf,
    /// Descend into subdirectories when scanning `dir`.
    pub recursive: bool,
}

impl PipelinesConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            dir: PathBuf::from(profiled_env_or(p, "PIPELINES_DIR", "data/pipelines")),
            recursive: profiled_env_bool(p, "PIPELINES_RECURSIVE", true),
        }
    }
}

// ── Logging ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Fallback `tracing` filter directive when `RUST_LOG` is unset.
    pub filter: String,
}

impl LogConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            filter: profiled_env_or(p, "LOG_FILTER", "info"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool("true"), Some(true));
        assert_eq!(parse_bool(" YES "), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("off"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn profile_label_defaults() {
        let cfg = Config {
            profile: String::new(),
            pipelines: PipelinesConfig {
                dir: PathBuf::from("data/pipelines"),
                recursive: true,
            },
            log: LogConfig {
                filter: "info".to_string(),
            },
        };
        assert_eq!(cfg.profile_label(), "default");
        assert_eq!(cfg.summary()["profile"], "default");
        assert_eq!(cfg.summary()["pipelines"]["recursive"], true);
    }

    #[test]
    fn profiled_lookup_prefers_prefixed_key() {
        // Unique key names keep this independent of other tests' env.
        env::set_var("ALERTSHAPE_TEST_PROBE_KEY", "plain");
        env::set_var("STAGING_ALERTSHAPE_TEST_PROBE_KEY", "staged");
        assert_eq!(
            profiled_env_or("STAGING", "ALERTSHAPE_TEST_PROBE_KEY", "x"),
            "staged"
        );
        assert_eq!(profiled_env_or("", "ALERTSHAPE_TEST_PROBE_KEY", "x"), "plain");
        assert_eq!(profiled_env_or("OTHER", "ALERTSHAPE_TEST_PROBE_KEY", "x"), "plain");
        assert_eq!(profiled_env_or("OTHER", "ALERTSHAPE_TEST_MISSING_KEY", "x"), "x");
    }
}
