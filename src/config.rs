use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Default Ollama endpoint (the local server's standard port).
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";
/// Default model used for every generation request.
pub const DEFAULT_MODEL: &str = "llama3.1:8b";
/// Number of jobs allowed in flight at once during a batch.
pub const DEFAULT_WORKERS: usize = 4;
/// Per-request timeout for batch runs. Generous because the server is
/// handling several concurrent generations.
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;
/// Per-request timeout for the single-prompt mode.
pub const SINGLE_PROMPT_TIMEOUT_SECS: u64 = 60;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. CLI flags
/// override individual fields after loading.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the Ollama server (no trailing path).
    pub ollama_url: String,
    /// Model identifier sent with each request.
    pub model: String,
    /// Maximum number of concurrent jobs.
    pub workers: usize,
    /// Timeout applied to each generation request.
    pub request_timeout: Duration,
    /// Newline-separated topic list.
    pub topics_file: PathBuf,
    /// Directory that receives one file per successful topic.
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ollama_url: DEFAULT_OLLAMA_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            workers: DEFAULT_WORKERS,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            topics_file: PathBuf::from("topics.txt"),
            output_dir: PathBuf::from("text-files"),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to the
    /// defaults for anything unset.
    ///
    /// Only parse errors are reported here. Call [`Config::validate`] once
    /// CLI overrides have been applied.
    pub fn load() -> Result<Self> {
        let defaults = Self::default();

        let workers = match env::var("WHATIS_WORKERS") {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("WHATIS_WORKERS must be a positive integer, got {raw:?}"))?,
            Err(_) => defaults.workers,
        };

        let request_timeout = match env::var("WHATIS_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(raw.trim().parse::<u64>().with_context(|| {
                format!("WHATIS_TIMEOUT_SECS must be a number of seconds, got {raw:?}")
            })?),
            Err(_) => defaults.request_timeout,
        };

        Ok(Self {
            ollama_url: env::var("OLLAMA_URL").unwrap_or(defaults.ollama_url),
            model: env::var("WHATIS_MODEL").unwrap_or(defaults.model),
            workers,
            request_timeout,
            topics_file: env::var("WHATIS_TOPICS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.topics_file),
            output_dir: env::var("WHATIS_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        })
    }

    /// Reject settings the batch driver can't run with.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            anyhow::bail!("Worker count must be at least 1 (set WHATIS_WORKERS or --workers)");
        }
        if self.request_timeout.is_zero() {
            anyhow::bail!("Request timeout must be at least 1 second (set WHATIS_TIMEOUT_SECS)");
        }
        if self.model.trim().is_empty() {
            anyhow::bail!("Model name is empty. Set WHATIS_MODEL or pass --model.");
        }
        Ok(())
    }
}
