use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::extract::{ExtractOptions, QuotePriority};
use crate::retry::{Backoff, RetryPolicy};

/// Path-extraction settings (`[extract]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Which quote style wins when a line contains both.
    pub quote_priority: QuotePriority,
    /// Prepend "/" to literals that do not start with one.
    pub leading_slash: bool,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            quote_priority: QuotePriority::SingleFirst,
            leading_slash: true,
        }
    }
}

impl ExtractConfig {
    pub fn options(&self) -> ExtractOptions {
        ExtractOptions {
            quote_priority: self.quote_priority,
            leading_slash: self.leading_slash,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    #[default]
    Fixed,
    Exponential,
}

/// Retry policy parameters (`[retry]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts per reference (including the first).
    pub max_attempts: u32,
    /// Delay in seconds between attempts (base delay for exponential backoff).
    pub delay_secs: f64,
    pub backoff: BackoffKind,
    /// Upper bound for exponential backoff, in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay_secs: 5.0,
            backoff: BackoffKind::Fixed,
            max_delay_secs: 30,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        let delay = Duration::from_secs_f64(self.delay_secs.max(0.0));
        let backoff = match self.backoff {
            BackoffKind::Fixed => Backoff::Fixed(delay),
            BackoffKind::Exponential => Backoff::Exponential {
                base: delay,
                max: Duration::from_secs(self.max_delay_secs),
            },
        };
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            backoff,
        }
    }
}

/// HTTP transfer settings (`[http]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_secs: u64,
    /// Whole-transfer timeout.
    pub timeout_secs: u64,
    /// Receive buffer size; the body is written to disk one chunk at a time.
    pub chunk_size: usize,
    /// Fail a download whose byte count disagrees with Content-Length.
    pub verify_length: bool,
    pub follow_redirects: bool,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 15,
            timeout_secs: 300,
            chunk_size: 4096,
            verify_length: true,
            follow_redirects: true,
            user_agent: format!("depfetch/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Recursive crawl settings (`[crawl]` section).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Files of this size or larger are not scanned.
    pub max_file_bytes: u64,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 1024 * 1024,
        }
    }
}

/// Global configuration loaded from `~/.config/depfetch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DepfetchConfig {
    /// Literal substrings that mark a line as a reference.
    pub keywords: Vec<String>,
    /// File name (inside the output root) of the unparsable-reference journal.
    pub rejection_log: String,
    /// File name (inside the output root) of the failed-request journal.
    pub bad_request_log: String,
    pub extract: ExtractConfig,
    pub retry: RetryConfig,
    pub http: HttpConfig,
    pub crawl: CrawlConfig,
}

impl Default for DepfetchConfig {
    fn default() -> Self {
        Self {
            keywords: vec!["include".to_string(), "require".to_string()],
            rejection_log: "not_parsed.txt".to_string(),
            bad_request_log: "bad_requests.txt".to_string(),
            extract: ExtractConfig::default(),
            retry: RetryConfig::default(),
            http: HttpConfig::default(),
            crawl: CrawlConfig::default(),
        }
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("depfetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<DepfetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = DepfetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    load_from(&path)
}

/// Load configuration from an explicit file. Missing keys take their defaults.
pub fn load_from(path: &Path) -> Result<DepfetchConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let cfg: DepfetchConfig = toml::from_str(&data)
        .with_context(|| format!("invalid config {}", path.display()))?;
    Ok(cfg)
}

/// Splits a comma-separated keyword list, dropping empty items.
pub fn parse_keywords(list: &str) -> Vec<String> {
    list.split(',')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}
