//! Run configuration
//!
//! Built once at process entry: defaults, then an optional YAML file named
//! by `SCRAPER_CONFIG`, then individual environment variables. The result is
//! immutable and passed by reference to every component.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

/// Environment variable naming an optional YAML config file
pub const CONFIG_PATH_ENV: &str = "SCRAPER_CONFIG";

/// How the output file grows between runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Keep an ordered collection and append each new record
    Append,
    /// Overwrite the file with the latest record only
    Single,
}

impl FromStr for OutputMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "append" | "collection" => Ok(OutputMode::Append),
            "single" | "overwrite" => Ok(OutputMode::Single),
            other => Err(format!("unknown output mode '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Run browser in headless mode
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Attempts before giving up (at least 1)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Wait for the page lifecycle after navigation starts
    #[serde(default = "default_page_load_timeout_ms")]
    pub page_load_timeout_ms: u64,

    /// Bound on the navigation request itself
    #[serde(default = "default_navigation_timeout_ms")]
    pub navigation_timeout_ms: u64,

    /// Per-call bound on count / visibility / click
    #[serde(default = "default_interaction_timeout_ms")]
    pub interaction_timeout_ms: u64,

    #[serde(default = "default_output_file")]
    pub output_file: PathBuf,

    #[serde(default = "default_output_mode")]
    pub output_mode: OutputMode,

    /// Replace earlier records with the same source URL instead of appending
    /// alongside them
    #[serde(default)]
    pub dedupe_by_url: bool,

    #[serde(default)]
    pub debug: bool,

    /// Retry `n` waits `n * retry_backoff_ms` before starting
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    #[serde(default = "default_scroll_steps")]
    pub scroll_steps: u32,

    #[serde(default = "default_scroll_settle_ms")]
    pub scroll_settle_ms: u64,

    /// Rendered markup shorter than this counts as a failed navigation
    #[serde(default = "default_min_html_length")]
    pub min_html_length: usize,

    #[serde(default)]
    pub window: WindowConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_width")]
    pub width: u32,

    #[serde(default = "default_window_height")]
    pub height: u32,
}

fn default_headless() -> bool {
    true
}
fn default_max_retries() -> u32 {
    3
}
fn default_page_load_timeout_ms() -> u64 {
    30_000
}
fn default_navigation_timeout_ms() -> u64 {
    45_000
}
fn default_interaction_timeout_ms() -> u64 {
    3_000
}
fn default_output_file() -> PathBuf {
    PathBuf::from("profiles.json")
}
fn default_output_mode() -> OutputMode {
    OutputMode::Append
}
fn default_retry_backoff_ms() -> u64 {
    2_000
}
fn default_scroll_steps() -> u32 {
    8
}
fn default_scroll_settle_ms() -> u64 {
    800
}
fn default_min_html_length() -> usize {
    1_000
}
fn default_window_width() -> u32 {
    1920
}
fn default_window_height() -> u32 {
    1080
}

impl Default for Config {
    fn default() -> Self {
        Self {
            headless: default_headless(),
            max_retries: default_max_retries(),
            page_load_timeout_ms: default_page_load_timeout_ms(),
            navigation_timeout_ms: default_navigation_timeout_ms(),
            interaction_timeout_ms: default_interaction_timeout_ms(),
            output_file: default_output_file(),
            output_mode: default_output_mode(),
            dedupe_by_url: false,
            debug: false,
            retry_backoff_ms: default_retry_backoff_ms(),
            scroll_steps: default_scroll_steps(),
            scroll_settle_ms: default_scroll_settle_ms(),
            min_html_length: default_min_html_length(),
            window: WindowConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: default_window_width(),
            height: default_window_height(),
        }
    }
}

impl Config {
    /// Load from the process environment.
    pub fn load() -> anyhow::Result<Config> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Load using `lookup` in place of the process environment.
    pub fn load_with<F>(lookup: F) -> anyhow::Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base = match lookup(CONFIG_PATH_ENV) {
            Some(path) => {
                let contents = fs::read_to_string(&path)
                    .map_err(|e| anyhow::anyhow!("Failed to read config file {path}: {e}"))?;
                serde_yaml::from_str(&contents)
                    .map_err(|e| anyhow::anyhow!("Invalid config file {path}: {e}"))?
            }
            None => Config::default(),
        };
        Ok(base.with_env(lookup))
    }

    /// Overlay environment variables on top of `self`.
    ///
    /// Values that fail to parse are logged and ignored.
    pub fn with_env<F>(mut self, lookup: F) -> Config
    where
        F: Fn(&str) -> Option<String>,
    {
        override_from(&lookup, "HEADLESS", &mut self.headless, parse_bool);
        override_from(&lookup, "MAX_RETRIES", &mut self.max_retries, parse);
        override_from(&lookup, "PAGE_LOAD_TIMEOUT", &mut self.page_load_timeout_ms, parse);
        override_from(&lookup, "NAV_TIMEOUT", &mut self.navigation_timeout_ms, parse);
        override_from(&lookup, "INTERACTION_TIMEOUT", &mut self.interaction_timeout_ms, parse);
        override_from(&lookup, "OUTPUT_FILE", &mut self.output_file, |s| {
            (!s.trim().is_empty()).then(|| PathBuf::from(s.trim()))
        });
        override_from(&lookup, "OUTPUT_MODE", &mut self.output_mode, parse);
        override_from(&lookup, "DEDUPE_BY_URL", &mut self.dedupe_by_url, parse_bool);
        override_from(&lookup, "DEBUG", &mut self.debug, parse_bool);
        override_from(&lookup, "RETRY_BACKOFF_MS", &mut self.retry_backoff_ms, parse);
        override_from(&lookup, "SCROLL_STEPS", &mut self.scroll_steps, parse);
        override_from(&lookup, "SCROLL_SETTLE_MS", &mut self.scroll_settle_ms, parse);
        override_from(&lookup, "MIN_HTML_LENGTH", &mut self.min_html_length, parse);

        if self.max_retries == 0 {
            warn!("MAX_RETRIES must be at least 1; using 1");
            self.max_retries = 1;
        }
        self
    }
}

fn override_from<F, T, P>(lookup: &F, key: &str, slot: &mut T, parse: P)
where
    F: Fn(&str) -> Option<String>,
    P: Fn(&str) -> Option<T>,
{
    let Some(raw) = lookup(key) else {
        return;
    };
    match parse(&raw) {
        Some(value) => *slot = value,
        None => warn!("Ignoring unparseable {}={:?}", key, raw),
    }
}

fn parse<T: FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
