//! Configuration management for crawlhub
//!
//! This module handles loading and validating configuration from a TOML
//! file and environment variables. Every source gets its own section with
//! its queries and its rate/retry policy.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::{SortOrder, SourceQuery, SourceType};
use crate::utils::error::ConfigError;
use crate::utils::rate_limit::RateLimitConfig;
use crate::utils::retry::{Backoff, RetryConfig};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Crawler-wide HTTP settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Record store configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Configured sources, crawled in this order
    #[serde(default)]
    pub sources: Vec<SourceConfig>,
}

/// Crawler-wide configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Identifying user agent sent with every request
    pub user_agent: String,

    /// Contact address appended to the user agent and sent as `From`
    pub contact: Option<String>,

    /// Upper bound on raw HTTP requests per second across all sources
    pub requests_per_second: u32,

    /// Token for the GitHub search API (raises its rate limit)
    #[serde(skip_serializing)]
    pub github_token: Option<String>,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("crawlhub/{}", env!("CARGO_PKG_VERSION")),
            contact: None,
            requests_per_second: 2,
            github_token: None,
        }
    }
}

/// Record store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Persist crawl results after each run
    pub enabled: bool,

    /// SQLite database path
    pub sqlite_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sqlite_path: PathBuf::from("data/records.db"),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

/// Rate/retry settings for one source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,

    pub max_retries: u32,

    /// Delay before the first retry
    pub retry_delay_ms: u64,

    pub backoff: Backoff,

    /// Pause between consecutive queries of this source, and before the next source
    pub request_delay_ms: u64,

    pub requests_per_minute: Option<u32>,

    pub requests_per_hour: Option<u32>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            max_retries: 3,
            retry_delay_ms: 1000,
            backoff: Backoff::Exponential,
            request_delay_ms: 1000,
            requests_per_minute: None,
            requests_per_hour: None,
        }
    }
}

impl PolicyConfig {
    /// Politeness defaults for each remote API
    pub fn default_for(kind: SourceType) -> Self {
        let base = Self::default();
        match kind {
            // arXiv asks clients to wait three seconds between calls
            SourceType::Arxiv => Self {
                request_delay_ms: 3000,
                requests_per_minute: Some(20),
                ..base
            },
            // unauthenticated search API allows 10 requests per minute
            SourceType::Github => Self {
                requests_per_minute: Some(10),
                ..base
            },
            SourceType::StackOverflow => Self {
                requests_per_minute: Some(30),
                requests_per_hour: Some(300),
                ..base
            },
            SourceType::Rss => Self {
                requests_per_minute: Some(30),
                ..base
            },
            SourceType::PapersWithCode => Self {
                request_delay_ms: 0,
                ..base
            },
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig {
            max_retries: self.max_retries,
            base_delay_ms: self.retry_delay_ms,
            max_delay_ms: match self.backoff {
                Backoff::Fixed => self.retry_delay_ms,
                Backoff::Exponential => RetryConfig::default().max_delay_ms.max(self.retry_delay_ms),
            },
            backoff: self.backoff,
        }
    }

    pub fn rate_limit(&self) -> RateLimitConfig {
        RateLimitConfig::new(self.requests_per_minute, self.requests_per_hour)
    }
}

/// One configured source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Unique name used in reports and on the command line
    pub name: String,

    pub kind: SourceType,

    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Use the deterministic generator instead of the live API
    #[serde(default)]
    pub synthetic: bool,

    /// Override of the API base URL
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub policy: Option<PolicyConfig>,

    #[serde(default)]
    pub queries: Vec<SourceQuery>,
}

fn default_true() -> bool {
    true
}

impl SourceConfig {
    pub fn new(name: impl Into<String>, kind: SourceType, queries: Vec<SourceQuery>) -> Self {
        Self {
            name: name.into(),
            kind,
            enabled: true,
            synthetic: kind == SourceType::PapersWithCode,
            base_url: None,
            policy: None,
            queries,
        }
    }

    pub fn with_policy(mut self, policy: PolicyConfig) -> Self {
        self.policy = Some(policy);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Explicit policy, or the kind's defaults
    pub fn effective_policy(&self) -> PolicyConfig {
        self.policy
            .clone()
            .unwrap_or_else(|| PolicyConfig::default_for(self.kind))
    }

    /// Check the queries without touching the network
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::missing("<unnamed>", "name"));
        }
        if self.queries.is_empty() {
            return Err(ConfigError::missing(&self.name, "queries"));
        }
        for query in &self.queries {
            validate_query(&self.name, self.kind, query)?;
        }
        if self.effective_policy().timeout_ms == 0 {
            return Err(ConfigError::invalid(
                format!("{}.policy.timeout_ms", self.name),
                "must be greater than 0",
            ));
        }
        Ok(())
    }
}

/// Validate one query for a source kind
pub fn validate_query(
    source_name: &str,
    kind: SourceType,
    query: &SourceQuery,
) -> Result<(), ConfigError> {
    if query.search.trim().is_empty() {
        return Err(ConfigError::missing(source_name, "search"));
    }
    if query.max_results == 0 {
        return Err(ConfigError::invalid(
            format!("{source_name}.max_results"),
            "must be greater than 0",
        ));
    }
    if kind == SourceType::Rss {
        url::Url::parse(&query.search).map_err(|e| {
            ConfigError::invalid(format!("{source_name}.search"), format!("feed URL: {e}"))
        })?;
    }
    Ok(())
}

impl Config {
    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// File (or defaults) plus environment overrides, validated
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    /// Overlay `CRAWLHUB_*` and `GITHUB_TOKEN` environment variables
    pub fn apply_env(&mut self) {
        if let Ok(user_agent) = std::env::var("CRAWLHUB_USER_AGENT") {
            self.crawler.user_agent = user_agent;
        }
        if let Ok(contact) = std::env::var("CRAWLHUB_CONTACT") {
            self.crawler.contact = Some(contact);
        }
        if let Some(rps) = std::env::var("CRAWLHUB_REQUESTS_PER_SECOND")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
        {
            self.crawler.requests_per_second = rps;
        }
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            if !token.is_empty() {
                self.crawler.github_token = Some(token);
            }
        }
        if let Ok(path) = std::env::var("CRAWLHUB_SQLITE_PATH") {
            self.storage.sqlite_path = PathBuf::from(path);
        }
        if let Some(enabled) = std::env::var("CRAWLHUB_STORAGE_ENABLED")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
        {
            self.storage.enabled = enabled;
        }
        if let Ok(level) = std::env::var("CRAWLHUB_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("CRAWLHUB_LOG_FORMAT") {
            self.logging.format = format;
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.crawler.requests_per_second == 0 {
            return Err(ConfigError::invalid(
                "crawler.requests_per_second",
                "must be greater than 0",
            ));
        }
        if self.crawler.user_agent.trim().is_empty() {
            return Err(ConfigError::missing("crawler", "user_agent"));
        }
        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(ConfigError::invalid(
                "logging.format",
                format!("expected text or json, got {}", self.logging.format),
            ));
        }

        let mut names = HashSet::new();
        for source in &self.sources {
            source.validate()?;
            if !names.insert(source.name.as_str()) {
                return Err(ConfigError::invalid(
                    "sources.name",
                    format!("duplicate source name '{}'", source.name),
                ));
            }
        }

        Ok(())
    }

    /// Find a configured source by name
    pub fn source(&self, name: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|s| s.name == name)
    }

    /// Sources that take part in a full crawl
    pub fn enabled_sources(&self) -> impl Iterator<Item = &SourceConfig> {
        self.sources.iter().filter(|s| s.enabled)
    }

    /// Full user agent including the contact address
    pub fn user_agent(&self) -> String {
        match &self.crawler.contact {
            Some(contact) => format!("{} (+mailto:{contact})", self.crawler.user_agent),
            None => self.crawler.user_agent.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            crawler: CrawlerConfig::default(),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
            sources: vec![
                SourceConfig::new(
                    "arxiv-ai",
                    SourceType::Arxiv,
                    vec![SourceQuery::new("cat:cs.AI")
                        .with_max_results(25)
                        .with_sort("submittedDate", SortOrder::Descending)],
                ),
                SourceConfig::new(
                    "github-rust",
                    SourceType::Github,
                    vec![SourceQuery::new("language:rust")
                        .with_max_results(25)
                        .with_sort("stars", SortOrder::Descending)],
                ),
                SourceConfig::new(
                    "hacker-news",
                    SourceType::Rss,
                    vec![SourceQuery::new("https://hnrss.org/frontpage").with_max_results(30)],
                ),
                SourceConfig::new(
                    "paperswithcode",
                    SourceType::PapersWithCode,
                    vec![SourceQuery::new("machine learning").with_max_results(10)],
                ),
                SourceConfig::new(
                    "stackoverflow-rust",
                    SourceType::StackOverflow,
                    vec![SourceQuery::new("rust")
                        .with_max_results(20)
                        .with_sort("activity", SortOrder::Descending)],
                ),
            ],
        }
    }
}
