//! Crawl orchestration across configured sources
//!
//! The [`Orchestrator`] walks its sources one after another. Each source is
//! held by a [`SourceRunner`] that owns the source's fetch client, its
//! [`RequestPolicy`] and its queries, and moves through
//! `Idle -> Fetching -> Parsing -> Succeeded | Failed`.
//!
//! A failing source never aborts the run: its [`CrawlResult`] records the
//! error and the stage it failed in, and the orchestrator moves on.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::config::{Config, SourceConfig};
use crate::crawler::{build_client, FetchClient, HttpFetcher};
use crate::dedup::DedupFilter;
use crate::error::CrawlErrorTrait;
use crate::models::{CrawlReport, CrawlResult, CrawlStage, SourceQuery, SourceType};
use crate::parser::EntryParser;
use crate::utils::error::{ConfigError, CrawlerError, FetchError};
use crate::utils::retry::RequestPolicy;

/// One source: client, policy and default queries
pub struct SourceRunner {
    name: String,
    client: Box<dyn FetchClient>,
    policy: RequestPolicy,
    queries: Vec<SourceQuery>,
    request_delay: Duration,
}

impl std::fmt::Debug for SourceRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceRunner")
            .field("name", &self.name)
            .field("source_type", &self.client.source_type())
            .field("queries", &self.queries)
            .field("request_delay", &self.request_delay)
            .finish_non_exhaustive()
    }
}

impl SourceRunner {
    pub fn new(
        name: impl Into<String>,
        client: Box<dyn FetchClient>,
        policy: RequestPolicy,
        queries: Vec<SourceQuery>,
    ) -> Self {
        Self {
            name: name.into(),
            client,
            policy,
            queries,
            request_delay: Duration::ZERO,
        }
    }

    /// Pause between consecutive queries, and before the next source
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    /// Runner for a configured source
    pub fn from_config(
        source: &SourceConfig,
        fetcher: Arc<HttpFetcher>,
        github_token: Option<&str>,
    ) -> Self {
        let policy_config = source.effective_policy();
        let policy = RequestPolicy::new(
            policy_config.retry_config(),
            policy_config.rate_limit(),
            policy_config.timeout(),
        );

        Self::new(
            source.name.clone(),
            build_client(source, fetcher, github_token),
            policy,
            source.queries.clone(),
        )
        .with_request_delay(policy_config.request_delay())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source_type(&self) -> SourceType {
        self.client.source_type()
    }

    pub fn queries(&self) -> &[SourceQuery] {
        &self.queries
    }

    pub fn policy(&self) -> &RequestPolicy {
        &self.policy
    }

    /// Crawl this source with its own queries or the given ones
    ///
    /// Never returns an error: failures are reported in the result.
    pub async fn crawl(
        &mut self,
        parser: &EntryParser,
        queries: Option<&[SourceQuery]>,
    ) -> CrawlResult {
        let started = Instant::now();
        let queries: Vec<SourceQuery> = queries
            .map(<[SourceQuery]>::to_vec)
            .unwrap_or_else(|| self.queries.clone());
        let source_type = self.client.source_type();

        info!(
            source = %self.name,
            source_type = %source_type,
            queries = queries.len(),
            synthetic = self.client.is_synthetic(),
            "Starting source crawl"
        );

        // Idle: reject bad parameters before any request
        if queries.is_empty() {
            let err = CrawlerError::Config(ConfigError::missing(&self.name, "queries"));
            return self.fail(&queries, CrawlStage::Idle, err, 0, started);
        }
        if let Some(err) = queries
            .iter()
            .find_map(|q| self.client.validate(&self.name, q).err())
        {
            return self.fail(&queries, CrawlStage::Idle, err.into(), 0, started);
        }

        let mut records = Vec::new();
        let mut dedup = DedupFilter::new();
        let mut duplicates = 0;
        let mut attempts = 0;
        let mut synthetic = false;

        for (index, query) in queries.iter().enumerate() {
            if index > 0 && !self.request_delay.is_zero() {
                debug!(delay_ms = self.request_delay.as_millis() as u64, "Waiting between queries");
                tokio::time::sleep(self.request_delay).await;
            }

            debug!(source = %self.name, query = %query, stage = CrawlStage::Fetching.as_str(), "Fetching");
            let client = &self.client;
            let fetched = self.policy.execute(query, || client.fetch(query)).await;
            attempts += self.policy.last_attempts();

            let payload = match fetched {
                Ok(payload) => payload,
                Err(err) => return self.fail(&queries, CrawlStage::Fetching, err, attempts, started),
            };
            synthetic |= payload.synthetic;

            debug!(source = %self.name, query = %query, stage = CrawlStage::Parsing.as_str(), "Parsing");
            let mut parsed = match parser.parse(&payload) {
                Ok(parsed) => parsed,
                Err(err) => {
                    return self.fail(&queries, CrawlStage::Parsing, err.into(), attempts, started)
                }
            };

            parsed.truncate(query.max_results as usize);
            let dropped = dedup.retain_new(&mut parsed);
            if dropped > 0 {
                debug!(source = %self.name, dropped, "Dropped duplicate records");
            }
            duplicates += dropped;
            records.extend(parsed);
        }

        let mut result = CrawlResult::succeeded(self.name.clone(), source_type, queries, records);
        result.attempts = attempts;
        result.synthetic |= synthetic;
        result.duplicates_dropped = duplicates;
        result.duration_ms = started.elapsed().as_millis() as u64;

        info!(
            source = %self.name,
            records = result.records.len(),
            duplicates,
            attempts,
            lifetime_attempts = self.policy.total_attempts(),
            duration_ms = result.duration_ms,
            "Source crawl succeeded"
        );

        result
    }

    fn fail(
        &self,
        queries: &[SourceQuery],
        stage: CrawlStage,
        err: CrawlerError,
        attempts: u32,
        started: Instant,
    ) -> CrawlResult {
        error!(
            source = %self.name,
            stage = stage.as_str(),
            category = err.category().as_str(),
            recoverable = err.is_recoverable(),
            attempts,
            error = %err,
            "Source crawl failed"
        );

        let mut result = CrawlResult::failed(
            self.name.clone(),
            self.client.source_type(),
            queries.to_vec(),
            stage,
            err.to_string(),
        );
        result.attempts = attempts;
        result.synthetic = self.client.is_synthetic();
        result.duration_ms = started.elapsed().as_millis() as u64;
        result
    }
}

/// Runs every registered source in order
#[derive(Debug, Default)]
pub struct Orchestrator {
    runners: Vec<SourceRunner>,
    parser: EntryParser,
}

impl Orchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Orchestrator for every enabled source in the configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError` if the shared HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let fetcher = Arc::new(HttpFetcher::from_config(config)?);
        Ok(Self::from_config_with_fetcher(config, fetcher))
    }

    pub fn from_config_with_fetcher(config: &Config, fetcher: Arc<HttpFetcher>) -> Self {
        let token = config.crawler.github_token.as_deref();
        let runners = config
            .enabled_sources()
            .map(|source| SourceRunner::from_config(source, Arc::clone(&fetcher), token))
            .collect();

        Self {
            runners,
            parser: EntryParser::new(),
        }
    }

    /// Add a source at the end of the run order
    pub fn register(&mut self, runner: SourceRunner) {
        if self.runner_mut(runner.name()).is_some() {
            warn!(source = %runner.name(), "Replacing source with the same name");
            self.runners.retain(|r| r.name() != runner.name());
        }
        self.runners.push(runner);
    }

    pub fn with_runner(mut self, runner: SourceRunner) -> Self {
        self.register(runner);
        self
    }

    pub fn source_names(&self) -> Vec<&str> {
        self.runners.iter().map(SourceRunner::name).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.runners.is_empty()
    }

    fn runner_mut(&mut self, name: &str) -> Option<&mut SourceRunner> {
        self.runners.iter_mut().find(|r| r.name() == name)
    }

    /// Crawl every source sequentially and aggregate the outcomes
    pub async fn run_all(&mut self) -> CrawlReport {
        let started_at = Utc::now();
        let Self { runners, parser } = self;

        info!(sources = runners.len(), "Starting crawl run");

        let mut results = Vec::with_capacity(runners.len());
        let mut pending_delay = Duration::ZERO;
        for runner in runners.iter_mut() {
            if !pending_delay.is_zero() {
                debug!(delay_ms = pending_delay.as_millis() as u64, "Waiting before next source");
                tokio::time::sleep(pending_delay).await;
            }
            results.push(runner.crawl(parser, None).await);
            pending_delay = runner.request_delay;
        }

        let report = CrawlReport::new(started_at, results);
        let summary = report.summary();
        info!(
            run_id = %summary.run_id,
            attempted = summary.attempted,
            succeeded = summary.succeeded,
            failed = summary.failed,
            records = summary.total_records,
            "Crawl run finished"
        );
        for (source, error) in &summary.failures {
            warn!(source = %source, error = %error, "Source failed in this run");
        }

        report
    }

    /// Crawl one source by name, optionally with ad-hoc queries
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::UnknownSource` when no source has that name.
    /// Fetch and parse failures are reported inside the result.
    pub async fn run_source(
        &mut self,
        name: &str,
        queries: Option<Vec<SourceQuery>>,
    ) -> Result<CrawlResult, ConfigError> {
        let parser = self.parser;
        let runner = self
            .runner_mut(name)
            .ok_or_else(|| ConfigError::UnknownSource(name.to_string()))?;
        Ok(runner.crawl(&parser, queries.as_deref()).await)
    }
}
