// Core data structures for the crawl pipeline

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dedup::Checksum;

/// Which adapter produced a payload or record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Arxiv,
    Github,
    Rss,
    PapersWithCode,
    StackOverflow,
}

impl SourceType {
    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arxiv => "arxiv",
            Self::Github => "github",
            Self::Rss => "rss",
            Self::PapersWithCode => "paperswithcode",
            Self::StackOverflow => "stackoverflow",
        }
    }

    /// Create from string, accepting a few common spellings
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "arxiv" => Some(Self::Arxiv),
            "github" => Some(Self::Github),
            "rss" | "atom" | "feed" => Some(Self::Rss),
            "paperswithcode" | "papers-with-code" | "pwc" => Some(Self::PapersWithCode),
            "stackoverflow" | "stack-overflow" | "so" => Some(Self::StackOverflow),
            _ => None,
        }
    }

    /// Get all source types
    pub fn all() -> Vec<Self> {
        vec![
            Self::Arxiv,
            Self::Github,
            Self::Rss,
            Self::PapersWithCode,
            Self::StackOverflow,
        ]
    }
}

impl std::fmt::Display for SourceType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Sort direction for source queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Ascending),
            "desc" | "descending" => Some(Self::Descending),
            _ => None,
        }
    }
}

/// Caller-supplied parameters for one fetch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceQuery {
    /// Search string, category filter, tag, or feed URL depending on the source
    pub search: String,

    /// Pagination offset
    #[serde(default)]
    pub start: u32,

    /// Maximum number of results
    #[serde(default = "default_max_results")]
    pub max_results: u32,

    /// Source-specific sort field
    #[serde(default)]
    pub sort_by: Option<String>,

    #[serde(default)]
    pub sort_order: SortOrder,
}

fn default_max_results() -> u32 {
    10
}

impl SourceQuery {
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            start: 0,
            max_results: default_max_results(),
            sort_by: None,
            sort_order: SortOrder::default(),
        }
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.max_results = max_results;
        self
    }

    pub fn with_start(mut self, start: u32) -> Self {
        self.start = start;
        self
    }

    pub fn with_sort(mut self, sort_by: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(sort_by.into());
        self.sort_order = order;
        self
    }
}

impl std::fmt::Display for SourceQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (start={}, max={})",
            self.search, self.start, self.max_results
        )
    }
}

/// Body of a fetched document, before parsing
#[derive(Debug, Clone)]
pub enum PayloadBody {
    Xml(String),
    Json(serde_json::Value),
}

/// Source-specific document as returned by a fetch client
#[derive(Debug, Clone)]
pub struct RawPayload {
    pub source_type: SourceType,
    pub body: PayloadBody,
    pub fetched_at: DateTime<Utc>,
    /// Produced by a generator instead of a live API
    pub synthetic: bool,
}

impl RawPayload {
    pub fn xml(source_type: SourceType, body: impl Into<String>) -> Self {
        Self {
            source_type,
            body: PayloadBody::Xml(body.into()),
            fetched_at: Utc::now(),
            synthetic: false,
        }
    }

    pub fn json(source_type: SourceType, body: serde_json::Value) -> Self {
        Self {
            source_type,
            body: PayloadBody::Json(body),
            fetched_at: Utc::now(),
            synthetic: false,
        }
    }

    pub fn with_fetched_at(mut self, fetched_at: DateTime<Utc>) -> Self {
        self.fetched_at = fetched_at;
        self
    }

    pub fn into_synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }
}

/// Primary URL plus role-tagged alternates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordLinks {
    /// Landing page (abstract page, repository, post)
    pub primary: String,

    pub pdf: Option<String>,

    #[serde(default)]
    pub alternates: Vec<String>,
}

impl RecordLinks {
    pub fn primary(url: impl Into<String>) -> Self {
        Self {
            primary: url.into(),
            ..Default::default()
        }
    }
}

/// Canonical record flowing out of the pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    /// Source-native identifier, or the checksum when the source has none
    pub id: String,
    pub title: String,
    pub summary: String,
    /// Source order, duplicates kept
    pub authors: Vec<String>,
    pub published_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub tags: Vec<String>,
    pub links: RecordLinks,
    pub checksum: Checksum,
    pub source_type: SourceType,
    pub synthetic: bool,
    pub fetched_at: DateTime<Utc>,
}

/// Per-source crawl state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlStage {
    Idle,
    Fetching,
    Parsing,
    Succeeded,
    Failed,
}

impl CrawlStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Fetching => "fetching",
            Self::Parsing => "parsing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }
}

/// Outcome of one source in one crawl cycle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlResult {
    /// Configured source name
    pub source: String,
    pub source_type: SourceType,
    pub success: bool,
    pub queries: Vec<SourceQuery>,
    /// Always present; empty when `success` is false
    pub records: Vec<NormalizedRecord>,
    pub fetched_at: DateTime<Utc>,
    pub error: Option<String>,
    /// Stage that was active when the crawl failed
    pub failed_stage: Option<CrawlStage>,
    /// Fetch attempts across all queries, retries included
    pub attempts: u32,
    pub synthetic: bool,
    pub duplicates_dropped: usize,
    pub duration_ms: u64,
}

impl CrawlResult {
    pub fn succeeded(
        source: impl Into<String>,
        source_type: SourceType,
        queries: Vec<SourceQuery>,
        records: Vec<NormalizedRecord>,
    ) -> Self {
        let synthetic = records.iter().any(|r| r.synthetic);
        Self {
            source: source.into(),
            source_type,
            success: true,
            queries,
            records,
            fetched_at: Utc::now(),
            error: None,
            failed_stage: None,
            attempts: 0,
            synthetic,
            duplicates_dropped: 0,
            duration_ms: 0,
        }
    }

    pub fn failed(
        source: impl Into<String>,
        source_type: SourceType,
        queries: Vec<SourceQuery>,
        stage: CrawlStage,
        error: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            source_type,
            success: false,
            queries,
            records: Vec::new(),
            fetched_at: Utc::now(),
            error: Some(error.into()),
            failed_stage: Some(stage),
            attempts: 0,
            synthetic: false,
            duplicates_dropped: 0,
            duration_ms: 0,
        }
    }

    /// Terminal state of this crawl
    pub fn stage(&self) -> CrawlStage {
        if self.success {
            CrawlStage::Succeeded
        } else {
            CrawlStage::Failed
        }
    }
}

/// Aggregate of one orchestrator run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<CrawlResult>,
}

impl CrawlReport {
    pub fn new(started_at: DateTime<Utc>, results: Vec<CrawlResult>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at,
            finished_at: Utc::now(),
            results,
        }
    }

    pub fn attempted(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.success).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.succeeded()
    }

    pub fn total_records(&self) -> usize {
        self.results.iter().map(|r| r.records.len()).sum()
    }

    /// Results for a configured source name
    pub fn result(&self, source: &str) -> Option<&CrawlResult> {
        self.results.iter().find(|r| r.source == source)
    }

    pub fn summary(&self) -> ReportSummary {
        ReportSummary {
            run_id: self.run_id,
            attempted: self.attempted(),
            succeeded: self.succeeded(),
            failed: self.failed(),
            total_records: self.total_records(),
            duration_secs: (self.finished_at - self.started_at).num_seconds().max(0) as u64,
            failures: self
                .results
                .iter()
                .filter(|r| !r.success)
                .map(|r| {
                    (
                        r.source.clone(),
                        r.error.clone().unwrap_or_default(),
                    )
                })
                .collect(),
        }
    }
}

/// Counts suitable for logging and alerting
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub run_id: Uuid,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_records: usize,
    pub duration_secs: u64,
    /// (source, error) for each failed source
    pub failures: Vec<(String, String)>,
}

impl ReportSummary {
    /// Success rate (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        if self.attempted == 0 {
            return 1.0;
        }
        self.succeeded as f64 / self.attempted as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_type_roundtrip_names() {
        for source_type in SourceType::all() {
            assert_eq!(SourceType::parse(source_type.as_str()), Some(source_type));
        }
        assert_eq!(SourceType::parse("PWC"), Some(SourceType::PapersWithCode));
        assert_eq!(SourceType::parse("nope"), None);
    }

    #[test]
    fn test_source_type_serde_lowercase() {
        let json = serde_json::to_string(&SourceType::PapersWithCode).unwrap();
        assert_eq!(json, "\"paperswithcode\"");
    }

    #[test]
    fn test_query_defaults_from_toml() {
        let query: SourceQuery = toml::from_str(r#"search = "cat:cs.AI""#).unwrap();
        assert_eq!(query.start, 0);
        assert_eq!(query.max_results, 10);
        assert_eq!(query.sort_order, SortOrder::Descending);
    }

    #[test]
    fn test_failed_result_has_empty_records() {
        let result = CrawlResult::failed(
            "arxiv",
            SourceType::Arxiv,
            vec![SourceQuery::new("cat:cs.AI")],
            CrawlStage::Fetching,
            "boom",
        );
        assert!(!result.success);
        assert!(result.records.is_empty());
        assert_eq!(result.stage(), CrawlStage::Failed);
        assert_eq!(result.failed_stage, Some(CrawlStage::Fetching));
    }

    #[test]
    fn test_report_counts() {
        let ok = CrawlResult::succeeded("a", SourceType::Rss, vec![], vec![]);
        let bad = CrawlResult::failed("b", SourceType::Github, vec![], CrawlStage::Parsing, "x");
        let report = CrawlReport::new(Utc::now(), vec![ok, bad]);

        assert_eq!(report.attempted(), 2);
        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 1);

        let summary = report.summary();
        assert_eq!(summary.failures, vec![("b".to_string(), "x".to_string())]);
        assert_eq!(summary.success_rate(), 0.5);
    }
}
