//! crawlhub - multi-source crawl and normalize pipeline
//!
//! Fetches research papers, repositories, feed items and Q&A posts from
//! several sources, normalizes them into one record shape, fingerprints them
//! for deduplication and persists them.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and per-source settings
//! - [`crawler`] - Fetch clients, the shared HTTP fetcher and the orchestrator
//! - [`parser`] - Payload parsing and normalization into records
//! - [`dedup`] - Content checksums and in-batch deduplication
//! - [`models`] - Core data structures and types
//! - [`storage`] - Record persistence (SQLite)
//! - [`utils`] - Error types, rate limiting and retry policy
//!
//! # Example
//!
//! ```no_run
//! use crawlhub::config::Config;
//! use crawlhub::crawler::Orchestrator;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let mut orchestrator = Orchestrator::from_config(&config)?;
//!     let report = orchestrator.run_all().await;
//!     println!("{} records", report.total_records());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod crawler;
pub mod dedup;
pub mod error;
pub mod models;
pub mod parser;
pub mod storage;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{Config, SourceConfig};
    pub use crate::crawler::{FetchClient, Orchestrator, SourceRunner};
    pub use crate::dedup::{record_checksum, Checksum, DedupFilter};
    pub use crate::error::{CrawlErrorTrait, Error, ErrorCategory, Result};
    pub use crate::models::{
        CrawlReport, CrawlResult, CrawlStage, NormalizedRecord, RawPayload, SourceQuery,
        SourceType,
    };
    pub use crate::parser::EntryParser;
    pub use crate::storage::{RecordSink, SqliteRecordStore};
}

// Direct re-exports for convenience
pub use models::{CrawlReport, CrawlResult, NormalizedRecord, SourceQuery, SourceType};
