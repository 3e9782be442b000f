//! Record persistence
//!
//! [`RecordSink`] is the seam between the crawl pipeline and whatever stores
//! its output. [`SqliteRecordStore`] is the bundled implementation: records
//! are keyed by source type and checksum, so storing the same content twice
//! from one source is a no-op, and a record whose identifier is known but
//! whose checksum changed is updated in place. Identical content from two
//! sources is kept as two rows.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::models::{CrawlReport, NormalizedRecord, SourceType};

// ============================================================================
// Sink Trait
// ============================================================================

/// Outcome of one upsert batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpsertSummary {
    /// New records
    pub inserted: usize,
    /// Content already stored under the same checksum
    pub unchanged: usize,
    /// Known identifier whose content changed
    pub changed: usize,
}

impl UpsertSummary {
    pub fn total(&self) -> usize {
        self.inserted + self.unchanged + self.changed
    }
}

/// Destination for normalized records
pub trait RecordSink {
    /// Store records, skipping content that is already present
    fn upsert(&mut self, records: &[NormalizedRecord]) -> Result<UpsertSummary>;

    /// Store the per-source outcome of a crawl run
    fn record_run(&mut self, report: &CrawlReport) -> Result<()>;
}

/// Counters for the `stats` command
#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStats {
    pub total_records: usize,
    pub synthetic_records: usize,
    /// (source type, record count), largest first
    pub by_source: Vec<(String, usize)>,
    pub runs: usize,
    pub failed_sources: usize,
    pub last_run_at: Option<DateTime<Utc>>,
}

// ============================================================================
// SQLite Implementation
// ============================================================================

/// SQLite-backed record store
pub struct SqliteRecordStore {
    conn: Connection,
}

impl SqliteRecordStore {
    /// Open (and create if needed) a database file
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directory if needed
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| Error::with_source(format!("Failed to open {}", path.display()), e))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let store = Self { conn };
        store.create_schema()?;

        tracing::info!(path = %path.display(), "SQLite record store initialized");
        Ok(store)
    }

    /// In-memory store (for testing)
    pub fn in_memory() -> Result<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.create_schema()?;
        Ok(store)
    }

    fn create_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
                CREATE TABLE IF NOT EXISTS records (
                    checksum TEXT NOT NULL,
                    record_id TEXT NOT NULL,
                    source_type TEXT NOT NULL,
                    title TEXT NOT NULL,
                    summary TEXT NOT NULL,
                    authors TEXT NOT NULL,
                    tags TEXT NOT NULL,
                    links TEXT NOT NULL,
                    published_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL,
                    synthetic INTEGER NOT NULL DEFAULT 0,
                    first_seen_at TEXT NOT NULL,
                    last_seen_at TEXT NOT NULL,
                    PRIMARY KEY (source_type, checksum),
                    UNIQUE (source_type, record_id)
                );

                CREATE INDEX IF NOT EXISTS idx_records_published
                    ON records(published_at);

                CREATE TABLE IF NOT EXISTS crawl_runs (
                    run_id TEXT NOT NULL,
                    source TEXT NOT NULL,
                    source_type TEXT NOT NULL,
                    success INTEGER NOT NULL,
                    records INTEGER NOT NULL,
                    attempts INTEGER NOT NULL,
                    failed_stage TEXT,
                    error_message TEXT,
                    started_at TEXT NOT NULL,
                    finished_at TEXT NOT NULL,
                    PRIMARY KEY (run_id, source)
                );
                "#,
        )?;
        Ok(())
    }

    /// Look up a stored record by source and checksum
    pub fn get(&self, source_type: SourceType, checksum: &str) -> Result<Option<NormalizedRecord>> {
        let row = self
            .conn
            .query_row(
                "SELECT record_id, source_type, title, summary, authors, tags, links,
                        published_at, updated_at, synthetic, last_seen_at
                 FROM records WHERE source_type = ?1 AND checksum = ?2",
                params![source_type.as_str(), checksum],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                        row.get::<_, String>(5)?,
                        row.get::<_, String>(6)?,
                        row.get::<_, String>(7)?,
                        row.get::<_, String>(8)?,
                        row.get::<_, bool>(9)?,
                        row.get::<_, String>(10)?,
                    ))
                },
            )
            .optional()?;

        let Some((id, source_type, title, summary, authors, tags, links, published, updated, synthetic, seen)) =
            row
        else {
            return Ok(None);
        };

        let source_type = serde_json::from_value(serde_json::Value::String(source_type))?;
        Ok(Some(NormalizedRecord {
            id,
            title,
            summary,
            authors: serde_json::from_str(&authors)?,
            published_at: parse_stored_time(&published)?,
            updated_at: parse_stored_time(&updated)?,
            tags: serde_json::from_str(&tags)?,
            links: serde_json::from_str(&links)?,
            checksum: crate::dedup::Checksum::from_hex(checksum),
            source_type,
            synthetic,
            fetched_at: parse_stored_time(&seen)?,
        }))
    }

    /// Number of stored records
    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM records", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Aggregate counters
    pub fn stats(&self) -> Result<StoreStats> {
        let total_records = self.count()?;
        let synthetic: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM records WHERE synthetic = 1",
            [],
            |row| row.get(0),
        )?;

        let mut stmt = self.conn.prepare(
            "SELECT source_type, COUNT(*) FROM records
             GROUP BY source_type ORDER BY COUNT(*) DESC, source_type",
        )?;
        let by_source = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as usize)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let runs: i64 = self.conn.query_row(
            "SELECT COUNT(DISTINCT run_id) FROM crawl_runs",
            [],
            |row| row.get(0),
        )?;
        let failed: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM crawl_runs WHERE success = 0",
            [],
            |row| row.get(0),
        )?;
        let last_run: Option<String> = self.conn.query_row(
            "SELECT MAX(finished_at) FROM crawl_runs",
            [],
            |row| row.get(0),
        )?;

        Ok(StoreStats {
            total_records,
            synthetic_records: synthetic as usize,
            by_source,
            runs: runs as usize,
            failed_sources: failed as usize,
            last_run_at: last_run.as_deref().map(parse_stored_time).transpose()?,
        })
    }
}

fn parse_stored_time(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::with_source(format!("Invalid stored timestamp '{raw}'"), e))
}

impl RecordSink for SqliteRecordStore {
    fn upsert(&mut self, records: &[NormalizedRecord]) -> Result<UpsertSummary> {
        let now = Utc::now().to_rfc3339();
        let mut summary = UpsertSummary::default();
        let tx = self.conn.transaction()?;

        for record in records {
            let checksum = record.checksum.as_str();
            let source_type = record.source_type.as_str();

            let known_checksum: bool = tx.query_row(
                "SELECT EXISTS(SELECT 1 FROM records WHERE source_type = ?1 AND checksum = ?2)",
                params![source_type, checksum],
                |row| row.get(0),
            )?;
            if known_checksum {
                tx.execute(
                    "UPDATE records SET last_seen_at = ?3 WHERE source_type = ?1 AND checksum = ?2",
                    params![source_type, checksum, now],
                )?;
                summary.unchanged += 1;
                continue;
            }

            let authors = serde_json::to_string(&record.authors)?;
            let tags = serde_json::to_string(&record.tags)?;
            let links = serde_json::to_string(&record.links)?;

            let changed = tx.execute(
                r#"
                    UPDATE records SET checksum = ?3, title = ?4, summary = ?5, authors = ?6,
                        tags = ?7, links = ?8, published_at = ?9, updated_at = ?10,
                        synthetic = ?11, last_seen_at = ?12
                    WHERE source_type = ?1 AND record_id = ?2
                    "#,
                params![
                    source_type,
                    record.id,
                    checksum,
                    record.title,
                    record.summary,
                    authors,
                    tags,
                    links,
                    record.published_at.to_rfc3339(),
                    record.updated_at.to_rfc3339(),
                    record.synthetic,
                    now,
                ],
            )?;
            if changed > 0 {
                summary.changed += 1;
                continue;
            }

            tx.execute(
                r#"
                    INSERT INTO records (checksum, record_id, source_type, title, summary, authors,
                        tags, links, published_at, updated_at, synthetic, first_seen_at, last_seen_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)
                    "#,
                params![
                    checksum,
                    record.id,
                    source_type,
                    record.title,
                    record.summary,
                    authors,
                    tags,
                    links,
                    record.published_at.to_rfc3339(),
                    record.updated_at.to_rfc3339(),
                    record.synthetic,
                    now,
                ],
            )?;
            summary.inserted += 1;
        }

        tx.commit()?;
        tracing::debug!(
            inserted = summary.inserted,
            unchanged = summary.unchanged,
            changed = summary.changed,
            "Upserted records"
        );
        Ok(summary)
    }

    fn record_run(&mut self, report: &CrawlReport) -> Result<()> {
        let tx = self.conn.transaction()?;
        for result in &report.results {
            tx.execute(
                r#"
                    INSERT OR REPLACE INTO crawl_runs (run_id, source, source_type, success, records,
                        attempts, failed_stage, error_message, started_at, finished_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                    "#,
                params![
                    report.run_id.to_string(),
                    result.source,
                    result.source_type.as_str(),
                    result.success,
                    result.records.len() as i64,
                    result.attempts,
                    result.failed_stage.map(|s| s.as_str()),
                    result.error,
                    report.started_at.to_rfc3339(),
                    report.finished_at.to_rfc3339(),
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}
