//! Persistence gateway
//!
//! Crawl output leaves the pipeline through a [`RecordSink`]. Only successful
//! source results are handed to the sink; every result, failed ones included,
//! is logged as part of the run.

pub mod repository;

pub use repository::{RecordSink, SqliteRecordStore, StoreStats, UpsertSummary};

use crate::error::Result;
use crate::models::CrawlReport;

/// Persist a crawl report: records of successful sources, then the run log
pub fn persist_report(sink: &mut dyn RecordSink, report: &CrawlReport) -> Result<UpsertSummary> {
    let mut total = UpsertSummary::default();

    for result in report.results.iter().filter(|r| r.success) {
        let summary = sink.upsert(&result.records)?;
        tracing::info!(
            source = %result.source,
            inserted = summary.inserted,
            unchanged = summary.unchanged,
            changed = summary.changed,
            "Stored source records"
        );
        total.inserted += summary.inserted;
        total.unchanged += summary.unchanged;
        total.changed += summary.changed;
    }

    sink.record_run(report)?;
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CrawlResult, CrawlStage, SourceType};
    use chrono::Utc;

    #[test]
    fn test_persist_report_skips_failed_sources() {
        let mut store = SqliteRecordStore::in_memory().unwrap();
        let report = CrawlReport::new(
            Utc::now(),
            vec![CrawlResult::failed(
                "gh",
                SourceType::Github,
                vec![],
                CrawlStage::Parsing,
                "bad json",
            )],
        );

        let summary = persist_report(&mut store, &report).unwrap();
        assert_eq!(summary.total(), 0);
        assert_eq!(store.stats().unwrap().failed_sources, 1);
    }
}
