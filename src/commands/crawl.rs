use anyhow::{bail, Context, Result};
use std::path::Path;
use std::sync::Arc;

use crawlhub::config::{Config, SourceConfig};
use crawlhub::crawler::{HttpFetcher, Orchestrator, SourceRunner};
use crawlhub::models::{CrawlReport, CrawlResult, SortOrder, SourceQuery, SourceType};
use crawlhub::storage::{persist_report, SqliteRecordStore};
use crawlhub::utils::truncate_text;

/// Arguments of the `source` command
#[derive(Debug, Clone)]
pub struct SourceParams {
    pub name: String,
    pub query: Option<String>,
    pub start: u32,
    pub max_results: u32,
    pub sort_by: Option<String>,
    pub sort_order: SortOrder,
    pub store: bool,
    pub json: bool,
}

pub async fn crawl(config: Config, only: Vec<String>, store: bool, json: bool) -> Result<()> {
    for name in &only {
        if config.source(name).is_none() {
            bail!("Unknown source: {name}");
        }
    }

    let mut orchestrator = if only.is_empty() {
        Orchestrator::from_config(&config).context("Failed to create HTTP client")?
    } else {
        let mut selected = config.clone();
        selected.sources.retain(|s| only.contains(&s.name));
        // explicitly named sources run even when disabled
        for source in &mut selected.sources {
            source.enabled = true;
        }
        Orchestrator::from_config(&selected).context("Failed to create HTTP client")?
    };

    if orchestrator.is_empty() {
        println!("No enabled sources configured.");
        return Ok(());
    }

    if !json {
        println!("Starting crawl");
        println!("==============");
        println!("Sources: {}", orchestrator.source_names().join(", "));
    }

    let report = orchestrator.run_all().await;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if store && config.storage.enabled {
        store_report(&config.storage.sqlite_path, &report, json)?;
    }

    Ok(())
}

pub async fn crawl_source(config: Config, params: SourceParams) -> Result<()> {
    let queries = params.query.as_ref().map(|search| {
        let mut query = SourceQuery::new(search.clone())
            .with_start(params.start)
            .with_max_results(params.max_results);
        query.sort_order = params.sort_order;
        query.sort_by = params.sort_by.clone();
        vec![query]
    });

    let (source, queries) = match config.source(&params.name) {
        Some(source) => (source.clone(), queries),
        None => {
            let Some(kind) = SourceType::parse(&params.name) else {
                bail!(
                    "Unknown source: {} (not a configured name or a source kind)",
                    params.name
                );
            };
            let Some(queries) = queries else {
                bail!("--query is required for an unconfigured {kind} source");
            };
            (SourceConfig::new(kind.as_str(), kind, queries), None)
        }
    };

    let fetcher = Arc::new(HttpFetcher::from_config(&config).context("Failed to create HTTP client")?);
    let runner = SourceRunner::from_config(&source, fetcher, config.crawler.github_token.as_deref());
    let mut orchestrator = Orchestrator::new().with_runner(runner);
    let result = orchestrator.run_source(&source.name, queries).await?;

    if params.json {
        println!("{}", serde_json::to_string_pretty(&result.records)?);
    } else {
        print_result(&result);
        for record in &result.records {
            println!();
            println!("{}", record.title);
            println!("  id:        {}", record.id);
            println!("  published: {}", record.published_at.format("%Y-%m-%d"));
            if !record.authors.is_empty() {
                println!("  authors:   {}", record.authors.join(", "));
            }
            if !record.tags.is_empty() {
                println!("  tags:      {}", record.tags.join(", "));
            }
            println!("  link:      {}", record.links.primary);
            if !record.summary.is_empty() {
                println!("  {}", truncate_text(&record.summary, 160));
            }
        }
    }

    if params.store && config.storage.enabled {
        let report = CrawlReport::new(result.fetched_at, vec![result]);
        store_report(&config.storage.sqlite_path, &report, params.json)?;
    }

    Ok(())
}

pub fn list_sources(config: &Config) {
    println!("Configured Sources");
    println!("==================");
    for source in &config.sources {
        let policy = source.effective_policy();
        println!(
            "{:<24} {:<15} {}{}",
            source.name,
            source.kind.as_str(),
            if source.enabled { "enabled" } else { "disabled" },
            if source.synthetic { ", synthetic" } else { "" },
        );
        for query in &source.queries {
            println!("    query: {query}");
        }
        println!(
            "    policy: timeout {}ms, {} retries, delay {}ms",
            policy.timeout_ms, policy.max_retries, policy.request_delay_ms
        );
    }
}

pub fn stats(database: &Path) -> Result<()> {
    if !database.exists() {
        println!("Database not found: {}", database.display());
        println!("Run a crawl first to create the database.");
        return Ok(());
    }

    let store = SqliteRecordStore::open(database)?;
    let stats = store.stats()?;

    println!("Record Statistics");
    println!("=================");
    println!("Database: {}", database.display());
    println!();
    println!("Total records: {}", stats.total_records);
    println!(
        "  Synthetic: {} ({:.1}%)",
        stats.synthetic_records,
        if stats.total_records > 0 {
            stats.synthetic_records as f64 / stats.total_records as f64 * 100.0
        } else {
            0.0
        }
    );
    for (source, count) in &stats.by_source {
        println!("  {source:<15} {count}");
    }
    println!();
    println!("Crawl runs: {}", stats.runs);
    println!("Failed source crawls: {}", stats.failed_sources);
    if let Some(last_run) = stats.last_run_at {
        println!("Last run: {}", last_run.format("%Y-%m-%d %H:%M:%S UTC"));
    }

    Ok(())
}

fn store_report(path: &Path, report: &CrawlReport, quiet: bool) -> Result<()> {
    let mut store = SqliteRecordStore::open(path)
        .with_context(|| format!("Failed to open database {}", path.display()))?;
    let summary = persist_report(&mut store, report)?;

    if !quiet {
        println!();
        println!("Stored in {}", path.display());
        println!(
            "  inserted: {}, changed: {}, unchanged: {}",
            summary.inserted, summary.changed, summary.unchanged
        );
    }
    Ok(())
}

fn print_result(result: &CrawlResult) {
    let status = if result.success { "ok" } else { "FAILED" };
    println!(
        "{:<24} {:<7} {:>4} records  {:>2} attempts  {:>6}ms{}",
        result.source,
        status,
        result.records.len(),
        result.attempts,
        result.duration_ms,
        if result.synthetic { "  (synthetic)" } else { "" },
    );
    if let Some(error) = &result.error {
        let stage = result.failed_stage.map(|s| s.as_str()).unwrap_or("unknown");
        println!("    failed while {stage}: {error}");
    }
    if result.duplicates_dropped > 0 {
        println!("    {} duplicates dropped", result.duplicates_dropped);
    }
}

fn print_report(report: &CrawlReport) {
    println!();
    for result in &report.results {
        print_result(result);
    }

    let summary = report.summary();
    println!();
    println!("Crawl Summary");
    println!("=============");
    println!("Run: {}", summary.run_id);
    println!("Sources: {} ok / {} failed", summary.succeeded, summary.failed);
    println!("Records: {}", summary.total_records);
    println!("Duration: {}s", summary.duration_secs);
}
