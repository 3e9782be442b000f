use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crawlhub::config::Config;
use crawlhub::models::SortOrder;

mod commands;

#[derive(Parser)]
#[command(
    name = "crawlhub",
    version,
    about = "Crawl papers, repositories, feeds and Q&A sites into one normalized store",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the configuration
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl every enabled source
    Crawl {
        /// Only crawl these sources (repeatable)
        #[arg(short, long)]
        source: Vec<String>,

        /// Do not write results to the database
        #[arg(long, default_value = "false")]
        no_store: bool,

        /// Print the full report as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Crawl one source, optionally with an ad-hoc query
    Source {
        /// Configured source name, or a source kind (arxiv, github, rss, pwc, so)
        name: String,

        /// Search string, tag list or feed URL
        #[arg(short, long)]
        query: Option<String>,

        /// Pagination offset
        #[arg(long, default_value = "0")]
        start: u32,

        /// Maximum number of results
        #[arg(short, long, default_value = "10")]
        max_results: u32,

        /// Source-specific sort field
        #[arg(long)]
        sort_by: Option<String>,

        /// Sort order (asc, desc)
        #[arg(long, default_value = "desc", value_parser = parse_sort_order)]
        sort_order: SortOrder,

        /// Do not write results to the database
        #[arg(long, default_value = "false")]
        no_store: bool,

        /// Print records as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// List configured sources
    Sources,

    /// Show record store statistics
    Stats {
        /// Database path (defaults to the configured one)
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    // Initialize tracing/logging
    let format = cli
        .log_format
        .clone()
        .unwrap_or_else(|| config.logging.format.clone());
    setup_tracing(&format, &config.logging.level, cli.verbose)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "crawlhub starting");

    match cli.command {
        Commands::Crawl {
            source,
            no_store,
            json,
        } => {
            tracing::info!(sources = ?source, no_store, "Starting crawl command");
            commands::crawl(config, source, !no_store, json).await?;
        }

        Commands::Source {
            name,
            query,
            start,
            max_results,
            sort_by,
            sort_order,
            no_store,
            json,
        } => {
            tracing::info!(source = %name, query = ?query, "Starting single source crawl");
            let params = commands::SourceParams {
                name,
                query,
                start,
                max_results,
                sort_by,
                sort_order,
                store: !no_store,
                json,
            };
            commands::crawl_source(config, params).await?;
        }

        Commands::Sources => commands::list_sources(&config),

        Commands::Stats { database } => {
            let path = database.unwrap_or_else(|| config.storage.sqlite_path.clone());
            commands::stats(&path)?;
        }
    }

    Ok(())
}

fn parse_sort_order(value: &str) -> std::result::Result<SortOrder, String> {
    SortOrder::parse(value).ok_or_else(|| format!("unknown sort order '{value}' (expected asc or desc)"))
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("crawlhub=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("crawlhub={level},warn")))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }

    Ok(())
}
