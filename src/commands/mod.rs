pub mod crawl;

// Re-export command functions for convenience
pub use crawl::{crawl, crawl_source, list_sources, stats, SourceParams};
