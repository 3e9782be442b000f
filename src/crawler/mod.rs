//! Fetching from remote sources
//!
//! Each source kind has a [`FetchClient`] that turns a [`SourceQuery`] into a
//! [`RawPayload`]. Clients make exactly one request per call; pacing and
//! retries are applied around them by [`RequestPolicy`], and the
//! [`Orchestrator`] drives every configured source through fetch and parse.
//!
//! [`RequestPolicy`]: crate::utils::retry::RequestPolicy

pub mod fetcher;
pub mod headers;
pub mod orchestrator;
pub mod sources;

use async_trait::async_trait;

use crate::config::validate_query;
use crate::models::{RawPayload, SourceQuery, SourceType};
use crate::utils::error::{ConfigError, FetchError};

pub use fetcher::HttpFetcher;
pub use orchestrator::{Orchestrator, SourceRunner};
pub use sources::build_client;

/// Adapter for one remote source
#[async_trait]
pub trait FetchClient: Send + Sync {
    /// Kind of payload this client produces
    fn source_type(&self) -> SourceType;

    /// Whether payloads come from a generator instead of a live API
    fn is_synthetic(&self) -> bool {
        false
    }

    /// Reject a query before any network call is made
    fn validate(&self, source_name: &str, query: &SourceQuery) -> Result<(), ConfigError> {
        validate_query(source_name, self.source_type(), query)
    }

    /// Perform a single fetch
    async fn fetch(&self, query: &SourceQuery) -> Result<RawPayload, FetchError>;
}
