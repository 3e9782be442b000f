//! Generic syndication feed client (RSS 2.0, RSS 1.0, Atom)

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;
use url::Url;

use crate::crawler::headers::ACCEPT_FEED;
use crate::crawler::{FetchClient, HttpFetcher};
use crate::models::{RawPayload, SourceQuery, SourceType};
use crate::utils::error::FetchError;

/// Fetches the feed whose URL is the query's search string
#[derive(Debug)]
pub struct RssClient {
    fetcher: Arc<HttpFetcher>,
    timeout: Duration,
}

impl RssClient {
    pub fn new(fetcher: Arc<HttpFetcher>, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }
}

#[async_trait]
impl FetchClient for RssClient {
    fn source_type(&self) -> SourceType {
        SourceType::Rss
    }

    #[instrument(skip(self), fields(feed = %query.search))]
    async fn fetch(&self, query: &SourceQuery) -> Result<RawPayload, FetchError> {
        let url = Url::parse(&query.search)
            .map_err(|e| FetchError::InvalidUrl(format!("{}: {e}", query.search)))?;
        let body = self
            .fetcher
            .get_text(&url, self.fetcher.headers(ACCEPT_FEED), self.timeout)
            .await?;
        Ok(RawPayload::xml(SourceType::Rss, body))
    }
}
