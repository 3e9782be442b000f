//! arXiv Atom API client

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;
use url::Url;

use super::endpoint;
use crate::crawler::headers::ACCEPT_ATOM;
use crate::crawler::{FetchClient, HttpFetcher};
use crate::models::{RawPayload, SortOrder, SourceQuery, SourceType};
use crate::utils::error::FetchError;

pub const ARXIV_API_BASE: &str = "http://export.arxiv.org";

/// Default `sortBy` when the query names none
const DEFAULT_SORT: &str = "submittedDate";

/// Client for `GET /api/query`
#[derive(Debug)]
pub struct ArxivClient {
    fetcher: Arc<HttpFetcher>,
    base_url: String,
    timeout: Duration,
}

impl ArxivClient {
    pub fn new(fetcher: Arc<HttpFetcher>, timeout: Duration) -> Self {
        Self {
            fetcher,
            base_url: ARXIV_API_BASE.to_string(),
            timeout,
        }
    }

    /// Point the client at another server (mirrors, mock servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Query URL for a search
    pub fn build_url(&self, query: &SourceQuery) -> Result<Url, FetchError> {
        let sort_order = match query.sort_order {
            SortOrder::Ascending => "ascending",
            SortOrder::Descending => "descending",
        };
        endpoint(
            &self.base_url,
            "api/query",
            &[
                ("search_query", query.search.clone()),
                ("start", query.start.to_string()),
                ("max_results", query.max_results.to_string()),
                (
                    "sortBy",
                    query.sort_by.clone().unwrap_or_else(|| DEFAULT_SORT.to_string()),
                ),
                ("sortOrder", sort_order.to_string()),
            ],
        )
    }
}

#[async_trait]
impl FetchClient for ArxivClient {
    fn source_type(&self) -> SourceType {
        SourceType::Arxiv
    }

    #[instrument(skip(self), fields(search = %query.search))]
    async fn fetch(&self, query: &SourceQuery) -> Result<RawPayload, FetchError> {
        let url = self.build_url(query)?;
        let body = self
            .fetcher
            .get_text(&url, self.fetcher.headers(ACCEPT_ATOM), self.timeout)
            .await?;
        Ok(RawPayload::xml(SourceType::Arxiv, body))
    }
}
