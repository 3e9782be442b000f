//! GitHub repository search client

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;
use url::Url;

use super::endpoint;
use crate::crawler::headers::{github_headers, ACCEPT_GITHUB};
use crate::crawler::{FetchClient, HttpFetcher};
use crate::models::{RawPayload, SortOrder, SourceQuery, SourceType};
use crate::utils::error::FetchError;

pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// The search API returns at most 100 items per page
const MAX_PER_PAGE: u32 = 100;

/// Sort fields accepted by `/search/repositories`
const SORT_FIELDS: &[&str] = &["stars", "forks", "help-wanted-issues", "updated"];

/// Client for `GET /search/repositories`
#[derive(Debug)]
pub struct GithubClient {
    fetcher: Arc<HttpFetcher>,
    base_url: String,
    token: Option<String>,
    timeout: Duration,
}

impl GithubClient {
    pub fn new(fetcher: Arc<HttpFetcher>, timeout: Duration) -> Self {
        Self {
            fetcher,
            base_url: GITHUB_API_BASE.to_string(),
            token: None,
            timeout,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Authenticate requests with a personal access token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Search URL; `start` is converted into a page number
    pub fn build_url(&self, query: &SourceQuery) -> Result<Url, FetchError> {
        let per_page = query.max_results.clamp(1, MAX_PER_PAGE);
        let page = query.start / per_page + 1;

        let mut params = vec![("q", query.search.clone())];
        if let Some(sort) = query
            .sort_by
            .as_deref()
            .filter(|s| SORT_FIELDS.contains(s))
        {
            params.push(("sort", sort.to_string()));
            let order = match query.sort_order {
                SortOrder::Ascending => "asc",
                SortOrder::Descending => "desc",
            };
            params.push(("order", order.to_string()));
        }
        params.push(("per_page", per_page.to_string()));
        params.push(("page", page.to_string()));

        endpoint(&self.base_url, "search/repositories", &params)
    }
}

#[async_trait]
impl FetchClient for GithubClient {
    fn source_type(&self) -> SourceType {
        SourceType::Github
    }

    #[instrument(skip(self), fields(search = %query.search))]
    async fn fetch(&self, query: &SourceQuery) -> Result<RawPayload, FetchError> {
        let url = self.build_url(query)?;
        let mut headers = self.fetcher.headers(ACCEPT_GITHUB);
        headers.extend(github_headers(self.token.as_deref()));

        let body = self.fetcher.get_json(&url, headers, self.timeout).await?;
        Ok(RawPayload::json(SourceType::Github, body))
    }
}
