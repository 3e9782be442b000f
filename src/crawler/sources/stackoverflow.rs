//! Stack Overflow questions client
//!
//! Talks to the Stack Exchange `/2.3/questions` endpoint. The client can
//! also run in synthetic mode, producing deterministic documents with the
//! same shape for offline development.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, instrument};
use url::Url;

use super::endpoint;
use super::synthetic::{batch_size, SyntheticGenerator};
use crate::crawler::headers::ACCEPT_JSON;
use crate::crawler::{FetchClient, HttpFetcher};
use crate::models::{RawPayload, SortOrder, SourceQuery, SourceType};
use crate::utils::error::FetchError;

pub const STACK_EXCHANGE_API_BASE: &str = "https://api.stackexchange.com";

const MAX_PAGE_SIZE: u32 = 100;

const SORT_FIELDS: &[&str] = &["activity", "votes", "creation", "hot", "week", "month"];

#[derive(Debug)]
pub struct StackOverflowClient {
    fetcher: Arc<HttpFetcher>,
    base_url: String,
    site: String,
    timeout: Duration,
    synthetic: bool,
}

impl StackOverflowClient {
    pub fn new(fetcher: Arc<HttpFetcher>, timeout: Duration) -> Self {
        Self {
            fetcher,
            base_url: STACK_EXCHANGE_API_BASE.to_string(),
            site: "stackoverflow".to_string(),
            timeout,
            synthetic: false,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Generate documents locally instead of calling the API
    pub fn synthetic(mut self) -> Self {
        self.synthetic = true;
        self
    }

    /// Questions URL; the search string is a `;`-separated tag list
    pub fn build_url(&self, query: &SourceQuery) -> Result<Url, FetchError> {
        let page_size = query.max_results.clamp(1, MAX_PAGE_SIZE);
        let page = query.start / page_size + 1;
        let order = match query.sort_order {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        };
        let sort = query
            .sort_by
            .as_deref()
            .filter(|s| SORT_FIELDS.contains(s))
            .unwrap_or("activity");

        endpoint(
            &self.base_url,
            "2.3/questions",
            &[
                ("order", order.to_string()),
                ("sort", sort.to_string()),
                ("tagged", query.search.clone()),
                ("site", self.site.clone()),
                ("pagesize", page_size.to_string()),
                ("page", page.to_string()),
                ("filter", "withbody".to_string()),
            ],
        )
    }

    /// Deterministic document with the shape of a questions response
    pub fn generate(&self, query: &SourceQuery) -> Value {
        let mut generator = SyntheticGenerator::for_query("stackoverflow", query);
        let tags: Vec<&str> = query.search.split(';').map(str::trim).collect();

        let items: Vec<Value> = (0..batch_size(query))
            .map(|_| {
                let question_id = generator.identifier();
                let topic = generator.pick(&tags);
                let created = generator.timestamp_within(90);
                let last_activity = created + chrono::Duration::hours(generator.range(0, 72) as i64);
                json!({
                    "question_id": question_id,
                    "title": format!("How do I use {} with {}?", topic, generator.pick(&["async", "lifetimes", "traits", "generics"])),
                    "body": format!("<p>{}</p><pre><code>fn main() {{}}</code></pre>", generator.paragraph(topic)),
                    "tags": tags,
                    "owner": { "display_name": generator.person() },
                    "link": format!("https://stackoverflow.com/questions/{question_id}"),
                    "score": generator.range(0, 120),
                    "is_answered": generator.chance(0.6),
                    "creation_date": created.timestamp(),
                    "last_activity_date": last_activity.timestamp(),
                })
            })
            .collect();

        json!({
            "items": items,
            "has_more": false,
            "quota_max": 0,
            "quota_remaining": 0,
        })
    }
}

#[async_trait]
impl FetchClient for StackOverflowClient {
    fn source_type(&self) -> SourceType {
        SourceType::StackOverflow
    }

    fn is_synthetic(&self) -> bool {
        self.synthetic
    }

    #[instrument(skip(self), fields(tagged = %query.search, synthetic = self.synthetic))]
    async fn fetch(&self, query: &SourceQuery) -> Result<RawPayload, FetchError> {
        if self.synthetic {
            debug!("Generating synthetic Stack Overflow questions");
            return Ok(RawPayload::json(SourceType::StackOverflow, self.generate(query)).into_synthetic());
        }

        let url = self.build_url(query)?;
        let body = self
            .fetcher
            .get_json(&url, self.fetcher.headers(ACCEPT_JSON), self.timeout)
            .await?;
        Ok(RawPayload::json(SourceType::StackOverflow, body))
    }
}
