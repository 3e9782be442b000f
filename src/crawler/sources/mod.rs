//! Fetch clients, one per source kind

pub mod arxiv;
pub mod github;
pub mod papers_with_code;
pub mod rss;
pub mod stackoverflow;
pub mod synthetic;

use std::sync::Arc;

use url::Url;

use crate::config::SourceConfig;
use crate::crawler::{FetchClient, HttpFetcher};
use crate::models::SourceType;
use crate::utils::error::FetchError;

pub use arxiv::ArxivClient;
pub use github::GithubClient;
pub use papers_with_code::PapersWithCodeClient;
pub use rss::RssClient;
pub use stackoverflow::StackOverflowClient;

/// Build the fetch client for a configured source
pub fn build_client(
    source: &SourceConfig,
    fetcher: Arc<HttpFetcher>,
    github_token: Option<&str>,
) -> Box<dyn FetchClient> {
    let timeout = source.effective_policy().timeout();
    let base_url = source.base_url.as_deref();

    match source.kind {
        SourceType::Arxiv => {
            let mut client = ArxivClient::new(fetcher, timeout);
            if let Some(base) = base_url {
                client = client.with_base_url(base);
            }
            Box::new(client)
        }
        SourceType::Github => {
            let mut client = GithubClient::new(fetcher, timeout);
            if let Some(base) = base_url {
                client = client.with_base_url(base);
            }
            if let Some(token) = github_token {
                client = client.with_token(token);
            }
            Box::new(client)
        }
        SourceType::Rss => Box::new(RssClient::new(fetcher, timeout)),
        SourceType::PapersWithCode => Box::new(PapersWithCodeClient::new()),
        SourceType::StackOverflow => {
            let mut client = StackOverflowClient::new(fetcher, timeout);
            if let Some(base) = base_url {
                client = client.with_base_url(base);
            }
            if source.synthetic {
                client = client.synthetic();
            }
            Box::new(client)
        }
    }
}

/// Join an API path onto a base URL and append query parameters
pub(crate) fn endpoint(base: &str, path: &str, params: &[(&str, String)]) -> Result<Url, FetchError> {
    let raw = format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'));
    Url::parse_with_params(&raw, params).map_err(|e| FetchError::InvalidUrl(format!("{raw}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SourceQuery;

    #[test]
    fn test_endpoint_joins_and_encodes() {
        let url = endpoint(
            "http://export.arxiv.org/",
            "/api/query",
            &[("search_query", "cat:cs.AI AND ti:llm".to_string())],
        )
        .unwrap();
        assert_eq!(url.path(), "/api/query");
        assert_eq!(
            url.query_pairs().next().unwrap().1,
            "cat:cs.AI AND ti:llm"
        );
    }

    #[test]
    fn test_build_client_kinds() {
        let fetcher = Arc::new(HttpFetcher::new("test", 10).unwrap());
        for kind in SourceType::all() {
            let source = SourceConfig::new(kind.as_str(), kind, vec![SourceQuery::new("x")]);
            let client = build_client(&source, Arc::clone(&fetcher), None);
            assert_eq!(client.source_type(), kind);
            assert_eq!(client.is_synthetic(), kind == SourceType::PapersWithCode);
        }
    }

    #[test]
    fn test_synthetic_stackoverflow() {
        let fetcher = Arc::new(HttpFetcher::new("test", 10).unwrap());
        let mut source = SourceConfig::new("so", SourceType::StackOverflow, vec![]);
        source.synthetic = true;
        assert!(build_client(&source, fetcher, None).is_synthetic());
    }
}
