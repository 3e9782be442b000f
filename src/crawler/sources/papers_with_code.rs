//! Papers-with-Code placeholder client
//!
//! There is no stable public API to crawl, so this client only generates
//! deterministic payloads shaped like the `/papers/` listing. Every payload
//! is flagged synthetic.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::synthetic::{batch_size, SyntheticGenerator};
use crate::crawler::FetchClient;
use crate::models::{RawPayload, SourceQuery, SourceType};
use crate::utils::error::FetchError;

#[derive(Debug, Default)]
pub struct PapersWithCodeClient;

impl PapersWithCodeClient {
    pub fn new() -> Self {
        Self
    }

    /// Listing document for a query
    pub fn generate(&self, query: &SourceQuery) -> Value {
        let mut generator = SyntheticGenerator::for_query("paperswithcode", query);
        let results: Vec<Value> = (0..batch_size(query))
            .map(|_| paper(&mut generator, &query.search))
            .collect();

        json!({
            "count": query.start as usize + results.len(),
            "next": null,
            "previous": null,
            "results": results,
        })
    }
}

fn paper(generator: &mut SyntheticGenerator, topic: &str) -> Value {
    let arxiv_id = format!(
        "{:02}{:02}.{:05}",
        generator.range(19, 23),
        generator.range(1, 12),
        generator.range(1, 99_999)
    );
    let slug_id = generator.identifier();
    let title = generator.title(topic);
    let slug = title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    let mut authors = generator.people(1, 4);
    // single-author papers carry a bare string instead of a list
    let authors = if authors.len() == 1 {
        Value::String(authors.remove(0))
    } else {
        json!(authors)
    };

    json!({
        "id": format!("{slug}-{slug_id}"),
        "arxiv_id": arxiv_id,
        "url_abs": format!("https://arxiv.org/abs/{arxiv_id}"),
        "url_pdf": format!("https://arxiv.org/pdf/{arxiv_id}.pdf"),
        "title": title,
        "abstract": generator.paragraph(topic),
        "authors": authors,
        "published": generator.timestamp_within(365).format("%Y-%m-%d").to_string(),
        "tasks": [generator.pick(&["Representation Learning", "Benchmarking", "Transfer Learning"])],
        "proceeding": null,
    })
}

#[async_trait]
impl FetchClient for PapersWithCodeClient {
    fn source_type(&self) -> SourceType {
        SourceType::PapersWithCode
    }

    fn is_synthetic(&self) -> bool {
        true
    }

    async fn fetch(&self, query: &SourceQuery) -> Result<RawPayload, FetchError> {
        debug!(search = %query.search, "Generating synthetic Papers-with-Code listing");
        Ok(RawPayload::json(SourceType::PapersWithCode, self.generate(query)).into_synthetic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_is_deterministic() {
        let client = PapersWithCodeClient::new();
        let query = SourceQuery::new("machine learning").with_max_results(3);
        assert_eq!(client.generate(&query), client.generate(&query));
    }

    #[test]
    fn test_generate_shape() {
        let client = PapersWithCodeClient::new();
        let doc = client.generate(&SourceQuery::new("graphs").with_max_results(4));
        let results = doc["results"].as_array().unwrap();

        assert_eq!(results.len(), 4);
        for paper in results {
            assert!(paper["title"].as_str().unwrap().contains("graphs"));
            assert!(paper["url_pdf"].as_str().unwrap().ends_with(".pdf"));
            assert!(paper["authors"].is_string() || paper["authors"].is_array());
        }
    }

    #[test]
    fn test_generate_capped_at_page_size() {
        let client = PapersWithCodeClient::new();
        let doc = client.generate(&SourceQuery::new("graphs").with_max_results(4_000_000_000));
        assert_eq!(doc["results"].as_array().unwrap().len(), 100);
    }

    #[tokio::test]
    async fn test_fetch_is_synthetic() {
        let client = PapersWithCodeClient::new();
        let payload = client.fetch(&SourceQuery::new("nlp")).await.unwrap();
        assert!(payload.synthetic);
        assert_eq!(payload.source_type, SourceType::PapersWithCode);
    }
}
