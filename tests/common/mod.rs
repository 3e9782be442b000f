//! Common test utilities
#![allow(dead_code)]

pub mod fixtures;

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crawlhub::crawler::{FetchClient, SourceRunner};
use crawlhub::error::FetchError;
use crawlhub::models::{RawPayload, SourceQuery, SourceType};
use crawlhub::utils::rate_limit::RateLimitConfig;
use crawlhub::utils::retry::{RequestPolicy, RetryConfig};

/// Policy without delays or rate limits
pub fn fast_policy(max_retries: u32) -> RequestPolicy {
    RequestPolicy::new(
        RetryConfig::fixed(max_retries, 0),
        RateLimitConfig::unlimited(),
        Duration::from_secs(5),
    )
}

/// Runner around a client with [`fast_policy`]
pub fn runner(
    name: &str,
    client: impl FetchClient + 'static,
    max_retries: u32,
    queries: Vec<SourceQuery>,
) -> SourceRunner {
    SourceRunner::new(name, Box::new(client), fast_policy(max_retries), queries)
        .with_request_delay(Duration::ZERO)
}

#[derive(Debug, Clone)]
enum Body {
    Xml(String),
    Json(Value),
}

/// Returns the same document for every query and counts calls
#[derive(Debug, Clone)]
pub struct FixtureClient {
    source_type: SourceType,
    body: Body,
    calls: Arc<AtomicU32>,
}

impl FixtureClient {
    pub fn xml(source_type: SourceType, body: &str) -> Self {
        Self {
            source_type,
            body: Body::Xml(body.to_string()),
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn json(source_type: SourceType, body: &str) -> Self {
        Self {
            source_type,
            body: Body::Json(serde_json::from_str(body).expect("fixture must be valid JSON")),
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Shared call counter, readable after the client is boxed
    pub fn calls(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl FetchClient for FixtureClient {
    fn source_type(&self) -> SourceType {
        self.source_type
    }

    async fn fetch(&self, _query: &SourceQuery) -> Result<RawPayload, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(match &self.body {
            Body::Xml(xml) => RawPayload::xml(self.source_type, xml.clone()),
            Body::Json(doc) => RawPayload::json(self.source_type, doc.clone()),
        })
    }
}

/// Fails with an HTTP status for the first `failures` calls, then delegates
#[derive(Debug, Clone)]
pub struct FailingClient {
    inner: FixtureClient,
    status: u16,
    failures: u32,
    calls: Arc<AtomicU32>,
}

impl FailingClient {
    /// Never succeeds
    pub fn always(source_type: SourceType, status: u16) -> Self {
        Self::times(FixtureClient::json(source_type, "{}"), status, u32::MAX)
    }

    /// Fails `failures` times before returning the fixture
    pub fn times(inner: FixtureClient, status: u16, failures: u32) -> Self {
        Self {
            inner,
            status,
            failures,
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn calls(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl FetchClient for FailingClient {
    fn source_type(&self) -> SourceType {
        self.inner.source_type
    }

    async fn fetch(&self, query: &SourceQuery) -> Result<RawPayload, FetchError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures {
            return Err(FetchError::Status {
                status: self.status,
                url: format!("https://mock.invalid/{}", self.inner.source_type),
            });
        }
        self.inner.fetch(query).await
    }
}
