//! Shared HTTP fetcher with request pacing and charset detection
//!
//! Every live fetch client goes through one [`HttpFetcher`]. It provides:
//! - A single reqwest client with gzip support
//! - Request pacing with governor (requests per second across all sources)
//! - Polite identification headers
//! - Charset detection from the Content-Type header or the XML declaration
//!
//! Retries and per-source rate windows live in
//! [`RequestPolicy`](crate::utils::retry::RequestPolicy); the fetcher makes
//! exactly one request per call.

use crate::config::Config;
use crate::crawler::headers::build_polite_headers;
use crate::utils::error::FetchError;
use encoding_rs::{Encoding, UTF_8};
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use reqwest::{header::HeaderMap, Client, Response};
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// HTTP fetcher shared by the live source clients
pub struct HttpFetcher {
    /// HTTP client with compression enabled
    client: Client,

    /// Process-wide request pacing
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    /// Identifying user agent, contact included
    user_agent: String,

    /// Address sent in the `From` header
    contact: Option<String>,
}

impl std::fmt::Debug for HttpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpFetcher")
            .field("user_agent", &self.user_agent)
            .field("contact", &self.contact)
            .finish_non_exhaustive()
    }
}

impl HttpFetcher {
    /// Create a new fetcher
    ///
    /// # Arguments
    ///
    /// * `user_agent` - Identifying user agent string
    /// * `requests_per_second` - Maximum number of requests per second
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new(user_agent: impl Into<String>, requests_per_second: u32) -> Result<Self, FetchError> {
        let client = Client::builder().gzip(true).build()?;

        let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(rate));

        Ok(Self {
            client,
            rate_limiter,
            user_agent: user_agent.into(),
            contact: None,
        })
    }

    /// Create a fetcher from the crawler section of the configuration
    pub fn from_config(config: &Config) -> Result<Self, FetchError> {
        let mut fetcher = Self::new(config.user_agent(), config.crawler.requests_per_second)?;
        fetcher.contact = config.crawler.contact.clone();
        Ok(fetcher)
    }

    /// Set the contact address sent in the `From` header
    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact = Some(contact.into());
        self
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Base identification headers with the given `Accept` value
    pub fn headers(&self, accept: &str) -> HeaderMap {
        build_polite_headers(&self.user_agent, self.contact.as_deref(), accept)
    }

    /// GET a URL and return the decoded body
    ///
    /// # Errors
    ///
    /// - `FetchError::Timeout` when the request exceeds `timeout`
    /// - `FetchError::Status` for any non-2xx response
    /// - `FetchError::Http` for other transport failures
    pub async fn get_text(
        &self,
        url: &Url,
        headers: HeaderMap,
        timeout: Duration,
    ) -> Result<String, FetchError> {
        let response = self.send(url, headers, timeout).await?;
        self.decode_response(response, timeout).await
    }

    /// GET a URL and parse the body as JSON
    ///
    /// A body that is not valid JSON is reported as `FetchError::Decode`.
    pub async fn get_json(
        &self,
        url: &Url,
        headers: HeaderMap,
        timeout: Duration,
    ) -> Result<serde_json::Value, FetchError> {
        let text = self.get_text(url, headers, timeout).await?;
        serde_json::from_str(&text)
            .map_err(|e| FetchError::Decode(format!("invalid JSON from {url}: {e}")))
    }

    async fn send(
        &self,
        url: &Url,
        headers: HeaderMap,
        timeout: Duration,
    ) -> Result<Response, FetchError> {
        self.rate_limiter.until_ready().await;

        debug!(url = %url, "Sending request");

        let response = self
            .client
            .get(url.clone())
            .headers(headers)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| FetchError::from_reqwest(e, timeout))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(response)
    }

    async fn decode_response(
        &self,
        response: Response,
        timeout: Duration,
    ) -> Result<String, FetchError> {
        // Get Content-Type header and convert to owned String before consuming response
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
            .unwrap_or_default();

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::from_reqwest(e, timeout))?;

        Ok(decode_bytes(&bytes, &content_type))
    }
}

/// Decode bytes to a UTF-8 string
///
/// The charset is taken from, in order:
/// 1. A byte order mark
/// 2. The `charset` parameter of the Content-Type header
/// 3. The `encoding` attribute of an XML declaration
/// 4. UTF-8
///
/// Malformed sequences are replaced rather than rejected; feeds in the
/// wild frequently contain a stray byte or two.
pub fn decode_bytes(bytes: &[u8], content_type: &str) -> String {
    let encoding = charset_from_content_type(content_type)
        .or_else(|| charset_from_xml_declaration(bytes))
        .unwrap_or(UTF_8);

    // decode() sniffs a BOM before falling back to `encoding`
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        warn!(encoding = used.name(), "Body contained malformed sequences");
    }
    text.into_owned()
}

fn charset_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| param.split_once('='))
        .find(|(key, _)| key.trim().eq_ignore_ascii_case("charset"))
        .and_then(|(_, value)| Encoding::for_label(value.trim().trim_matches('"').as_bytes()))
}

fn charset_from_xml_declaration(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(256)];
    let head = String::from_utf8_lossy(head);
    if !head.trim_start_matches('\u{feff}').starts_with("<?xml") {
        return None;
    }
    let declaration = &head[..head.find("?>")?];
    let start = declaration.find("encoding=")? + "encoding=".len();
    let rest = &declaration[start..];
    let quote = rest.chars().next()?;
    if quote != '"' && quote != '\'' {
        return None;
    }
    let value = rest[1..].split(quote).next()?;
    Encoding::for_label(value.as_bytes())
}
