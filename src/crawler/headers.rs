use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, FROM, USER_AGENT};

/// Accept header for Atom feeds such as the arXiv API
pub const ACCEPT_ATOM: &str = "application/atom+xml, application/xml;q=0.9, */*;q=0.5";

/// Accept header for arbitrary syndication feeds
pub const ACCEPT_FEED: &str =
    "application/rss+xml, application/atom+xml, application/rdf+xml, application/xml;q=0.9, text/xml;q=0.8, */*;q=0.5";

/// Accept header for plain JSON APIs
pub const ACCEPT_JSON: &str = "application/json";

/// Accept header recommended by the GitHub REST API
pub const ACCEPT_GITHUB: &str = "application/vnd.github+json";

/// Build identification headers sent with every crawl request
///
/// Remote services that ask for polite crawling want to know who is
/// calling; the user agent names the crawler and, when a contact address
/// is configured, it is also sent in the `From` header.
///
/// # Examples
///
/// ```
/// use crawlhub::crawler::headers::{build_polite_headers, ACCEPT_ATOM};
///
/// let headers = build_polite_headers("crawlhub/0.1", Some("ops@example.org"), ACCEPT_ATOM);
/// assert!(headers.contains_key(reqwest::header::FROM));
/// ```
pub fn build_polite_headers(user_agent: &str, contact: Option<&str>, accept: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();

    if let Ok(value) = HeaderValue::from_str(user_agent) {
        headers.insert(USER_AGENT, value);
    }
    if let Ok(value) = HeaderValue::from_str(accept) {
        headers.insert(ACCEPT, value);
    }
    if let Some(contact) = contact {
        if let Ok(value) = HeaderValue::from_str(contact) {
            headers.insert(FROM, value);
        }
    }

    headers
}

/// Extra headers for the GitHub REST API
///
/// Adds the API version pin and, when present, a bearer token.
pub fn github_headers(token: Option<&str>) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("x-github-api-version"),
        HeaderValue::from_static("2022-11-28"),
    );
    if let Some(token) = token {
        if let Ok(value) = HeaderValue::from_str(&format!("Bearer {token}")) {
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }
    }
    headers
}
