//! arXiv Atom feed entries

use serde_json::Value;

use super::normalize::{attr, field_text, link_refs, one_or_many, parse_timestamp, select_links, text};
use super::sanitize::clean_text;
use super::RecordDraft;
use crate::utils::error::ParseError;

const ABS_PREFIXES: &[&str] = &[
    "http://arxiv.org/abs/",
    "https://arxiv.org/abs/",
    "http://export.arxiv.org/abs/",
];

/// Identifier without the abstract-page prefix, e.g. `2401.00001v1`
pub fn arxiv_id(raw: &str) -> String {
    let raw = raw.trim();
    ABS_PREFIXES
        .iter()
        .find_map(|prefix| raw.strip_prefix(prefix))
        .unwrap_or(raw)
        .to_string()
}

/// Entries of an arXiv API response
///
/// A response without entries is empty, not an error. The API reports bad
/// queries as a single entry whose id points at `/api/errors`; that entry
/// becomes [`ParseError::RemoteError`].
pub fn parse(doc: &Value) -> Result<Vec<RecordDraft>, ParseError> {
    let feed = doc.get("feed").ok_or_else(|| ParseError::MissingRoot {
        expected: "feed".to_string(),
    })?;

    one_or_many(feed.get("entry"))
        .into_iter()
        .map(parse_entry)
        .collect()
}

fn parse_entry(entry: &Value) -> Result<RecordDraft, ParseError> {
    let raw_id = field_text(entry, &["id"]).unwrap_or_default();
    let summary = clean_text(&field_text(entry, &["summary"]).unwrap_or_default());

    if raw_id.contains("/api/errors") {
        return Err(ParseError::RemoteError(summary));
    }

    let id = arxiv_id(&raw_id);
    let authors = one_or_many(entry.get("author"))
        .into_iter()
        .filter_map(|author| field_text(author, &["name"]).or_else(|| text(author)))
        .map(|name| clean_text(&name))
        .filter(|name| !name.is_empty())
        .collect();

    // primary category first, then the rest in document order
    let mut tags: Vec<String> = entry
        .get("arxiv:primary_category")
        .and_then(|c| attr(c, "term"))
        .map(|t| vec![t.to_string()])
        .unwrap_or_default();
    tags.extend(
        one_or_many(entry.get("category"))
            .into_iter()
            .filter_map(|c| attr(c, "term"))
            .map(str::to_string),
    );

    let mut links = select_links(&link_refs(entry.get("link")));
    if links.primary.is_empty() && !id.is_empty() {
        links.primary = format!("https://arxiv.org/abs/{id}");
    }
    if let Some(doi) = field_text(entry, &["arxiv:doi"]) {
        let doi_url = format!("https://doi.org/{doi}");
        if !links.alternates.iter().any(|l| l.ends_with(doi.as_str())) {
            links.alternates.push(doi_url);
        }
    }

    Ok(RecordDraft {
        id: Some(id).filter(|id| !id.is_empty()),
        title: clean_text(&field_text(entry, &["title"]).unwrap_or_default()),
        summary,
        authors,
        published_at: field_text(entry, &["published"]).and_then(|s| parse_timestamp(&s)),
        updated_at: field_text(entry, &["updated"]).and_then(|s| parse_timestamp(&s)),
        tags,
        links,
    })
}
