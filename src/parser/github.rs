//! GitHub repository search results

use serde_json::Value;

use super::normalize::{field_text, one_or_many, texts, timestamp_from_value};
use super::sanitize::clean_text;
use super::RecordDraft;
use crate::models::RecordLinks;
use crate::utils::error::ParseError;

/// Items of a `/search/repositories` response
pub fn parse(doc: &Value) -> Result<Vec<RecordDraft>, ParseError> {
    let Some(items) = doc.get("items") else {
        if let Some(message) = field_text(doc, &["message"]) {
            return Err(ParseError::RemoteError(message));
        }
        return Err(ParseError::MissingRoot {
            expected: "items".to_string(),
        });
    };

    Ok(one_or_many(Some(items)).into_iter().map(parse_repo).collect())
}

fn parse_repo(repo: &Value) -> RecordDraft {
    let mut links = field_text(repo, &["html_url"])
        .map(RecordLinks::primary)
        .unwrap_or_default();
    if let Some(homepage) = field_text(repo, &["homepage"]) {
        links.alternates.push(homepage);
    }

    let mut tags = texts(repo.get("topics"));
    if let Some(language) = field_text(repo, &["language"]) {
        tags.push(language.to_lowercase());
    }

    RecordDraft {
        id: field_text(repo, &["id", "node_id", "full_name"]),
        title: clean_text(&field_text(repo, &["full_name", "name"]).unwrap_or_default()),
        summary: clean_text(&field_text(repo, &["description"]).unwrap_or_default()),
        authors: repo
            .get("owner")
            .and_then(|owner| field_text(owner, &["login"]))
            .into_iter()
            .collect(),
        published_at: repo.get("created_at").and_then(timestamp_from_value),
        updated_at: repo
            .get("pushed_at")
            .or_else(|| repo.get("updated_at"))
            .and_then(timestamp_from_value),
        tags,
        links,
    }
}
