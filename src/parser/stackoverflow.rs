//! Stack Exchange question listings

use serde_json::Value;

use super::normalize::{field_text, one_or_many, texts, timestamp_from_value};
use super::sanitize::{clean_text, html_to_text};
use super::RecordDraft;
use crate::models::RecordLinks;
use crate::utils::error::ParseError;

/// Items of a `/questions` response
///
/// Titles and owner names arrive HTML-encoded; bodies are HTML.
pub fn parse(doc: &Value) -> Result<Vec<RecordDraft>, ParseError> {
    if doc.get("error_id").is_some() {
        let name = field_text(doc, &["error_name"]).unwrap_or_default();
        let message = field_text(doc, &["error_message"]).unwrap_or_default();
        return Err(ParseError::RemoteError(format!("{name}: {message}")));
    }

    let items = doc.get("items").ok_or_else(|| ParseError::MissingRoot {
        expected: "items".to_string(),
    })?;

    Ok(one_or_many(Some(items)).into_iter().map(parse_question).collect())
}

fn parse_question(question: &Value) -> RecordDraft {
    let updated = question
        .get("last_edit_date")
        .or_else(|| question.get("last_activity_date"))
        .and_then(timestamp_from_value);

    RecordDraft {
        id: field_text(question, &["question_id"]),
        title: clean_text(&field_text(question, &["title"]).unwrap_or_default()),
        summary: html_to_text(&field_text(question, &["body"]).unwrap_or_default()),
        authors: question
            .get("owner")
            .and_then(|owner| field_text(owner, &["display_name"]))
            .map(|name| clean_text(&name))
            .into_iter()
            .collect(),
        published_at: question.get("creation_date").and_then(timestamp_from_value),
        updated_at: updated,
        tags: texts(question.get("tags")),
        links: field_text(question, &["link"])
            .map(RecordLinks::primary)
            .unwrap_or_default(),
    }
}
