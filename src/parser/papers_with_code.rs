//! Papers-with-Code paper listings

use serde_json::Value;

use super::normalize::{field_text, one_or_many, texts, timestamp_from_value};
use super::sanitize::clean_text;
use super::RecordDraft;
use crate::models::RecordLinks;
use crate::utils::error::ParseError;

/// Entries of a paper listing; `authors` may be a string or a list
pub fn parse(doc: &Value) -> Result<Vec<RecordDraft>, ParseError> {
    let results = doc.get("results").ok_or_else(|| ParseError::MissingRoot {
        expected: "results".to_string(),
    })?;

    Ok(one_or_many(Some(results)).into_iter().map(parse_paper).collect())
}

fn parse_paper(paper: &Value) -> RecordDraft {
    let mut links = field_text(paper, &["url_abs", "paper_url"])
        .map(RecordLinks::primary)
        .unwrap_or_default();
    links.pdf = field_text(paper, &["url_pdf"]);

    RecordDraft {
        id: field_text(paper, &["id", "arxiv_id"]),
        title: clean_text(&field_text(paper, &["title"]).unwrap_or_default()),
        summary: clean_text(&field_text(paper, &["abstract"]).unwrap_or_default()),
        authors: texts(paper.get("authors")),
        published_at: paper.get("published").and_then(timestamp_from_value),
        updated_at: None,
        tags: texts(paper.get("tasks")),
        links,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_authors_string_or_list() {
        let doc = json!({"results": [
            {"id": "a", "title": "One", "abstract": "x", "authors": "Solo Author"},
            {"id": "b", "title": "Two", "abstract": "y", "authors": ["A", "B"]},
            {"id": "c", "title": "Three", "abstract": "z", "authors": null}
        ]});

        let drafts = parse(&doc).unwrap();
        assert_eq!(drafts[0].authors, vec!["Solo Author"]);
        assert_eq!(drafts[1].authors, vec!["A", "B"]);
        assert!(drafts[2].authors.is_empty());
    }

    #[test]
    fn test_links_and_date() {
        let doc = json!({"results": [{
            "id": "p", "title": "T", "abstract": "A",
            "url_abs": "https://arxiv.org/abs/2101.00001",
            "url_pdf": "https://arxiv.org/pdf/2101.00001.pdf",
            "published": "2021-01-01",
            "tasks": ["Benchmarking"]
        }]});

        let draft = &parse(&doc).unwrap()[0];
        assert_eq!(draft.links.primary, "https://arxiv.org/abs/2101.00001");
        assert_eq!(draft.links.pdf.as_deref(), Some("https://arxiv.org/pdf/2101.00001.pdf"));
        assert!(draft.published_at.is_some());
        assert_eq!(draft.tags, vec!["Benchmarking"]);
    }

    #[test]
    fn test_missing_results() {
        assert!(matches!(
            parse(&json!({"count": 0})),
            Err(ParseError::MissingRoot { .. })
        ));
    }
}
