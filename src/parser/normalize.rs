//! Field access helpers shared by the per-source parsers
//!
//! Payload trees have loose shapes: a field can be missing, a scalar, a list,
//! or an element object with attributes and `#text`. These helpers collapse
//! those shapes into plain Rust values.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::Value;

use super::xml::TEXT_KEY;
use crate::models::RecordLinks;

/// Coerce a scalar-or-list field into a sequence. Missing and null are empty.
pub fn one_or_many(value: Option<&Value>) -> Vec<&Value> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items.iter().collect(),
        Some(other) => vec![other],
    }
}

/// Text content of a value
///
/// Strings are returned as-is, numbers and booleans are formatted, element
/// objects yield their `#text`.
pub fn text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Object(map) => map.get(TEXT_KEY).and_then(text),
        Value::Array(items) => items.first().and_then(text),
        Value::Null => None,
    }
}

/// First non-empty text among the named fields
pub fn field_text(value: &Value, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| value.get(*name))
        .filter_map(text)
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

/// First present field among the named ones
pub fn field<'a>(value: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| value.get(*name))
        .find(|v| !v.is_null())
}

/// Attribute of an element object
pub fn attr<'a>(value: &'a Value, name: &str) -> Option<&'a str> {
    value.get(format!("@{name}")).and_then(Value::as_str)
}

/// Texts of a scalar-or-list field, empty entries dropped
pub fn texts(value: Option<&Value>) -> Vec<String> {
    one_or_many(value)
        .into_iter()
        .filter_map(text)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Remove repeated tags, keeping the first occurrence
pub fn dedupe_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    tags.into_iter()
        .filter(|t| seen.insert(t.to_lowercase()))
        .collect()
}

/// Parse the date formats found in feeds and APIs
///
/// Accepts RFC 3339, RFC 2822, naive date-times (taken as UTC), plain
/// dates (midnight UTC) and Unix timestamps.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
    }
    if raw.chars().all(|c| c.is_ascii_digit()) {
        return raw.parse::<i64>().ok().and_then(|secs| Utc.timestamp_opt(secs, 0).single());
    }

    None
}

/// Timestamp from a JSON value: Unix seconds or a date string
pub fn timestamp_from_value(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::Number(n) => n.as_i64().and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        other => text(other).and_then(|s| parse_timestamp(&s)),
    }
}

/// A link element reduced to the attributes link selection needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    pub href: String,
    pub rel: Option<String>,
    pub title: Option<String>,
    pub mime: Option<String>,
}

impl LinkRef {
    pub fn plain(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            rel: None,
            title: None,
            mime: None,
        }
    }

    fn is_pdf(&self) -> bool {
        self.title.as_deref() == Some("pdf")
            || self.mime.as_deref() == Some("application/pdf")
            || (self.rel.as_deref() == Some("related") && self.href.ends_with(".pdf"))
    }

    fn is_alternate(&self) -> bool {
        matches!(self.rel.as_deref(), None | Some("alternate"))
    }
}

/// Link elements from a scalar-or-list field
///
/// Handles Atom links (`href`, `rel`, `title`, `type` attributes) and RSS
/// links (the URL as element text).
pub fn link_refs(value: Option<&Value>) -> Vec<LinkRef> {
    one_or_many(value)
        .into_iter()
        .filter_map(|link| {
            let href = attr(link, "href")
                .map(str::to_string)
                .or_else(|| text(link))?
                .trim()
                .to_string();
            if href.is_empty() {
                return None;
            }
            Some(LinkRef {
                href,
                rel: attr(link, "rel").map(str::to_string),
                title: attr(link, "title").map(str::to_string),
                mime: attr(link, "type").map(str::to_string),
            })
        })
        .collect()
}

/// Choose the primary link and PDF link
///
/// The primary link is the first `rel="alternate"` (or rel-less) link that
/// is not a PDF, falling back to the first link of any kind. The PDF link is
/// the first link titled `pdf` or typed `application/pdf`. Everything else
/// is kept as an alternate.
pub fn select_links(links: &[LinkRef]) -> RecordLinks {
    let pdf_index = links.iter().position(LinkRef::is_pdf);
    let primary_index = links
        .iter()
        .enumerate()
        .position(|(i, l)| Some(i) != pdf_index && l.is_alternate())
        .or_else(|| links.iter().enumerate().position(|(i, _)| Some(i) != pdf_index))
        .or(pdf_index);

    let mut selected = RecordLinks::default();
    for (i, link) in links.iter().enumerate() {
        if Some(i) == primary_index {
            selected.primary = link.href.clone();
        } else if Some(i) == pdf_index {
            selected.pdf = Some(link.href.clone());
        } else if !selected.alternates.contains(&link.href) {
            selected.alternates.push(link.href.clone());
        }
    }
    selected
}
