//! Payload parsing and normalization
//!
//! [`EntryParser`] turns a [`RawPayload`] into [`NormalizedRecord`]s. XML
//! payloads are first converted into a value tree by [`xml::to_value`]; each
//! source kind then has its own module that knows where titles, authors,
//! dates and links live in that source's documents.
//!
//! Checksums per source:
//!
//! | Source | Fingerprinted text |
//! |---|---|
//! | arxiv | title + summary |
//! | rss | title + description (Atom: title + summary or content) |
//! | github | full name + description |
//! | paperswithcode | title + abstract |
//! | stackoverflow | title + body text |

pub mod arxiv;
pub mod feed;
pub mod github;
pub mod normalize;
pub mod papers_with_code;
pub mod sanitize;
pub mod stackoverflow;
pub mod xml;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{debug, trace};

use crate::dedup::record_checksum;
use crate::models::{NormalizedRecord, PayloadBody, RawPayload, RecordLinks, SourceType};
use crate::utils::error::ParseError;

/// Fields extracted from one entry, before defaults and the checksum
#[derive(Debug, Default, Clone)]
pub struct RecordDraft {
    pub id: Option<String>,
    pub title: String,
    pub summary: String,
    pub authors: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub links: RecordLinks,
}

impl RecordDraft {
    /// Whether the entry carries any text worth keeping
    pub fn is_blank(&self) -> bool {
        self.title.is_empty() && self.summary.is_empty()
    }

    /// Apply defaults and compute the checksum
    ///
    /// Missing dates fall back to the fetch time; a missing identifier
    /// falls back to the checksum.
    pub fn finish(self, payload: &RawPayload) -> NormalizedRecord {
        let checksum = record_checksum(&self.title, &self.summary);
        let id = self
            .id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| checksum.to_string());

        NormalizedRecord {
            id,
            title: self.title,
            summary: self.summary,
            authors: self.authors,
            published_at: self.published_at.unwrap_or(payload.fetched_at),
            updated_at: self.updated_at.unwrap_or(payload.fetched_at),
            tags: normalize::dedupe_tags(self.tags),
            links: self.links,
            checksum,
            source_type: payload.source_type,
            synthetic: payload.synthetic,
            fetched_at: payload.fetched_at,
        }
    }
}

/// Dispatches payloads to the parser for their source kind
#[derive(Debug, Default, Clone, Copy)]
pub struct EntryParser;

impl EntryParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a payload into records, in document order
    ///
    /// An empty but well-formed document yields an empty vector. Entries
    /// with neither title nor summary are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when the payload is malformed, lacks the
    /// expected root, or reports a remote API error.
    pub fn parse(&self, payload: &RawPayload) -> Result<Vec<NormalizedRecord>, ParseError> {
        let drafts = match (payload.source_type, &payload.body) {
            (SourceType::Arxiv, PayloadBody::Xml(body)) => arxiv::parse(&xml::to_value(body)?)?,
            (SourceType::Rss, PayloadBody::Xml(body)) => feed::parse(&xml::to_value(body)?)?,
            (SourceType::Github, PayloadBody::Json(doc)) => github::parse(doc)?,
            (SourceType::PapersWithCode, PayloadBody::Json(doc)) => papers_with_code::parse(doc)?,
            (SourceType::StackOverflow, PayloadBody::Json(doc)) => stackoverflow::parse(doc)?,
            (source_type, body) => {
                return Err(ParseError::UnexpectedShape(format!(
                    "{source_type} payload cannot be {}",
                    match body {
                        PayloadBody::Xml(_) => "XML",
                        PayloadBody::Json(_) => "JSON",
                    }
                )))
            }
        };

        let total = drafts.len();
        let records: Vec<NormalizedRecord> = drafts
            .into_iter()
            .filter(|draft| {
                if draft.is_blank() {
                    trace!(id = ?draft.id, "Skipping entry without title or summary");
                    return false;
                }
                true
            })
            .map(|draft| draft.finish(payload))
            .collect();

        debug!(
            source_type = %payload.source_type,
            entries = total,
            records = records.len(),
            "Parsed payload"
        );

        Ok(records)
    }

    /// Parse a JSON document body given as text
    pub fn parse_json_str(
        &self,
        source_type: SourceType,
        body: &str,
    ) -> Result<Vec<NormalizedRecord>, ParseError> {
        let doc: Value = serde_json::from_str(body)?;
        self.parse(&RawPayload::json(source_type, doc))
    }
}
