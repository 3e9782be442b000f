//! Content fingerprints and in-batch deduplication
//!
//! A [`Checksum`] is the SHA-256 of normalized record text and serves as a
//! stable identity surrogate: it never depends on fetch time or on the
//! identifier a source assigns, so re-fetching an unchanged item yields the
//! same value and downstream upserts stay idempotent.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::NormalizedRecord;

/// Lowercase hex SHA-256 digest (64 characters)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checksum(String);

impl Checksum {
    /// Hex representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build from a stored hex string
    pub fn from_hex(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fingerprint a piece of normalized text
pub fn checksum(text: &str) -> Checksum {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    Checksum(format!("{:x}", hasher.finalize()))
}

/// Fingerprint the concatenation of a record's title and body text
///
/// The body is whatever field a source documents as its summary
/// (abstract, description, question body).
pub fn record_checksum(title: &str, body: &str) -> Checksum {
    checksum(&format!("{title}{body}"))
}

/// Drops records whose checksum has already been seen
#[derive(Debug, Default)]
pub struct DedupFilter {
    seen: HashSet<Checksum>,
}

impl DedupFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep first occurrences in source order, returning how many were dropped
    pub fn retain_new(&mut self, records: &mut Vec<NormalizedRecord>) -> usize {
        let before = records.len();
        records.retain(|record| self.seen.insert(record.checksum.clone()));
        before - records.len()
    }
}
