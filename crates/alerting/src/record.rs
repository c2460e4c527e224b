//! Alert Record Implementation

use crate::metadata::AlertMetadata;
use serde::Serialize;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Trailing fragments left on headers by truncated feed entries
pub const BAD_HEADER_SUFFIXES: &[&str] = &[": There i", " f", " v"];

/// Separator between an embedded header and the rest of a description
const HEADER_SEPARATOR: &str = ": ";

/// Content key of an alert. Two records with the same key are the same alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlertKey<'a> {
    pub header: &'a str,
    pub description: &'a str,
}

/// A normalized service alert
///
/// Immutable once constructed. Equality and hashing only consider
/// `header` and `description`; metadata is carried along for display.
#[derive(Debug, Clone, Serialize)]
pub struct AlertRecord {
    header: String,
    description: String,
    #[serde(flatten)]
    metadata: AlertMetadata,
}

impl AlertRecord {
    /// Create a normalized record from raw header and description text
    pub fn new(header: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_metadata(header, description, AlertMetadata::default())
    }

    /// Create a normalized record with decoded metadata attached
    pub fn with_metadata(
        header: impl Into<String>,
        description: impl Into<String>,
        metadata: AlertMetadata,
    ) -> Self {
        let header = header.into();
        let header = strip_bad_suffixes(header.trim()).to_string();
        let (header, description) = collapse_embedded_header(header, description.into());

        Self {
            header,
            description,
            metadata,
        }
    }

    /// Alert title
    pub fn header(&self) -> &str {
        &self.header
    }

    /// Alert body text
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Decoded metadata
    pub fn metadata(&self) -> &AlertMetadata {
        &self.metadata
    }

    /// Content key used for set and map membership
    pub fn key(&self) -> AlertKey<'_> {
        AlertKey {
            header: &self.header,
            description: &self.description,
        }
    }
}

impl PartialEq for AlertRecord {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for AlertRecord {}

impl Hash for AlertRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for AlertRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Header: {}, Description: {}", self.header, self.description)
    }
}

/// Remove known truncation artifacts until none remain
fn strip_bad_suffixes(mut header: &str) -> &str {
    loop {
        let before = header.len();
        for suffix in BAD_HEADER_SUFFIXES {
            if let Some(stripped) = header.strip_suffix(suffix) {
                header = stripped;
            }
        }
        if header.len() == before {
            return header;
        }
    }
}

/// Re-split a description that repeats the header as `"<header>: ..."`.
///
/// The new header is the description text before its first `": "`, the new
/// description is everything after it.
fn collapse_embedded_header(header: String, description: String) -> (String, String) {
    if header.is_empty() {
        return (header, description);
    }

    let embedded = description
        .strip_prefix(header.as_str())
        .is_some_and(|rest| rest.starts_with(HEADER_SEPARATOR));
    if !embedded {
        return (header, description);
    }

    match description.split_once(HEADER_SEPARATOR) {
        Some((head, rest)) => (strip_bad_suffixes(head).to_string(), rest.to_string()),
        None => (header, description),
    }
}
