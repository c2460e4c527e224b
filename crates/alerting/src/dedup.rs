//! Near-Duplicate Suppression
//!
//! The feed repeats the same event with descriptions of varying completeness.
//! Records are processed longest-first, and a record whose text is contained in
//! an already accepted record is dropped, so the most complete version wins.

use crate::record::AlertRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;
use tracing::{debug, info};

/// Field compared for containment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupField {
    Header,
    #[default]
    Description,
}

impl DedupField {
    /// Read this field from a record
    pub fn value<'a>(&self, record: &'a AlertRecord) -> &'a str {
        match self {
            Self::Header => record.header(),
            Self::Description => record.description(),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Description => "description",
        }
    }
}

impl fmt::Display for DedupField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Containment-based alert deduplicator
#[derive(Debug, Clone, Copy, Default)]
pub struct Deduplicator {
    field: DedupField,
}

impl Deduplicator {
    /// Create a deduplicator comparing the given field
    pub fn new(field: DedupField) -> Self {
        Self { field }
    }

    /// Reduce `records` to the maximal subset where no kept record's field is a
    /// substring of another kept record's field.
    ///
    /// The result is ordered longest field first. Among equal lengths the input
    /// order is kept, so of two identical records the earlier one survives.
    pub fn dedup(&self, records: Vec<AlertRecord>) -> Vec<AlertRecord> {
        let total = records.len();
        let mut sorted = records;
        sorted.sort_by_key(|record| Reverse(self.field.value(record).chars().count()));

        let mut kept: Vec<AlertRecord> = Vec::with_capacity(sorted.len());
        for record in sorted {
            let text = self.field.value(&record);
            if kept.iter().any(|other| self.field.value(other).contains(text)) {
                info!("Duplicate alert: {}", record);
                continue;
            }
            kept.push(record);
        }

        let dropped = total - kept.len();
        if dropped > 0 {
            info!(
                field = %self.field,
                "Filtered out {} duplicates out of {} alerts",
                dropped,
                total
            );
        } else {
            debug!(field = %self.field, total, "No duplicate alerts");
        }

        kept
    }
}
