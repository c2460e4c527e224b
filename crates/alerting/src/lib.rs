//! Alerting Core
//!
//! Provides the normalized alert record, near-duplicate suppression, and
//! lifecycle tracking (new / resolved / still active) between two snapshots.

mod dedup;
mod lifecycle;
mod metadata;
mod record;

pub use dedup::{DedupField, Deduplicator};
pub use lifecycle::{LifecyclePartition, PartitionKind};
pub use metadata::{ActivePeriod, AlertMetadata, Cause, Effect, InformedEntity};
pub use record::{AlertKey, AlertRecord, BAD_HEADER_SUFFIXES};
