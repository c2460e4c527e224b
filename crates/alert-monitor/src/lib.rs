//! Service Alert Monitor
//!
//! Drives the poll cycle: fetch, decode, dedupe, compare against the previous
//! snapshot, notify, then sleep until the next cycle or shutdown.

mod error;
mod monitor;
mod source;

pub use error::MonitorError;
pub use monitor::{CycleReport, Monitor, MonitorConfig, PollState, Snapshot};
pub use source::FeedSource;
