//! GTFS-Realtime Alert Feed
//!
//! This crate fetches a transit agency's service-alerts feed over HTTP and
//! decodes the GTFS-Realtime protocol buffer into normalized alert records.

mod client;
mod decode;
mod error;
pub mod proto;

pub use client::{FeedClient, FeedConfig};
pub use decode::{AlertDecoder, RawAlert};
pub use error::FeedError;

/// Default alerts feed (Toronto Transit Commission)
pub const DEFAULT_FEED_URL: &str = "https://bustime.ttc.ca/gtfsrt/alerts";

/// Default translation language
pub const DEFAULT_LANGUAGE: &str = "en";
