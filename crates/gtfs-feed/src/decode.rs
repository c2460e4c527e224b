//! GTFS-Realtime Alert Decoding

use crate::error::FeedError;
use crate::proto::{self, FeedMessage, TranslatedString};
use alerting::{ActivePeriod, AlertMetadata, AlertRecord, Cause, Effect, InformedEntity};
use chrono::{DateTime, Utc};
use prost::Message;
use tracing::debug;

/// Alert text as it appears in the feed, before normalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAlert {
    pub header: String,
    pub description: String,
    pub metadata: AlertMetadata,
}

impl RawAlert {
    /// Normalize into an alert record
    pub fn into_record(self) -> AlertRecord {
        AlertRecord::with_metadata(self.header, self.description, self.metadata)
    }
}

/// Decoder from feed bytes to alerts
#[derive(Debug, Clone)]
pub struct AlertDecoder {
    /// Preferred translation language
    language: String,
}

impl AlertDecoder {
    /// Create a decoder preferring translations in `language`
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
        }
    }

    /// Decode every alert entity in the payload, without normalization
    pub fn decode_raw(&self, data: &[u8]) -> Result<Vec<RawAlert>, FeedError> {
        let feed = FeedMessage::decode(data)?;
        debug!(
            version = %feed.header.gtfs_realtime_version,
            entities = feed.entity.len(),
            "Decoded GTFS-RT feed"
        );

        let alerts = feed
            .entity
            .iter()
            .filter(|entity| !entity.is_deleted.unwrap_or(false))
            .filter_map(|entity| entity.alert.as_ref().map(|alert| self.raw_alert(&entity.id, alert)))
            .collect();

        Ok(alerts)
    }

    /// Decode and normalize every alert entity in the payload
    pub fn decode(&self, data: &[u8]) -> Result<Vec<AlertRecord>, FeedError> {
        Ok(self
            .decode_raw(data)?
            .into_iter()
            .map(RawAlert::into_record)
            .collect())
    }

    fn raw_alert(&self, id: &str, alert: &proto::Alert) -> RawAlert {
        let url = self.translate(alert.url.as_ref());

        let metadata = AlertMetadata {
            id: id.to_string(),
            cause: alert.cause.map(Cause::from_code).unwrap_or_default(),
            effect: alert.effect.map(Effect::from_code).unwrap_or_default(),
            url: (!url.is_empty()).then_some(url),
            active_periods: alert
                .active_period
                .iter()
                .map(|period| ActivePeriod {
                    start: period.start.and_then(timestamp),
                    end: period.end.and_then(timestamp),
                })
                .collect(),
            informed_entities: alert
                .informed_entity
                .iter()
                .map(|selector| InformedEntity {
                    agency_id: selector.agency_id.clone(),
                    route_id: selector.route_id.clone(),
                    stop_id: selector.stop_id.clone(),
                })
                .collect(),
        };

        RawAlert {
            header: self.translate(alert.header_text.as_ref()),
            description: self.translate(alert.description_text.as_ref()),
            metadata,
        }
    }

    /// Pick the preferred-language translation, else the first one
    fn translate(&self, text: Option<&TranslatedString>) -> String {
        let Some(text) = text else {
            return String::new();
        };

        text.translation
            .iter()
            .find(|t| t.language.as_deref() == Some(self.language.as_str()))
            .or_else(|| text.translation.first())
            .map(|t| t.text.clone())
            .unwrap_or_default()
    }
}

impl Default for AlertDecoder {
    fn default() -> Self {
        Self::new(crate::DEFAULT_LANGUAGE)
    }
}

fn timestamp(secs: u64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(i64::try_from(secs).ok()?, 0)
}
