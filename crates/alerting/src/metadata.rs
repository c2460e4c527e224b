//! Alert Metadata
//!
//! Descriptive fields decoded alongside an alert. None of them take part in
//! alert identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cause of a service disruption (GTFS-Realtime `Alert.Cause`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Cause {
    #[default]
    UnknownCause,
    OtherCause,
    TechnicalProblem,
    Strike,
    Demonstration,
    Accident,
    Holiday,
    Weather,
    Maintenance,
    Construction,
    PoliceActivity,
    MedicalEmergency,
}

impl Cause {
    /// Map a wire enum value, falling back to `UnknownCause`
    pub fn from_code(code: i32) -> Self {
        match code {
            2 => Self::OtherCause,
            3 => Self::TechnicalProblem,
            4 => Self::Strike,
            5 => Self::Demonstration,
            6 => Self::Accident,
            7 => Self::Holiday,
            8 => Self::Weather,
            9 => Self::Maintenance,
            10 => Self::Construction,
            11 => Self::PoliceActivity,
            12 => Self::MedicalEmergency,
            _ => Self::UnknownCause,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::UnknownCause => "Unknown",
            Self::OtherCause => "Other",
            Self::TechnicalProblem => "Technical Problem",
            Self::Strike => "Strike",
            Self::Demonstration => "Demonstration",
            Self::Accident => "Accident",
            Self::Holiday => "Holiday",
            Self::Weather => "Weather",
            Self::Maintenance => "Maintenance",
            Self::Construction => "Construction",
            Self::PoliceActivity => "Police Activity",
            Self::MedicalEmergency => "Medical Emergency",
        }
    }
}

impl fmt::Display for Cause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Effect of a service disruption (GTFS-Realtime `Alert.Effect`)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Effect {
    NoService,
    ReducedService,
    SignificantDelays,
    Detour,
    AdditionalService,
    ModifiedService,
    OtherEffect,
    #[default]
    UnknownEffect,
    StopMoved,
    NoEffect,
    AccessibilityIssue,
}

impl Effect {
    /// Map a wire enum value, falling back to `UnknownEffect`
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Self::NoService,
            2 => Self::ReducedService,
            3 => Self::SignificantDelays,
            4 => Self::Detour,
            5 => Self::AdditionalService,
            6 => Self::ModifiedService,
            7 => Self::OtherEffect,
            9 => Self::StopMoved,
            10 => Self::NoEffect,
            11 => Self::AccessibilityIssue,
            _ => Self::UnknownEffect,
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoService => "No Service",
            Self::ReducedService => "Reduced Service",
            Self::SignificantDelays => "Significant Delays",
            Self::Detour => "Detour",
            Self::AdditionalService => "Additional Service",
            Self::ModifiedService => "Modified Service",
            Self::OtherEffect => "Other Effect",
            Self::UnknownEffect => "Unknown Effect",
            Self::StopMoved => "Stop Moved",
            Self::NoEffect => "No Effect",
            Self::AccessibilityIssue => "Accessibility Issue",
        }
    }
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Time window during which an alert applies
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePeriod {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

/// Route, stop, or agency an alert refers to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InformedEntity {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agency_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_id: Option<String>,
}

/// Non-identity fields carried by an alert record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertMetadata {
    /// Feed entity id
    pub id: String,
    pub cause: Cause,
    pub effect: Effect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub active_periods: Vec<ActivePeriod>,
    pub informed_entities: Vec<InformedEntity>,
}

impl AlertMetadata {
    /// Affected routes and stops as display strings ("Route 501", "Stop 1234")
    pub fn affected(&self) -> Vec<String> {
        let mut affected = Vec::new();
        for entity in &self.informed_entities {
            if let Some(route) = &entity.route_id {
                affected.push(format!("Route {}", route));
            }
            if let Some(stop) = &entity.stop_id {
                affected.push(format!("Stop {}", stop));
            }
        }
        affected
    }
}
