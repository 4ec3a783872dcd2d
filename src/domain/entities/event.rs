//! Analytics events recorded for link clicks and profile views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of tracked interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Click,
    View,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Click => "click",
            EventType::View => "view",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "click" => Some(EventType::Click),
            "view" => Some(EventType::View),
            _ => None,
        }
    }
}

/// An immutable, stored analytics event.
///
/// Dimension fields hold raw client values; normalization happens at
/// aggregation time so classification rules can change without rewriting
/// history.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyticsEvent {
    pub id: i64,
    pub event_type: EventType,
    /// Short link code for clicks, profile id for views.
    pub subject_id: String,
    pub owner_id: String,
    pub device_type: Option<String>,
    pub browser: Option<String>,
    pub country_code: Option<String>,
    /// HMAC of the visitor IP, see [`crate::utils::visitor_hash`].
    pub visitor_hash: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

impl AnalyticsEvent {
    /// Identity used for unique-visitor counting.
    ///
    /// Falls back to a per-event synthetic id when no hash was captured, so
    /// anonymous traffic counts every event as a distinct visitor.
    pub fn visitor_id(&self) -> String {
        match &self.visitor_hash {
            Some(hash) if !hash.is_empty() => hash.clone(),
            _ => format!("event:{}", self.id),
        }
    }
}

/// Input data for recording a new event.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnalyticsEvent {
    pub event_type: EventType,
    pub subject_id: String,
    pub owner_id: String,
    pub device_type: Option<String>,
    pub browser: Option<String>,
    pub country_code: Option<String>,
    pub visitor_hash: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// Client metadata captured at the edge when a link or profile is visited.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisitContext {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    /// Device type reported by the client, if any; otherwise the user agent
    /// is stored as the raw device value.
    pub device_type: Option<String>,
    pub country_code: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}
