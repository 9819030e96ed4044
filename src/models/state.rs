//! Persisted dedup marker.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::DrawEstimate;

/// The last draw an alert was delivered for.
///
/// Only `last_alerted_draw_key` takes part in dedup; the other fields are
/// there for whoever opens the file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AlertState {
    /// Key of the last alerted draw (older files call it `last_alerted_draw_id`)
    #[serde(alias = "last_alerted_draw_id")]
    pub last_alerted_draw_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draw_datetime: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alerted_at: Option<DateTime<Utc>>,
}

impl AlertState {
    /// Marker holding only a key.
    pub fn new(draw_key: impl Into<String>) -> Self {
        Self {
            last_alerted_draw_key: draw_key.into(),
            draw_datetime: None,
            amount: None,
            alerted_at: None,
        }
    }

    /// Marker for an estimate that was just delivered.
    pub fn alerted(draw_key: impl Into<String>, estimate: &DrawEstimate) -> Self {
        Self {
            last_alerted_draw_key: draw_key.into(),
            draw_datetime: Some(estimate.draw_datetime.clone()),
            amount: Some(estimate.amount),
            alerted_at: Some(Utc::now()),
        }
    }
}
