//! Runtime report written after every check run.
//!
//! The report is a health summary for whoever watches the scheduler: one
//! overall status, a fixed list of named checks, freshness of the source
//! data and a few counters.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Signature of the fields the alert message is built from.
pub const ALERT_PAYLOAD_SIGNATURE: &str =
    "telegram_text_v1|prize_amount|threshold_amount|currency|draw_datetime_text";

pub const CHECK_CONFIG_VALID: &str = "config_valid";
pub const CHECK_FETCH_SUCCEEDED: &str = "fetch_succeeded";
pub const CHECK_FRESHNESS: &str = "freshness_within_threshold";
pub const CHECK_RULES_EVALUATED: &str = "rules_evaluated";
pub const CHECK_DELIVERY: &str = "delivery_succeeded";
pub const CHECK_STATE_PERSISTED: &str = "state_persisted";

const REQUIRED_CHECKS: [&str; 6] = [
    CHECK_CONFIG_VALID,
    CHECK_FETCH_SUCCEEDED,
    CHECK_FRESHNESS,
    CHECK_RULES_EVALUATED,
    CHECK_DELIVERY,
    CHECK_STATE_PERSISTED,
];

/// Health status, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Ok,
    Warn,
    Fail,
}

/// A single named check.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KeyCheck {
    pub name: String,
    pub status: Status,
    pub detail: String,
}

/// Age of the source data at run time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Freshness {
    /// Published draw time, UTC
    pub max_date: Option<DateTime<Utc>>,
    /// Seconds since the published draw time, floored at zero
    pub lag_seconds: Option<i64>,
}

/// Per-run counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RowCounts {
    pub sources_monitored: u32,
    pub estimates_fetched: u32,
    pub alerts_generated: u32,
    pub alerts_sent: u32,
    pub alerts_failed: u32,
}

/// Summary of a single check run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeReport {
    pub status: Status,
    pub run_started_at: DateTime<Utc>,
    pub run_finished_at: Option<DateTime<Utc>>,
    pub duration_seconds: Option<f64>,
    pub dry_run: bool,
    pub decision: Option<String>,
    pub freshness: Freshness,
    pub row_counts: RowCounts,
    pub schema_hash: String,
    pub key_checks: Vec<KeyCheck>,
    pub warnings: Vec<String>,
}

impl RuntimeReport {
    /// Fresh report with every required check pending.
    pub fn start(started_at: DateTime<Utc>) -> Self {
        Self {
            status: Status::Fail,
            run_started_at: started_at,
            run_finished_at: None,
            duration_seconds: None,
            dry_run: false,
            decision: None,
            freshness: Freshness::default(),
            row_counts: RowCounts {
                sources_monitored: 1,
                ..RowCounts::default()
            },
            schema_hash: schema_hash(),
            key_checks: REQUIRED_CHECKS
                .iter()
                .map(|name| KeyCheck {
                    name: (*name).to_string(),
                    status: Status::Warn,
                    detail: "Not evaluated.".to_string(),
                })
                .collect(),
            warnings: Vec::new(),
        }
    }

    /// Set (or add) a named check.
    pub fn set_check(&mut self, name: &str, status: Status, detail: impl Into<String>) {
        let detail = detail.into().trim().to_string();
        match self.key_checks.iter_mut().find(|c| c.name == name) {
            Some(check) => {
                check.status = status;
                check.detail = detail;
            }
            None => self.key_checks.push(KeyCheck {
                name: name.to_string(),
                status,
                detail,
            }),
        }
    }

    /// Look up a check by name.
    pub fn check(&self, name: &str) -> Option<&KeyCheck> {
        self.key_checks.iter().find(|c| c.name == name)
    }

    /// Record a warning once; blank warnings are dropped.
    pub fn warn(&mut self, warning: impl AsRef<str>) {
        let text = warning.as_ref().trim();
        if !text.is_empty() && !self.warnings.iter().any(|w| w == text) {
            self.warnings.push(text.to_string());
        }
    }

    /// Stamp the end time and derive the overall status.
    pub fn finish(&mut self, finished_at: DateTime<Utc>, succeeded: bool) {
        self.run_finished_at = Some(finished_at);
        let millis = (finished_at - self.run_started_at).num_milliseconds().max(0);
        self.duration_seconds = Some(millis as f64 / 1000.0);

        let worst = self
            .key_checks
            .iter()
            .map(|c| c.status)
            .max()
            .unwrap_or(Status::Ok);

        self.status = if !succeeded {
            Status::Fail
        } else if !self.warnings.is_empty() {
            worst.max(Status::Warn)
        } else {
            worst
        };
    }
}

/// SHA-256 hex digest of [`ALERT_PAYLOAD_SIGNATURE`].
pub fn schema_hash() -> String {
    hex::encode(Sha256::digest(ALERT_PAYLOAD_SIGNATURE.as_bytes()))
}
