//! Outcome of the decision step.

use std::fmt;

use rust_decimal::Decimal;

use super::DrawEstimate;
use crate::services::NotFound;

/// Why no alert goes out for an estimate that was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuppressReason {
    /// The stored marker already names this draw
    AlreadyAlerted { draw_key: String },
    /// The amount does not clear the threshold
    BelowThreshold { threshold: Decimal },
}

impl fmt::Display for SuppressReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyAlerted { .. } => f.write_str("already alerted for this draw"),
            Self::BelowThreshold { .. } => f.write_str("below threshold"),
        }
    }
}

/// What a run should do about the current page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Notify, then persist `draw_key` once delivery is confirmed
    Alert {
        estimate: DrawEstimate,
        draw_key: String,
    },
    Suppressed {
        estimate: DrawEstimate,
        reason: SuppressReason,
    },
    /// The page was empty
    NoData,
    /// The page had content but no usable estimate
    ParseError(NotFound),
}

impl Decision {
    /// Short label used in logs and the runtime report.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Alert { .. } => "alert",
            Self::Suppressed {
                reason: SuppressReason::AlreadyAlerted { .. },
                ..
            } => "suppressed_already_alerted",
            Self::Suppressed {
                reason: SuppressReason::BelowThreshold { .. },
                ..
            } => "suppressed_below_threshold",
            Self::NoData => "no_data",
            Self::ParseError(_) => "parse_error",
        }
    }

    /// The extracted estimate, if extraction succeeded.
    pub fn estimate(&self) -> Option<&DrawEstimate> {
        match self {
            Self::Alert { estimate, .. } | Self::Suppressed { estimate, .. } => Some(estimate),
            Self::NoData | Self::ParseError(_) => None,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alert { estimate, .. } => write!(
                f,
                "alert: jackpot_estimate={}, draw_datetime_text={}",
                estimate.amount, estimate.draw_datetime
            ),
            Self::Suppressed { estimate, reason } => {
                write!(f, "no alert, {reason}: jackpot_estimate={}", estimate.amount)?;
                if let SuppressReason::BelowThreshold { threshold } = reason {
                    write!(f, ", threshold_amount={threshold}")?;
                }
                write!(f, ", draw_datetime_text={}", estimate.draw_datetime)
            }
            Self::NoData => f.write_str("no data: source page was empty"),
            Self::ParseError(reason) => write!(f, "parse error: {reason}"),
        }
    }
}
