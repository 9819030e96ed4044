//! Jackpot estimate and the rules it is judged against.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The next-draw figures published by the source page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DrawEstimate {
    /// Projected jackpot, never negative
    pub amount: Decimal,

    /// Draw date/time exactly as the source prints it
    pub draw_datetime: String,
}

impl DrawEstimate {
    /// Identifier for this draw under the given dedup scope.
    ///
    /// Whitespace inside the draw text is collapsed so that cosmetic layout
    /// changes on the source do not produce a new key for the same draw.
    pub fn draw_key(&self, scope: DedupScope) -> String {
        let draw = self.draw_datetime.split_whitespace().collect::<Vec<_>>().join(" ");
        match scope {
            DedupScope::Draw => draw,
            DedupScope::DrawAndAmount => format!("{}|{}", draw, self.amount.normalize()),
        }
    }
}

/// How an amount is compared with the threshold.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comparison {
    /// `amount > threshold`
    #[default]
    Greater,
    /// `amount >= threshold`
    GreaterOrEqual,
}

/// Minimum triggering amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threshold {
    pub amount: Decimal,

    #[serde(default)]
    pub comparison: Comparison,
}

impl Threshold {
    /// Strictly-greater threshold at the given amount.
    pub fn new(amount: Decimal) -> Self {
        Self {
            amount,
            comparison: Comparison::Greater,
        }
    }
}

/// What makes two alerts "the same" for dedup purposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DedupScope {
    /// One alert per draw, whatever the amount does afterwards
    #[default]
    Draw,
    /// A growing jackpot for the same draw alerts again
    DrawAndAmount,
}

/// Everything the decision step needs besides the page and prior state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertRules {
    pub threshold: Threshold,
    pub dedup: DedupScope,
}
