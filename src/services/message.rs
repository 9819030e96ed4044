//! Alert message rendering.

use crate::models::{Config, DrawEstimate};
use crate::utils::format_amount;

/// Fields an alert message is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub prize_amount: String,
    pub threshold_amount: String,
    pub currency: String,
    pub draw_datetime_text: String,
}

impl AlertMessage {
    /// Collect message fields for an estimate under the given config.
    pub fn new(estimate: &DrawEstimate, config: &Config) -> Self {
        Self {
            prize_amount: format_amount(estimate.amount),
            threshold_amount: format_amount(config.threshold.amount),
            currency: config.threshold.currency.trim().to_string(),
            draw_datetime_text: estimate.draw_datetime.clone(),
        }
    }

    /// Fill a template.
    ///
    /// Supported placeholders:
    /// - `{prize_amount}`, `{threshold_amount}`
    /// - `{currency}`, `{draw_datetime_text}`
    ///
    /// Anything else in braces is left as written.
    pub fn render(&self, template: &str) -> String {
        template
            .replace("{prize_amount}", &self.prize_amount)
            .replace("{threshold_amount}", &self.threshold_amount)
            .replace("{currency}", &self.currency)
            .replace("{draw_datetime_text}", &self.draw_datetime_text)
    }
}
