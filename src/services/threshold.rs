//! Threshold evaluation.

use rust_decimal::Decimal;

use crate::models::{Comparison, Threshold};

/// Whether `amount` clears `threshold`.
///
/// Decimal comparison is by value, so `1000000` and `1000000.00` are equal.
pub fn exceeds(amount: Decimal, threshold: &Threshold) -> bool {
    match threshold.comparison {
        Comparison::Greater => amount > threshold.amount,
        Comparison::GreaterOrEqual => amount >= threshold.amount,
    }
}
