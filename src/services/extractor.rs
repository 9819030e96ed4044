// src/services/extractor.rs

//! Jackpot estimate extraction.
//!
//! Markup is flattened to visible text first, then the amount and the draw
//! date are matched relative to their labels ("next jackpot", "next draw").
//! Nothing depends on element positions, so layout changes on the source
//! only matter if they change the label wording.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::DrawEstimate;
use crate::utils::{html_to_text, truncate_for_debug};

const DEBUG_LIMIT: usize = 200;

/// Currency-like number: `S$1,234,567`, `$ 1,000,000`, `1,234.50`.
const AMOUNT: &str = r"(?:S\$|\$)?\s*\d[\d,]*(?:\.\d+)?";

/// `Mon, 08 Jul 2024, 6:30pm`, `16 Feb 2026 , 6.30pm`, `08 Jul 2024`
/// or ISO `2025-07-01` with an optional `HH:MM[:SS]`.
const DRAW_DATE: &str = r"(?:[A-Za-z]{3,9}\s*,\s*)?\d{1,2}\s+[A-Za-z]{3,9}\s+\d{4}(?:\s*,\s*\d{1,2}[.:]\d{2}\s*(?:am|pm))?|\d{4}-\d{2}-\d{2}(?:[T ]\d{2}:\d{2}(?::\d{2})?)?";

static JACKPOT_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    // A dash only separates when followed by a space, so "-$5" is never read as "$5".
    let label_tail = r"\s*(?:est(?:imate)?\.?\s*)?(?:is\s*)?(?::|-\s)?\s*";
    [
        format!(r"(?i)next\s*jackpot{label_tail}(?P<amount>{AMOUNT})"),
        format!(r"(?i)jackpot{label_tail}(?P<amount>{AMOUNT})"),
    ]
    .iter()
    .map(|p| Regex::new(p).expect("jackpot pattern is valid"))
    .collect()
});

static NEXT_DRAW_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"(?i)next\s*draw\s*[:\-]?\s*(?P<draw>{DRAW_DATE})"))
        .expect("next draw pattern is valid")
});

static AMOUNT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:S\$|\$)\s*").expect("prefix pattern is valid"));

static PLAIN_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+(?:\.\d+)?$").expect("amount pattern is valid"));

/// Why a page produced no estimate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotFound {
    #[error("could not locate a jackpot estimate on the page")]
    Jackpot,

    #[error("could not locate the next draw date on the page")]
    NextDraw,

    #[error("unrecognized jackpot amount format: {0:?}")]
    Amount(String),
}

/// Extract the next-draw estimate from an HTML or plain-text fragment.
///
/// Returns both fields or a [`NotFound`] reason, never a partial record.
pub fn extract(fragment: &str) -> Result<DrawEstimate, NotFound> {
    let text = html_to_text(fragment);
    log::debug!("Normalized text: {}", truncate_for_debug(&text, DEBUG_LIMIT));

    let jackpot = JACKPOT_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(&text))
        .ok_or(NotFound::Jackpot)?;
    log::debug!(
        "Matched jackpot substring: {}",
        truncate_for_debug(&jackpot[0], DEBUG_LIMIT)
    );

    let draw = NEXT_DRAW_PATTERN
        .captures(&text)
        .ok_or(NotFound::NextDraw)?;
    log::debug!(
        "Matched next draw substring: {}",
        truncate_for_debug(&draw[0], DEBUG_LIMIT)
    );

    let amount = parse_amount(&jackpot["amount"])?;
    let draw_datetime = draw["draw"].trim().to_string();

    log::debug!(
        "Final parsed values: jackpot_estimate={}, draw_datetime_text={:?}",
        amount,
        draw_datetime
    );

    Ok(DrawEstimate {
        amount,
        draw_datetime,
    })
}

/// Parse a currency string such as `S$1,234,567.50` into a decimal.
pub fn parse_amount(raw: &str) -> Result<Decimal, NotFound> {
    let trimmed = raw.trim();
    let cleaned = AMOUNT_PREFIX.replace(trimmed, "").replace(',', "");
    if !PLAIN_AMOUNT.is_match(&cleaned) {
        return Err(NotFound::Amount(trimmed.to_string()));
    }
    Decimal::from_str(&cleaned).map_err(|_| NotFound::Amount(trimmed.to_string()))
}
