// src/utils/text.rs

//! Text helpers shared by extraction and message rendering.

use rust_decimal::Decimal;
use scraper::Html;

/// Reduce a document (or plain text) to its visible text.
///
/// Text nodes are joined with a single space, so words split across
/// elements stay separate tokens, then whitespace is collapsed.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let chunks: Vec<&str> = document
        .root_element()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node
                .parent()
                .and_then(|parent| parent.value().as_element())
                .is_some_and(|el| is_hidden(el.name()));
            (!hidden).then_some(&**text)
        })
        .collect();

    collapse_whitespace(&chunks.join(" "))
}

/// Elements whose text never shows on the page.
fn is_hidden(element: &str) -> bool {
    matches!(element, "script" | "style" | "noscript" | "title")
}

/// Replace every whitespace run with one space and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One-line, length-limited copy of `text` for debug logs.
pub fn truncate_for_debug(text: &str, limit: usize) -> String {
    let compact = collapse_whitespace(text);
    if compact.chars().count() <= limit {
        return compact;
    }
    let head: String = compact.chars().take(limit.saturating_sub(3)).collect();
    format!("{head}...")
}

/// Whole-unit amount with thousands separators, e.g. `16,000,000`.
///
/// Fractions are rounded half-to-even.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp(0);
    let digits = rounded.abs().trunc().to_string();

    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
