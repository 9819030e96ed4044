// src/pipeline/parse.rs

//! Fetch and extract only, for checking the extractor against the live page.

use crate::error::{AppError, Result};
use crate::models::DrawEstimate;
use crate::services::{PageSource, extract};
use crate::utils::format_amount;

/// Fetch the page and extract the estimate without deciding anything.
///
/// Enable debug logging to see the normalized text and matched substrings.
pub async fn run_parse(source: &dyn PageSource) -> Result<DrawEstimate> {
    log::info!("Fetching {}", source.location());
    let page = source.fetch().await?;

    let estimate = extract(&page).map_err(|reason| {
        log::error!("Extraction failed: {reason}");
        AppError::validation(reason.to_string())
    })?;

    log::info!("Jackpot estimate: {}", format_amount(estimate.amount));
    log::info!("Next draw: {}", estimate.draw_datetime);
    Ok(estimate)
}
