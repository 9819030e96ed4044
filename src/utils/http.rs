// src/utils/http.rs

//! HTTP client utilities.

use std::error::Error as StdError;
use std::time::Duration;

use crate::error::{AppError, Result};

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(user_agent: &str, timeout_secs: u64) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetch a page body as text.
///
/// Non-success statuses are errors; the body is decoded lossily so a stray
/// byte on the page does not fail the run.
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::fetch(url, error_chain(&e)))?;

    let status = response.status();
    log::debug!("HTTP status code: {} for {}", status, url);
    if !status.is_success() {
        return Err(AppError::fetch(url, format!("HTTP status {status}")));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::fetch(url, error_chain(&e)))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// An error and all of its causes, joined with `: `.
///
/// reqwest's own message is only the outermost layer ("error sending
/// request"); the connect, DNS, TLS or timeout cause sits in the chain.
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !out.ends_with(&text) {
            out.push_str(": ");
            out.push_str(&text);
        }
        source = cause.source();
    }
    out
}
