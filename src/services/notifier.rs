// src/services/notifier.rs

//! Notification delivery.
//!
//! The run only needs to know whether a message got through; everything
//! about the transport stays behind [`Notifier`].

use std::env;

use async_trait::async_trait;
use serde::Deserialize;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::TelegramConfig;
use crate::utils::http;

/// A destination for alert messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `message`, succeeding only once the far end accepted it.
    async fn notify(&self, message: &str) -> Result<()>;
}

/// Telegram Bot API `sendMessage` notifier.
pub struct TelegramNotifier {
    client: reqwest::Client,
    api_base: Url,
    credentials: Credentials,
}

/// Where the bot token and chat id come from.
enum Credentials {
    Given { bot_token: String, chat_id: String },
    /// Read at send time, so runs that never send need no secrets.
    FromEnv { bot_token_var: String, chat_id_var: String },
}

impl Credentials {
    fn resolve(&self) -> Result<(String, String)> {
        match self {
            Self::Given { bot_token, chat_id } => Ok((bot_token.clone(), chat_id.clone())),
            Self::FromEnv {
                bot_token_var,
                chat_id_var,
            } => Ok((require_env(bot_token_var)?, require_env(chat_id_var)?)),
        }
    }
}

/// Envelope every Bot API response comes in.
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl TelegramNotifier {
    /// Build a notifier from explicit credentials.
    pub fn new(config: &TelegramConfig, bot_token: &str, chat_id: &str) -> Result<Self> {
        Self::with_credentials(
            config,
            Credentials::Given {
                bot_token: bot_token.to_string(),
                chat_id: chat_id.to_string(),
            },
        )
    }

    /// Build a notifier that reads credentials from the configured
    /// environment variables when a message is actually sent.
    pub fn from_env(config: &TelegramConfig) -> Result<Self> {
        Self::with_credentials(
            config,
            Credentials::FromEnv {
                bot_token_var: config.bot_token_env.clone(),
                chat_id_var: config.chat_id_env.clone(),
            },
        )
    }

    fn with_credentials(config: &TelegramConfig, credentials: Credentials) -> Result<Self> {
        // Trailing slash so joins keep any path prefix on the base
        let api_base = Url::parse(&format!("{}/", config.api_base.trim_end_matches('/')))?;
        let client = http::create_async_client("jackpot-watch", config.timeout_secs)?;
        Ok(Self {
            client,
            api_base,
            credentials,
        })
    }

    fn endpoint(&self, bot_token: &str) -> Result<Url> {
        // "./" stops a token like "123:abc" from parsing as a URL scheme
        Ok(self.api_base.join(&format!("./bot{bot_token}/sendMessage"))?)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> Result<()> {
        let (bot_token, chat_id) = self.credentials.resolve()?;
        let endpoint = self.endpoint(&bot_token)?;

        // The endpoint embeds the bot token; keep it out of error text.
        let response = self
            .client
            .post(endpoint)
            .form(&[("chat_id", chat_id.as_str()), ("text", message)])
            .send()
            .await
            .map_err(|e| AppError::delivery(http::error_chain(&e.without_url())))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::delivery(http::error_chain(&e.without_url())))?;

        let api: Option<ApiResponse> = serde_json::from_str(&body).ok();
        if !status.is_success() || !api.as_ref().is_some_and(|r| r.ok) {
            let reason = api
                .and_then(|r| r.description)
                .unwrap_or_else(|| "no description".to_string());
            return Err(AppError::delivery(format!(
                "Telegram rejected the message (HTTP {status}): {reason}"
            )));
        }

        log::info!("Telegram message delivered to chat {chat_id}");
        Ok(())
    }
}

/// Read a non-blank environment variable.
pub fn require_env(name: &str) -> Result<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::config(format!("Missing required environment variable: {name}")))
}
