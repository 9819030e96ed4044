//! Application configuration structures.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{AlertRules, Comparison, DedupScope, Threshold};

/// Root application configuration.
///
/// Built once at startup and passed down by reference; nothing reads
/// process-wide settings after this point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Page to scrape
    #[serde(default)]
    pub source: SourceConfig,

    /// Triggering amount
    pub threshold: ThresholdConfig,

    /// Message and dedup settings
    #[serde(default)]
    pub alert: AlertConfig,

    /// Messaging API settings
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// File locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Staleness check on the published draw date
    #[serde(default)]
    pub freshness: FreshnessConfig,

    /// Compute and log the decision without notifying or saving state
    #[serde(default)]
    pub dry_run: bool,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            AppError::config(format!("Config file not readable at {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(self.source.url.trim())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(AppError::validation(format!(
                "source.url must be http(s), got {}",
                url.scheme()
            )));
        }
        if self.source.timeout_secs == 0 {
            return Err(AppError::validation("source.timeout_secs must be > 0"));
        }
        if !(-12..=14).contains(&self.source.utc_offset_hours) {
            return Err(AppError::validation(
                "source.utc_offset_hours must be between -12 and 14",
            ));
        }
        if self.threshold.amount.is_sign_negative() {
            return Err(AppError::validation("threshold.amount must be >= 0"));
        }
        if self.threshold.currency.trim().is_empty() {
            return Err(AppError::validation("threshold.currency is empty"));
        }
        if self.alert.message_template.trim().is_empty() {
            return Err(AppError::validation("alert.message_template is empty"));
        }
        Url::parse(&self.telegram.api_base)?;
        if self.telegram.timeout_secs == 0 {
            return Err(AppError::validation("telegram.timeout_secs must be > 0"));
        }
        if self.paths.state_file.trim().is_empty() {
            return Err(AppError::validation("paths.state_file is empty"));
        }
        Ok(())
    }

    /// Rules handed to the decision step.
    pub fn rules(&self) -> AlertRules {
        AlertRules {
            threshold: Threshold {
                amount: self.threshold.amount,
                comparison: self.threshold.comparison,
            },
            dedup: self.alert.dedup,
        }
    }
}

/// Source page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL of the next-draw estimate page
    #[serde(default = "defaults::source_url")]
    pub url: String,

    /// User-Agent header for the page request
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Offset of the source's local time from UTC, in hours
    #[serde(default = "defaults::utc_offset_hours")]
    pub utc_offset_hours: i32,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: defaults::source_url(),
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            utc_offset_hours: defaults::utc_offset_hours(),
        }
    }
}

/// Threshold settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Minimum triggering amount
    pub amount: Decimal,

    /// Currency label used in messages
    #[serde(default = "defaults::currency")]
    pub currency: String,

    /// `greater` (default) or `greater_or_equal`
    #[serde(default)]
    pub comparison: Comparison,
}

/// Alert message and dedup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Message body.
    ///
    /// Placeholders: `{prize_amount}`, `{threshold_amount}`, `{currency}`,
    /// `{draw_datetime_text}`
    #[serde(default = "defaults::message_template")]
    pub message_template: String,

    /// `draw` (default) or `draw_and_amount`
    #[serde(default)]
    pub dedup: DedupScope,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            message_template: defaults::message_template(),
            dedup: DedupScope::default(),
        }
    }
}

/// Telegram Bot API settings. Credentials live in the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default = "defaults::telegram_api_base")]
    pub api_base: String,

    /// Environment variable holding the bot token
    #[serde(default = "defaults::bot_token_env")]
    pub bot_token_env: String,

    /// Environment variable holding the chat id
    #[serde(default = "defaults::chat_id_env")]
    pub chat_id_env: String,

    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base: defaults::telegram_api_base(),
            bot_token_env: defaults::bot_token_env(),
            chat_id_env: defaults::chat_id_env(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// File locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Dedup marker
    #[serde(default = "defaults::state_file")]
    pub state_file: String,

    /// Runtime report written after each check
    #[serde(default = "defaults::report_file")]
    pub report_file: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            state_file: defaults::state_file(),
            report_file: defaults::report_file(),
        }
    }
}

/// Freshness check settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FreshnessConfig {
    /// Largest acceptable gap between the published draw time and now
    #[serde(default = "defaults::max_lag_secs")]
    pub max_lag_secs: u64,
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self {
            max_lag_secs: defaults::max_lag_secs(),
        }
    }
}

mod defaults {
    // Source defaults
    pub fn source_url() -> String {
        "https://www.singaporepools.com.sg/DataFileArchive/Lottery/Output/toto_next_draw_estimate_en.html"
            .into()
    }
    pub fn user_agent() -> String {
        "Mozilla/5.0".into()
    }
    pub fn timeout() -> u64 {
        20
    }
    pub fn utc_offset_hours() -> i32 {
        8
    }

    // Threshold defaults
    pub fn currency() -> String {
        "SGD".into()
    }

    // Alert defaults
    pub fn message_template() -> String {
        "TOTO jackpot alert!\n\
         Next jackpot estimate: {prize_amount} {currency}\n\
         Threshold: {threshold_amount} {currency}\n\
         Next draw: {draw_datetime_text}"
            .into()
    }

    // Telegram defaults
    pub fn telegram_api_base() -> String {
        "https://api.telegram.org".into()
    }
    pub fn bot_token_env() -> String {
        "TELEGRAM_BOT_TOKEN".into()
    }
    pub fn chat_id_env() -> String {
        "TELEGRAM_CHAT_ID".into()
    }

    // Path defaults
    pub fn state_file() -> String {
        ".state/last_alert.json".into()
    }
    pub fn report_file() -> String {
        ".state/runtime_report.json".into()
    }

    // Freshness defaults
    pub fn max_lag_secs() -> u64 {
        3 * 24 * 60 * 60
    }
}
