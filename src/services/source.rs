//! Page retrieval.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::SourceConfig;
use crate::utils::http;

/// Something that yields the raw page for a run.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page body as text.
    async fn fetch(&self) -> Result<String>;

    /// Where the page comes from, for logs.
    fn location(&self) -> &str;
}

/// Plain HTTP GET against the configured URL.
pub struct HttpPageSource {
    client: reqwest::Client,
    url: String,
}

impl HttpPageSource {
    /// Build a source from config.
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let client = http::create_async_client(&config.user_agent, config.timeout_secs)?;
        Ok(Self {
            client,
            url: config.url.trim().to_string(),
        })
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch(&self) -> Result<String> {
        http::fetch_text(&self.client, &self.url).await
    }

    fn location(&self) -> &str {
        &self.url
    }
}
