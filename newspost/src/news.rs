use common::{Locale, NewsConfig};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::UpstreamError;
use crate::prompts::no_news_placeholder;

/// Headlines kept from one news search.
pub const MAX_HEADLINES: usize = 5;

/// Source of recent headlines for a topic
#[async_trait::async_trait]
pub trait NewsSource: Send + Sync {
    /// Up to [`MAX_HEADLINES`] titles in upstream order, or a single placeholder
    /// line when nothing was found.
    async fn fetch_headlines(&self, topic: &str) -> Result<Vec<String>, UpstreamError>;
}

/// Join headlines into the digest embedded in prompts.
pub fn digest(headlines: &[String]) -> String {
    headlines.join("\n")
}

/// Client for the Currents API `latest-news` endpoint
pub struct CurrentsNewsClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    language: String,
    category: String,
    locale: Locale,
}

impl CurrentsNewsClient {
    pub fn new(
        client: reqwest::Client,
        config: &NewsConfig,
        api_key: impl Into<String>,
        locale: Locale,
    ) -> Self {
        Self {
            client,
            api_url: config.api_url.clone(),
            api_key: api_key.into(),
            language: config.language.clone(),
            category: config.category.clone(),
            locale,
        }
    }
}

#[async_trait::async_trait]
impl NewsSource for CurrentsNewsClient {
    async fn fetch_headlines(&self, topic: &str) -> Result<Vec<String>, UpstreamError> {
        debug!(topic, url = %self.api_url, "fetching recent news");

        // the request URL carries the API key, so it is stripped from any error
        let response = self
            .client
            .get(&self.api_url)
            .query(&[
                ("language", self.language.as_str()),
                ("keywords", topic),
                ("category", self.category.as_str()),
                ("apiKey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UpstreamError::Status { status, body });
        }

        let payload: NewsResponse = response
            .json()
            .await
            .map_err(|e| UpstreamError::Transport(e.without_url()))?;

        let headlines = select_headlines(payload.news, self.locale);
        info!(topic, count = headlines.len(), "news headlines fetched");
        Ok(headlines)
    }
}

fn select_headlines(news: Vec<NewsItem>, locale: Locale) -> Vec<String> {
    if news.is_empty() {
        return vec![no_news_placeholder(locale).to_string()];
    }
    news.into_iter()
        .take(MAX_HEADLINES)
        .map(|item| item.title)
        .collect()
}

#[derive(Debug, Deserialize)]
struct NewsResponse {
    #[serde(default)]
    news: Vec<NewsItem>,
}

#[derive(Debug, Deserialize)]
struct NewsItem {
    title: String,
}
