use std::sync::Arc;

use anyhow::Context;
use common::{Config, Locale, Secrets};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assembler::assemble;
use crate::error::{GenerationError, Stage};
use crate::llm::remote::RemoteLlmProvider;
use crate::llm::{LlmProvider, LlmRequest};
use crate::news::{digest, CurrentsNewsClient, NewsSource};
use crate::prompts;

/// Result of one pipeline run, returned as-is by `POST /generate-post`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedContent {
    pub title: String,
    pub meta_description: String,
    /// Final assembled message, truncated to the chat platform limit
    pub post_content: String,
}

/// Sequential topic → headlines → title → meta description → body pipeline.
pub struct Generator {
    news: Arc<dyn NewsSource>,
    llm: Arc<dyn LlmProvider>,
    locale: Locale,
}

impl Generator {
    pub fn new(news: Arc<dyn NewsSource>, llm: Arc<dyn LlmProvider>, locale: Locale) -> Self {
        Self { news, llm, locale }
    }

    /// Wire the HTTP-backed news client and LLM provider from startup configuration.
    /// Both share one `reqwest::Client`.
    pub fn from_config(config: &Config, secrets: &Secrets) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("newspost/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build reqwest client")?;

        let locale = config.content.locale;
        let news = CurrentsNewsClient::new(
            client.clone(),
            &config.news,
            secrets.news_api_key.as_str(),
            locale,
        );
        let llm = RemoteLlmProvider::with_client(
            client,
            config.llm.api_url.as_str(),
            secrets.llm_api_key.as_str(),
            config.llm.model.as_str(),
        )
        .with_timeout(config.llm.timeout_seconds);

        Ok(Self::new(Arc::new(news), Arc::new(llm), locale))
    }

    pub async fn generate(&self, topic: &str) -> Result<GeneratedContent, GenerationError> {
        let headlines = self.news.fetch_headlines(topic).await?;
        let recent_news = digest(&headlines);

        let title = self
            .complete(
                Stage::Title,
                LlmRequest::new(prompts::title_prompt(self.locale, topic, &recent_news))
                    .max_tokens(60)
                    .temperature(0.5),
            )
            .await?;

        // depends on the generated title, so never issued before it
        let meta_description = self
            .complete(
                Stage::MetaDescription,
                LlmRequest::new(prompts::meta_description_prompt(self.locale, topic, &title))
                    .max_tokens(100)
                    .temperature(0.5),
            )
            .await?;

        let body = self
            .complete(
                Stage::Body,
                LlmRequest::new(prompts::body_prompt(self.locale, topic, &recent_news))
                    .max_tokens(1000)
                    .temperature(0.5)
                    .penalties(0.6),
            )
            .await?;

        let post_content = assemble(&title, &meta_description, &body);

        Ok(GeneratedContent {
            title,
            meta_description,
            post_content,
        })
    }

    async fn complete(&self, stage: Stage, request: LlmRequest) -> Result<String, GenerationError> {
        let response = self
            .llm
            .generate(request)
            .await
            .map_err(|source| GenerationError::Completion { stage, source })?;

        info!(
            %stage,
            model = %response.model,
            total_tokens = response.usage.total_tokens,
            "completion received"
        );
        Ok(response.content.trim().to_string())
    }
}
