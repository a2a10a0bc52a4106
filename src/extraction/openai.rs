// src/extraction/openai.rs
//! Hosted OpenAI models; JSON responses are requested explicitly

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::chat::ChatExtractor;
use super::{ExtractorProvider, ProfileExtractor};
use crate::core::config_manager::ExtractorConfig;
use crate::core::service_client::ServiceClient;
use crate::types::{ExtractionResult, ParsedJobDescription, Profile};

pub struct OpenAiExtractor {
    inner: ChatExtractor,
}

impl OpenAiExtractor {
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        let api_key = config
            .resolved_api_key()
            .context("OpenAI provider requires LLM_API_KEY or OPENAI_API_KEY")?;
        let client = ServiceClient::new(
            &config.api_base,
            &config.model_name,
            Some(api_key),
            config.timeout_seconds,
        )?;

        Ok(Self {
            inner: ChatExtractor::new(client, config.system_prompt.clone(), true),
        })
    }
}

#[async_trait]
impl ProfileExtractor for OpenAiExtractor {
    fn provider(&self) -> ExtractorProvider {
        ExtractorProvider::OpenAi
    }

    async fn extract_profile_fields(&self, text: &str) -> Result<ExtractionResult> {
        self.inner.extract_profile_fields(text).await
    }

    async fn summarize(&self, profile: &Profile) -> Result<String> {
        self.inner.summarize(profile).await
    }

    async fn parse_job_description(&self, text: &str) -> Result<ParsedJobDescription> {
        self.inner.parse_job_description(text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_key_is_accepted() {
        let mut config = ExtractorConfig::for_provider(ExtractorProvider::OpenAi, "gpt-4o-mini");
        config.api_key = Some("sk-test".to_string());
        let extractor = OpenAiExtractor::new(&config).unwrap();
        assert_eq!(extractor.provider(), ExtractorProvider::OpenAi);
    }
}
