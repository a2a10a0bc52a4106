// src/extraction/ollama.rs
//! Local model served by Ollama through its OpenAI-compatible endpoint

use anyhow::Result;
use async_trait::async_trait;

use super::chat::ChatExtractor;
use super::{ExtractorProvider, ProfileExtractor};
use crate::core::config_manager::ExtractorConfig;
use crate::core::service_client::ServiceClient;
use crate::types::{ExtractionResult, ParsedJobDescription, Profile};

pub struct OllamaExtractor {
    inner: ChatExtractor,
}

impl OllamaExtractor {
    pub fn new(config: &ExtractorConfig) -> Result<Self> {
        let client = ServiceClient::new(&config.api_base, &config.model_name, None, config.timeout_seconds)?;
        Ok(Self {
            inner: ChatExtractor::new(client, config.system_prompt.clone(), false),
        })
    }
}

#[async_trait]
impl ProfileExtractor for OllamaExtractor {
    fn provider(&self) -> ExtractorProvider {
        ExtractorProvider::Ollama
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
