// src/extraction/mod.rs
//! Text-extraction collaborators: turn free text into profile fields, summaries
//! and parsed job descriptions

mod chat;
pub mod mock;
pub mod models;
pub mod ollama;
pub mod openai;
pub mod prompts;

pub use mock::MockExtractor;
pub use models::available_models;
pub use ollama::OllamaExtractor;
pub use openai::OpenAiExtractor;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::app_log;
use crate::core::config_manager::ExtractorConfig;
use crate::types::{ExtractionResult, ParsedJobDescription, Profile};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtractorProvider {
    #[serde(alias = "mock", alias = "MOCK")]
    Mock,
    #[serde(alias = "ollama", alias = "OLLAMA")]
    Ollama,
    #[serde(alias = "openai", alias = "OpenAI", alias = "OPENAI", alias = "open_ai")]
    OpenAi,
}

impl ExtractorProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractorProvider::Mock => "mock",
            ExtractorProvider::Ollama => "ollama",
            ExtractorProvider::OpenAi => "openai",
        }
    }
}

impl FromStr for ExtractorProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "mock" => Ok(ExtractorProvider::Mock),
            "ollama" | "local" => Ok(ExtractorProvider::Ollama),
            "openai" => Ok(ExtractorProvider::OpenAi),
            _ => anyhow::bail!("Unknown extractor provider: {} (expected mock, ollama or openai)", s),
        }
    }
}

impl fmt::Display for ExtractorProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[async_trait]
pub trait ProfileExtractor: Send + Sync {
    fn provider(&self) -> ExtractorProvider;

    /// Fields found in the text; a `None` field means nothing was found
    async fn extract_profile_fields(&self, text: &str) -> Result<ExtractionResult>;

    async fn summarize(&self, profile: &Profile) -> Result<String>;

    async fn parse_job_description(&self, text: &str) -> Result<ParsedJobDescription>;
}

/// Model-backed extractor that answers from the offline extractor when the
/// model call fails
pub struct FallbackExtractor {
    primary: Box<dyn ProfileExtractor>,
    fallback: MockExtractor,
}

impl FallbackExtractor {
    pub fn new(primary: Box<dyn ProfileExtractor>) -> Self {
        Self {
            primary,
            fallback: MockExtractor,
        }
    }
}

#[async_trait]
impl ProfileExtractor for FallbackExtractor {
    fn provider(&self) -> ExtractorProvider {
        self.primary.provider()
    }

    async fn extract_profile_fields(&self, text: &str) -> Result<ExtractionResult> {
        match self.primary.extract_profile_fields(text).await {
            Ok(result) => Ok(result),
            Err(e) => {
                app_log!(warn, "{} extraction failed, using offline extractor: {:#}", self.provider(), e);
                self.fallback.extract_profile_fields(text).await
            }
        }
    }

    async fn summarize(&self, profile: &Profile) -> Result<String> {
        match self.primary.summarize(profile).await {
            Ok(summary) => Ok(summary),
            Err(e) => {
                app_log!(warn, "{} summary failed, using offline extractor: {:#}", self.provider(), e);
                self.fallback.summarize(profile).await
            }
        }
    }

    async fn parse_job_description(&self, text: &str) -> Result<ParsedJobDescription> {
        match self.primary.parse_job_description(text).await {
            Ok(parsed) => Ok(parsed),
            Err(e) => {
                app_log!(warn, "{} job description parse failed, using offline extractor: {:#}", self.provider(), e);
                self.fallback.parse_job_description(text).await
            }
        }
    }
}

/// Select the extractor once from configuration
pub fn build_extractor(config: &ExtractorConfig) -> Result<Box<dyn ProfileExtractor>> {
    let primary: Box<dyn ProfileExtractor> = match config.provider {
        ExtractorProvider::Mock => {
            app_log!(info, "Using offline extractor");
            return Ok(Box::new(MockExtractor));
        }
        ExtractorProvider::Ollama => Box::new(OllamaExtractor::new(config)?),
        ExtractorProvider::OpenAi => Box::new(OpenAiExtractor::new(config)?),
    };

    app_log!(
        info,
        "Using {} extractor with model {} at {}",
        config.provider,
        config.model_name,
        config.api_base
    );

    if config.fallback_to_mock {
        Ok(Box::new(FallbackExtractor::new(primary)))
    } else {
        Ok(primary)
    }
}
