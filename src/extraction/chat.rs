// src/extraction/chat.rs
//! Shared request/parse cycle for extractors backed by a chat-completion model

use anyhow::{Context, Result};

use super::prompts;
use crate::app_log;
use crate::core::service_client::{ChatMessage, ServiceClient};
use crate::types::{ExtractionResult, ParsedJobDescription, Profile};

const JSON_SYSTEM_MESSAGE: &str = "You are a precise data extraction assistant. Respond with JSON only.";
const TEXT_SYSTEM_MESSAGE: &str = "You are a concise professional writer.";

pub struct ChatExtractor {
    client: ServiceClient,
    system_prompt: Option<String>,
    json_mode: bool,
}

impl ChatExtractor {
    pub fn new(client: ServiceClient, system_prompt: Option<String>, json_mode: bool) -> Self {
        Self {
            client,
            system_prompt,
            json_mode,
        }
    }

    pub async fn extract_profile_fields(&self, text: &str) -> Result<ExtractionResult> {
        let prompt = prompts::render_profile_prompt(self.system_prompt.as_deref(), text);
        let raw = self.ask_json(&prompt).await?;

        let result = ExtractionResult::from_model_output(&raw)
            .with_context(|| format!("Model {} returned an unusable extraction", self.client.model()))?;

        app_log!(debug, "Extraction from {}: {:?}", self.client.model(), result);
        Ok(result)
    }

    pub async fn parse_job_description(&self, text: &str) -> Result<ParsedJobDescription> {
        let prompt = prompts::render_job_description_prompt(text);
        let raw = self.ask_json(&prompt).await?;

        ParsedJobDescription::from_model_output(&raw)
            .with_context(|| format!("Model {} returned an unusable job description", self.client.model()))
    }

    pub async fn summarize(&self, profile: &Profile) -> Result<String> {
        let messages = [
            ChatMessage::system(TEXT_SYSTEM_MESSAGE),
            ChatMessage::user(&prompts::render_summary_prompt(profile)),
        ];
        let summary = self.client.complete(&messages, false).await?;
        let summary = summary.trim();

        if summary.is_empty() {
            anyhow::bail!("Model {} returned an empty summary", self.client.model());
        }
        Ok(summary.to_string())
    }

    async fn ask_json(&self, prompt: &str) -> Result<String> {
        let messages = [ChatMessage::system(JSON_SYSTEM_MESSAGE), ChatMessage::user(prompt)];
        self.client.complete(&messages, self.json_mode).await
    }
}
