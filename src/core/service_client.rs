// src/core/service_client.rs
//! HTTP client for OpenAI-compatible model servers (hosted or local)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::app_log;

const CHAT_COMPLETIONS_ENDPOINT: &str = "/chat/completions";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: &str) -> Self {
        Self {
            role: "system".to_string(),
            content: content.to_string(),
        }
    }

    pub fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: content.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

pub struct ServiceClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl ServiceClient {
    pub fn new(base_url: &str, model: &str, api_key: Option<String>, timeout_seconds: u64) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a chat completion and return the first choice's text
    pub async fn complete(&self, messages: &[ChatMessage], json_mode: bool) -> Result<String> {
        let url = format!("{}{}", self.base_url, CHAT_COMPLETIONS_ENDPOINT);
        let request = ChatRequest {
            model: &self.model,
            messages,
            response_format: json_mode.then_some(ResponseFormat { kind: "json_object" }),
            temperature: 0.0,
        };

        app_log!(trace, "Calling chat completion service: {} ({})", url, self.model);

        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .context("Failed to call chat completion service")?;

        let status = response.status();
        if status.is_success() {
            let chat_response: ChatResponse = response
                .json()
                .await
                .context("Failed to parse chat completion response")?;

            let content = chat_response
                .choices
                .into_iter()
                .next()
                .map(|choice| choice.message.content)
                .context("Chat completion response has no choices")?;

            app_log!(trace, "Model response: {}", content);
            Ok(content)
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());

            app_log!(error, "Chat completion error response: {}", error_text);
            anyhow::bail!("Model service returned error status {}: {}", status, error_text)
        }
    }

    /// Generic GET request against an absolute URL
    pub async fn get_json<R>(&self, url: &str) -> Result<R>
    where
        R: serde::de::DeserializeOwned,
    {
        let mut builder = self.client.get(url);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .with_context(|| format!("Failed to GET from {}", url))?;

        let status = response.status();
        if status.is_success() {
            response
                .json::<R>()
                .await
                .context("Failed to parse JSON response")
        } else {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("HTTP {} error: {}", status, error_text)
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let messages = vec![ChatMessage::system("rules"), ChatMessage::user("text")];
        let request = ChatRequest {
            model: "llama3",
            messages: &messages,
            response_format: Some(ResponseFormat { kind: "json_object" }),
            temperature: 0.0,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama3");
        assert_eq!(json["messages"][1]["role"], "user");
        assert_eq!(json["response_format"]["type"], "json_object");
    }

    #[test]
    fn test_response_shape() {
        let raw = r#"{"id": "x", "choices": [{"index": 0, "message": {"role": "assistant", "content": "{}"}}]}"#;
        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "{}");
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = ServiceClient::new("http://localhost:11434/v1/", "llama3", None, 5).unwrap();
        assert_eq!(client.base_url(), "http://localhost:11434/v1");
        assert_eq!(client.model(), "llama3");
    }
}
