// src/extraction/models.rs
//! Model discovery for the configured provider

use anyhow::Result;
use serde::Deserialize;

use super::ExtractorProvider;
use crate::app_log;
use crate::core::config_manager::ExtractorConfig;
use crate::core::service_client::ServiceClient;

const OLLAMA_FALLBACK_MODELS: &[&str] = &["llama3", "mistral", "phi3"];
const OPENAI_FALLBACK_MODELS: &[&str] = &["gpt-4o", "gpt-4o-mini", "gpt-3.5-turbo"];

#[derive(Debug, Deserialize)]
struct OllamaTags {
    #[serde(default)]
    models: Vec<OllamaModel>,
}

#[derive(Debug, Deserialize)]
struct OllamaModel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiModels {
    #[serde(default)]
    data: Vec<OpenAiModel>,
}

#[derive(Debug, Deserialize)]
struct OpenAiModel {
    id: String,
}

/// Models the provider offers; never fails, a fixed list stands in when the
/// provider cannot be reached
pub async fn available_models(config: &ExtractorConfig) -> Vec<String> {
    let listed = match config.provider {
        ExtractorProvider::Mock => return vec!["mock".to_string()],
        ExtractorProvider::Ollama => list_ollama_models(config).await,
        ExtractorProvider::OpenAi => list_openai_models(config).await,
    };

    match listed {
        Ok(models) if !models.is_empty() => models,
        Ok(_) => fallback_models(config.provider),
        Err(e) => {
            app_log!(warn, "Could not list {} models, using defaults: {:#}", config.provider, e);
            fallback_models(config.provider)
        }
    }
}

pub fn fallback_models(provider: ExtractorProvider) -> Vec<String> {
    let models = match provider {
        ExtractorProvider::Mock => &["mock"][..],
        ExtractorProvider::Ollama => OLLAMA_FALLBACK_MODELS,
        ExtractorProvider::OpenAi => OPENAI_FALLBACK_MODELS,
    };
    models.iter().map(|m| m.to_string()).collect()
}

/// Ollama's native API lives at the host root, not under `/v1`
pub fn ollama_host(api_base: &str) -> &str {
    let path_start = match api_base.find("://") {
        Some(scheme_end) => api_base[scheme_end + 3..]
            .find('/')
            .map_or(api_base.len(), |i| scheme_end + 3 + i),
        None => 0,
    };

    let mut base = api_base;
    let path = &api_base[path_start..];
    for (offset, _) in path.match_indices("/v1") {
        let rest = &path[offset + 3..];
        if rest.is_empty() || rest.starts_with('/') {
            base = &api_base[..path_start + offset];
            break;
        }
    }
    base.trim_end_matches('/')
}

async fn list_ollama_models(config: &ExtractorConfig) -> Result<Vec<String>> {
    let host = ollama_host(&config.api_base);
    let client = ServiceClient::new(host, &config.model_name, None, config.timeout_seconds)?;
    let tags: OllamaTags = client.get_json(&format!("{}/api/tags", host)).await?;
    Ok(tags.models.into_iter().map(|m| m.name).collect())
}

async fn list_openai_models(config: &ExtractorConfig) -> Result<Vec<String>> {
    let client = ServiceClient::new(
        &config.api_base,
        &config.model_name,
        config.resolved_api_key(),
        config.timeout_seconds,
    )?;
    let url = format!("{}/models", client.base_url());
    let models: OpenAiModels = client.get_json(&url).await?;
    Ok(models.data.into_iter().map(|m| m.id).collect())
}
