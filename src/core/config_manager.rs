// src/core/config_manager.rs
//! Unified configuration: environment paths, extractor provider and match weights

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use crate::app_log;

use crate::extraction::ExtractorProvider;
use crate::matching::MatchWeights;

const CONFIG_FILE: &str = "config.yaml";
const DEFAULT_OLLAMA_BASE: &str = "http://localhost:11434/v1";
const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct ConfigManager {
    pub environment: EnvironmentConfig,
    pub extractor: ExtractorConfig,
    pub weights: MatchWeights,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentConfig {
    pub database_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractorConfig {
    pub provider: ExtractorProvider,
    pub model_name: String,
    pub api_base: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Custom instructions; `{partial_data}` is replaced by the pasted text
    #[serde(default)]
    pub system_prompt: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Fall back to the offline extractor when the model is unreachable
    #[serde(default = "default_true")]
    pub fallback_to_mock: bool,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            provider: ExtractorProvider::Mock,
            model_name: "mock".to_string(),
            api_base: DEFAULT_OLLAMA_BASE.to_string(),
            api_key: None,
            system_prompt: None,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            fallback_to_mock: true,
        }
    }
}

impl ExtractorConfig {
    pub fn for_provider(provider: ExtractorProvider, model_name: &str) -> Self {
        let api_base = match provider {
            ExtractorProvider::OpenAi => DEFAULT_OPENAI_BASE,
            ExtractorProvider::Ollama | ExtractorProvider::Mock => DEFAULT_OLLAMA_BASE,
        };

        Self {
            provider,
            model_name: model_name.to_string(),
            api_base: api_base.to_string(),
            ..Self::default()
        }
    }

    /// Configured key, else `OPENAI_API_KEY`
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
    }
}

/// Optional `config.yaml`: one section per environment
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    local: Option<FileSection>,
    production: Option<FileSection>,
}

#[derive(Debug, Default, Deserialize)]
struct FileSection {
    database_path: Option<PathBuf>,
    extractor: Option<ExtractorConfig>,
    weights: Option<MatchWeights>,
}

impl ConfigManager {
    /// Load all configurations: config file first, environment variables override
    pub fn load() -> Result<Self> {
        let env = Self::get_environment();
        app_log!(info, "Loading configuration for environment: {}", env);

        let section = Self::load_file_section(Path::new(CONFIG_FILE), &env)?;
        let base_dir = if env == "production" {
            PathBuf::from("/app")
        } else {
            std::env::current_dir().context("Failed to get current directory")?
        };

        let database_path = std::env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .ok()
            .or(section.database_path)
            .unwrap_or_else(|| PathBuf::from("benchmatch.db"));

        let environment = EnvironmentConfig {
            database_path: Self::resolve_path(&base_dir, &database_path),
        };

        let extractor = Self::apply_env_overrides(section.extractor.unwrap_or_default())?;

        Ok(Self {
            environment,
            extractor,
            weights: section.weights.unwrap_or_default(),
        })
    }

    fn get_environment() -> String {
        std::env::var("BENCHMATCH_ENV")
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .unwrap_or_else(|_| "local".to_string())
    }

    fn load_file_section(path: &Path, env: &str) -> Result<FileSection> {
        if !path.exists() {
            return Ok(FileSection::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let file: ConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        let section = match env {
            "production" => file.production,
            _ => file.local,
        };
        Ok(section.unwrap_or_default())
    }

    fn apply_env_overrides(mut extractor: ExtractorConfig) -> Result<ExtractorConfig> {
        if let Ok(provider) = std::env::var("LLM_PROVIDER") {
            let provider: ExtractorProvider = provider.parse()?;
            if provider != extractor.provider {
                extractor = ExtractorConfig {
                    system_prompt: extractor.system_prompt,
                    ..ExtractorConfig::for_provider(provider, &extractor.model_name)
                };
            }
        }
        if let Ok(model) = std::env::var("LLM_MODEL") {
            extractor.model_name = model;
        }
        if let Ok(api_base) = std::env::var("LLM_API_BASE") {
            extractor.api_base = api_base;
        }
        if let Ok(api_key) = std::env::var("LLM_API_KEY") {
            extractor.api_key = Some(api_key);
        }
        if let Ok(prompt) = std::env::var("LLM_SYSTEM_PROMPT") {
            extractor.system_prompt = Some(prompt);
        }
        if let Ok(timeout) = std::env::var("LLM_TIMEOUT_SECS") {
            extractor.timeout_seconds = timeout
                .parse()
                .context("LLM_TIMEOUT_SECS must be a whole number of seconds")?;
        }
        Ok(extractor)
    }

    fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Ensure the database directory exists
    pub async fn ensure_directories(&self) -> Result<()> {
        use crate::core::FsOps;

        if let Some(db_parent) = self.environment.database_path.parent() {
            FsOps::ensure_dir_exists(db_parent).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_config_file_gives_defaults() {
        let section =
            ConfigManager::load_file_section(Path::new("/nonexistent/config.yaml"), "local").unwrap();
        assert!(section.database_path.is_none());
        assert!(section.extractor.is_none());
    }

    #[test]
    fn test_config_file_sections() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
local:
  database_path: data/local.db
  extractor:
    provider: Ollama
    model_name: llama3
    api_base: http://ollama:11434/v1
production:
  database_path: /var/lib/benchmatch/prod.db
  weights:
    skill: 0.5
    experience: 0.2
    bandwidth: 0.1
    project_activity: 0.1
    client_load: 0.1
    project_cap: 4
    client_cap: 3
"#
        )
        .unwrap();

        let local = ConfigManager::load_file_section(file.path(), "local").unwrap();
        let extractor = local.extractor.unwrap();
        assert_eq!(extractor.provider, ExtractorProvider::Ollama);
        assert_eq!(extractor.model_name, "llama3");
        assert_eq!(extractor.timeout_seconds, DEFAULT_TIMEOUT_SECS);
        assert!(extractor.fallback_to_mock);

        let production = ConfigManager::load_file_section(file.path(), "production").unwrap();
        assert_eq!(
            production.database_path,
            Some(PathBuf::from("/var/lib/benchmatch/prod.db"))
        );
        assert_eq!(production.weights.unwrap().client_cap, 3);
    }

    #[test]
    fn test_provider_defaults() {
        let config = ExtractorConfig::for_provider(ExtractorProvider::OpenAi, "gpt-4o-mini");
        assert_eq!(config.api_base, DEFAULT_OPENAI_BASE);
        assert_eq!(config.model_name, "gpt-4o-mini");
    }

    #[test]
    fn test_resolve_path() {
        let base = Path::new("/srv");
        assert_eq!(
            ConfigManager::resolve_path(base, Path::new("db/profiles.db")),
            PathBuf::from("/srv/db/profiles.db")
        );
        assert_eq!(
            ConfigManager::resolve_path(base, Path::new("/tmp/x.db")),
            PathBuf::from("/tmp/x.db")
        );
    }
}
