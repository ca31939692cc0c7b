//! Configuration management for the CLI.
//!
//! One TOML file holds every section. Secrets normally come from the
//! environment and override the file.

use crate::error::{CliError, Result};
use clubhouse_extractor::ChunkingConfig;
use clubhouse_indexer::IndexerConfig;
use clubhouse_llm::{LlmSettings, ProviderKind};
use clubhouse_rag::RagConfig;
use clubhouse_store::StoreSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Pinecone API key
pub const ENV_PINECONE_API_KEY: &str = "PINECONE_API_KEY";
/// Pinecone index host
pub const ENV_PINECONE_HOST: &str = "PINECONE_HOST";
/// Groq API key
pub const ENV_GROQ_API_KEY: &str = "GROQ_API_KEY";
/// Anthropic API key
pub const ENV_ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
/// Provider override (`groq`, `anthropic`, `mock`)
pub const ENV_LLM_PROVIDER: &str = "CLUBHOUSE_LLM_PROVIDER";

/// Complete application settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Terminal output
    pub output: OutputSettings,

    /// Chunk sizing
    pub chunking: ChunkingConfig,

    /// Ingestion
    pub indexer: IndexerConfig,

    /// Query engine
    pub rag: RagConfig,

    /// LLM provider
    pub llm: LlmSettings,

    /// Vector store
    pub store: StoreSettings,
}

/// Terminal output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    /// Enable colored output
    pub color: bool,

    /// Default output format
    pub format: OutputFormat,

    /// Chat history size
    pub history_size: usize,
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Answer with a sources table
    #[default]
    Table,
    /// JSON format
    Json,
    /// Answer text only
    Quiet,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            history_size: 1000,
        }
    }
}

impl Settings {
    /// Directory holding the config file and chat history.
    pub fn home_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".clubhouse"))
    }

    /// Get the default configuration file path.
    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    /// Load settings and apply environment overrides.
    ///
    /// An explicit `path` must exist. Without one, the default path is used
    /// when present and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Self::default_path()?;
                if default.exists() {
                    Self::from_file(&default)?
                } else {
                    Self::default()
                }
            }
        };
        settings.apply_env_with(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Parse a settings file without environment overrides.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .map_err(|e| CliError::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        Ok(toml::from_str(&contents)?)
    }

    /// Save settings to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Apply overrides from `lookup`, normally the process environment.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(provider) = get(ENV_LLM_PROVIDER) {
            self.llm.provider = provider.parse::<ProviderKind>()?;
        }
        let key_var = match self.llm.provider {
            ProviderKind::Groq => Some(ENV_GROQ_API_KEY),
            ProviderKind::Anthropic => Some(ENV_ANTHROPIC_API_KEY),
            ProviderKind::Mock => None,
        };
        if let Some(key) = key_var.and_then(get) {
            self.llm.api_key = Some(key);
        }

        if let Some(key) = get(ENV_PINECONE_API_KEY) {
            self.store.pinecone.api_key = Some(key);
        }
        if let Some(host) = get(ENV_PINECONE_HOST) {
            self.store.pinecone.host = Some(host);
        }
        Ok(())
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<()> {
        self.chunking.validate()?;
        self.indexer.validate()?;
        self.rag.validate()?;
        self.llm.validate()?;
        self.store.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clubhouse_store::StoreBackend;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.chunking.chunk_size, 300);
        assert_eq!(settings.chunking.chunk_overlap, 50);
        assert_eq!(settings.rag.top_k, 5);
        assert_eq!(settings.store.namespace, "clubs");
        assert_eq!(settings.llm.provider, ProviderKind::Groq);
        assert_eq!(settings.indexer.batch_size, 100);
        assert!(settings.output.color);
    }

    #[test]
    fn test_partial_file() {
        let settings: Settings = toml::from_str(
            r#"
            [chunking]
            chunk_size = 200

            [store]
            backend = "memory"

            [llm]
            provider = "mock"
            "#,
        )
        .unwrap();

        assert_eq!(settings.chunking.chunk_size, 200);
        assert_eq!(settings.chunking.chunk_overlap, 50);
        assert_eq!(settings.store.backend, StoreBackend::Memory);
        assert_eq!(settings.llm.provider, ProviderKind::Mock);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.rag.top_k = 7;
        settings.save(&path).unwrap();

        assert_eq!(Settings::from_file(&path).unwrap(), settings);
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Settings::load(Some(&dir.path().join("missing.toml")));
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn test_env_overrides_secrets() {
        let vars = env(&[
            (ENV_PINECONE_API_KEY, "pc-123"),
            (ENV_PINECONE_HOST, "https://idx.pinecone.io"),
            (ENV_GROQ_API_KEY, "gsk-abc"),
            (ENV_ANTHROPIC_API_KEY, "sk-ant"),
        ]);
        let mut settings = Settings::default();
        settings.apply_env_with(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(settings.store.pinecone.api_key.as_deref(), Some("pc-123"));
        assert_eq!(settings.store.pinecone.host.as_deref(), Some("https://idx.pinecone.io"));
        assert_eq!(settings.llm.api_key.as_deref(), Some("gsk-abc"));
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_provider_override_selects_matching_key() {
        let vars = env(&[
            (ENV_LLM_PROVIDER, "anthropic"),
            (ENV_GROQ_API_KEY, "gsk-abc"),
            (ENV_ANTHROPIC_API_KEY, "sk-ant"),
        ]);
        let mut settings = Settings::default();
        settings.apply_env_with(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(settings.llm.provider, ProviderKind::Anthropic);
        assert_eq!(settings.llm.api_key.as_deref(), Some("sk-ant"));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let vars = env(&[(ENV_LLM_PROVIDER, "openai")]);
        let mut settings = Settings::default();
        assert!(settings.apply_env_with(|k| vars.get(k).cloned()).is_err());
    }

    #[test]
    fn test_blank_env_values_ignored() {
        let vars = env(&[(ENV_PINECONE_API_KEY, "  ")]);
        let mut settings = Settings::default();
        settings.apply_env_with(|k| vars.get(k).cloned()).unwrap();
        assert!(settings.store.pinecone.api_key.is_none());
    }

    #[test]
    fn test_invalid_section_fails_validation() {
        let mut settings = Settings::default();
        settings.store.backend = StoreBackend::Memory;
        settings.chunking.chunk_overlap = 300;
        assert!(matches!(settings.validate(), Err(CliError::InvalidConfig(_))));
    }
}
