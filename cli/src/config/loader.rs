//! CLI configuration loader for syllabus
//!
//! Implements single-source priority loading with flag overrides:
//! 1. --config file/dir (highest priority)
//! 2. Current working directory: ./syllabus.json or ./.syllabus/config.json
//! 3. XDG config: $XDG_CONFIG_HOME/syllabus/config.json or ~/.config/syllabus/config.json
//! 4. Environment variables only (no files)

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use syllabus_core::{ModelParams, Protocol, RagConfig, ResolvedLlmConfig};
use tracing::debug;

fn default_protocol() -> String {
    Protocol::Anthropic.as_str().to_string()
}

/// Raw configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawConfig {
    /// Protocol to use
    #[serde(default = "default_protocol")]
    pub protocol: String,
    /// API key (can be "env:VAR_NAME" for environment variable)
    pub api_key: String,
    /// Base URL (optional, uses protocol default if not specified)
    pub base_url: Option<String>,
    /// Model name (optional, uses protocol default if not specified)
    pub model: Option<String>,
    /// Model parameters (optional)
    #[serde(default)]
    pub params: ModelParams,
    /// Additional headers (optional)
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Retrieval and tool loop settings (optional)
    #[serde(default)]
    pub rag: RagConfig,
}

/// Fully resolved CLI configuration
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub llm: ResolvedLlmConfig,
    pub rag: RagConfig,
}

/// CLI configuration loader
#[derive(Debug, Clone, Default)]
pub struct CliConfigLoader {
    /// Override config file/directory path
    config_override: Option<PathBuf>,
    /// Directory searched for project config, defaults to the cwd
    working_dir: Option<PathBuf>,
    /// Flag overrides
    api_key_override: Option<String>,
    base_url_override: Option<String>,
    model_override: Option<String>,
    max_rounds_override: Option<usize>,
}

impl CliConfigLoader {
    /// Create a new loader
    pub fn new() -> Self {
        Self::default()
    }

    /// Set config file/directory override
    pub fn with_config_override(mut self, path: PathBuf) -> Self {
        self.config_override = Some(path);
        self
    }

    /// Search this directory instead of the current one
    pub fn with_working_dir(mut self, path: PathBuf) -> Self {
        self.working_dir = Some(path);
        self
    }

    /// Set API key override
    pub fn with_api_key_override(mut self, api_key: String) -> Self {
        self.api_key_override = Some(api_key);
        self
    }

    /// Set base URL override
    pub fn with_base_url_override(mut self, base_url: String) -> Self {
        self.base_url_override = Some(base_url);
        self
    }

    /// Set model override
    pub fn with_model_override(mut self, model: String) -> Self {
        self.model_override = Some(model);
        self
    }

    /// Set tool round budget override
    pub fn with_max_rounds_override(mut self, max_rounds: usize) -> Self {
        self.max_rounds_override = Some(max_rounds);
        self
    }

    /// Load and resolve configuration
    pub async fn load(&self) -> Result<LoadedConfig> {
        let mut config = if let Some(override_path) = &self.config_override {
            self.load_from_path(override_path).await.with_context(|| {
                format!(
                    "Failed to load config from override path: {}",
                    override_path.display()
                )
            })?
        } else {
            self.search_and_load().await?
        };

        if let Some(api_key) = &self.api_key_override {
            config.api_key = api_key.clone();
        }
        if let Some(base_url) = &self.base_url_override {
            config.base_url = Some(base_url.clone());
        }
        if let Some(model) = &self.model_override {
            config.model = Some(model.clone());
        }
        if let Some(max_rounds) = self.max_rounds_override {
            config.rag.max_tool_rounds = max_rounds;
        }

        resolve_config(config)
    }

    /// Load only the retrieval settings, without requiring LLM credentials
    pub async fn load_rag_config(&self) -> Result<RagConfig> {
        let mut rag = match &self.config_override {
            Some(path) => self.load_from_path(path).await?.rag,
            None => match self.find_config_file() {
                Some(path) => load_file(&path).await?.rag,
                None => RagConfig::default(),
            },
        };

        if let Some(max_rounds) = self.max_rounds_override {
            rag.max_tool_rounds = max_rounds;
        }
        rag.validate()
            .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;
        Ok(rag)
    }

    /// Search for config in priority order
    async fn search_and_load(&self) -> Result<RawConfig> {
        match self.find_config_file() {
            Some(path) => load_file(&path).await,
            None => raw_from_env(
                std::env::var("ANTHROPIC_API_KEY").ok(),
                std::env::var("ANTHROPIC_MODEL").ok(),
                std::env::var("ANTHROPIC_BASE_URL").ok(),
            ),
        }
    }

    /// First existing config file among the project and XDG locations
    fn find_config_file(&self) -> Option<PathBuf> {
        let cwd = self
            .working_dir
            .clone()
            .or_else(|| std::env::current_dir().ok());

        let mut candidates = Vec::new();
        if let Some(cwd) = cwd {
            candidates.push(cwd.join("syllabus.json"));
            candidates.push(cwd.join(".syllabus").join("config.json"));
        }
        if let Some(config_dir) = xdg_config_dir() {
            candidates.push(config_dir.join("syllabus").join("config.json"));
        }

        let found = candidates.into_iter().find(|path| path.is_file());
        if let Some(path) = &found {
            debug!("Using config file: {}", path.display());
        }
        found
    }

    /// Load configuration from a specific path (file or directory)
    async fn load_from_path(&self, path: &Path) -> Result<RawConfig> {
        if path.is_file() {
            load_file(path).await
        } else if path.is_dir() {
            let config_file = path.join("config.json");
            if config_file.exists() {
                load_file(&config_file).await
            } else {
                Err(anyhow!(
                    "No config.json found in directory: {}",
                    path.display()
                ))
            }
        } else {
            Err(anyhow!("Config path does not exist: {}", path.display()))
        }
    }
}

/// Load a single config file
async fn load_file(path: &Path) -> Result<RawConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Build a raw config from environment values
fn raw_from_env(
    api_key: Option<String>,
    model: Option<String>,
    base_url: Option<String>,
) -> Result<RawConfig> {
    let api_key = api_key.ok_or_else(|| {
        anyhow!("No configuration found. Please create a syllabus.json file or set ANTHROPIC_API_KEY")
    })?;

    Ok(RawConfig {
        protocol: default_protocol(),
        api_key,
        base_url,
        model,
        params: ModelParams::default(),
        headers: HashMap::new(),
        rag: RagConfig::default(),
    })
}

/// Get XDG config directory
fn xdg_config_dir() -> Option<PathBuf> {
    match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg_config) if !xdg_config.is_empty() => Some(PathBuf::from(xdg_config)),
        _ => dirs::home_dir().map(|home| home.join(".config")),
    }
}

/// Resolve raw config to the final configuration
fn resolve_config(config: RawConfig) -> Result<LoadedConfig> {
    let protocol = Protocol::parse(&config.protocol)
        .ok_or_else(|| anyhow!("Unsupported protocol: {}", config.protocol))?;

    // Resolve API key (handle env: prefix)
    let api_key = match config.api_key.strip_prefix("env:") {
        Some(var_name) => std::env::var(var_name)
            .with_context(|| format!("Environment variable not found: {}", var_name))?,
        None => config.api_key,
    };

    let base_url = config
        .base_url
        .unwrap_or_else(|| protocol.default_base_url().to_string());
    let model = config
        .model
        .unwrap_or_else(|| protocol.default_model().to_string());

    let llm = ResolvedLlmConfig::new(protocol, base_url, api_key, model)
        .with_params(config.params)
        .with_headers(config.headers);

    llm.validate()
        .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;
    config
        .rag
        .validate()
        .map_err(|e| anyhow!("Configuration validation failed: {}", e))?;

    Ok(LoadedConfig {
        llm,
        rag: config.rag,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    #[tokio::test]
    async fn test_load_from_explicit_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.json");
        write(
            &path,
            r#"{
                "api_key": "sk-test",
                "model": "claude-test",
                "params": {"max_tokens": 400, "temperature": 0.0},
                "rag": {"max_tool_rounds": 3}
            }"#,
        );

        let config = CliConfigLoader::new()
            .with_config_override(path)
            .load()
            .await
            .unwrap();

        assert_eq!(config.llm.api_key, "sk-test");
        assert_eq!(config.llm.model, "claude-test");
        assert_eq!(config.llm.base_url, "https://api.anthropic.com");
        assert_eq!(config.llm.params.max_tokens, Some(400));
        assert_eq!(config.rag.max_tool_rounds, 3);
        assert_eq!(config.rag.max_results, 5);
    }

    #[tokio::test]
    async fn test_load_from_directory_override() {
        let dir = tempdir().unwrap();
        write(
            &dir.path().join("config.json"),
            r#"{"api_key": "sk-dir"}"#,
        );

        let config = CliConfigLoader::new()
            .with_config_override(dir.path().to_path_buf())
            .load()
            .await
            .unwrap();

        assert_eq!(config.llm.api_key, "sk-dir");
        assert_eq!(config.llm.model, Protocol::Anthropic.default_model());
    }

    #[tokio::test]
    async fn test_project_config_is_discovered() {
        let dir = tempdir().unwrap();
        write(
            &dir.path().join(".syllabus").join("config.json"),
            r#"{"api_key": "sk-project", "base_url": "http://localhost:8080"}"#,
        );

        let config = CliConfigLoader::new()
            .with_working_dir(dir.path().to_path_buf())
            .load()
            .await
            .unwrap();

        assert_eq!(config.llm.api_key, "sk-project");
        assert_eq!(config.llm.base_url, "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_flag_overrides_apply_last() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("syllabus.json");
        write(&path, r#"{"api_key": "sk-file", "model": "from-file"}"#);

        let config = CliConfigLoader::new()
            .with_config_override(path)
            .with_api_key_override("sk-flag".to_string())
            .with_model_override("from-flag".to_string())
            .with_base_url_override("https://proxy.example.com".to_string())
            .with_max_rounds_override(4)
            .load()
            .await
            .unwrap();

        assert_eq!(config.llm.api_key, "sk-flag");
        assert_eq!(config.llm.model, "from-flag");
        assert_eq!(config.llm.base_url, "https://proxy.example.com");
        assert_eq!(config.rag.max_tool_rounds, 4);
    }

    #[tokio::test]
    async fn test_env_prefixed_api_key() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("syllabus.json");
        write(&path, r#"{"api_key": "env:SYLLABUS_LOADER_TEST_KEY"}"#);
        std::env::set_var("SYLLABUS_LOADER_TEST_KEY", "sk-from-env");

        let config = CliConfigLoader::new()
            .with_config_override(path.clone())
            .load()
            .await
            .unwrap();
        assert_eq!(config.llm.api_key, "sk-from-env");

        write(&path, r#"{"api_key": "env:SYLLABUS_LOADER_TEST_MISSING"}"#);
        let err = CliConfigLoader::new()
            .with_config_override(path)
            .load()
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("SYLLABUS_LOADER_TEST_MISSING"));
    }

    #[tokio::test]
    async fn test_invalid_values_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("syllabus.json");

        write(&path, r#"{"api_key": "sk", "protocol": "openai"}"#);
        let loader = CliConfigLoader::new().with_config_override(path.clone());
        assert!(loader.load().await.is_err());

        write(&path, r#"{"api_key": "sk", "rag": {"max_tool_rounds": 0}}"#);
        assert!(loader.load().await.is_err());

        write(&path, "not json");
        assert!(loader.load().await.is_err());
    }

    #[tokio::test]
    async fn test_missing_override_path() {
        let dir = tempdir().unwrap();
        let result = CliConfigLoader::new()
            .with_config_override(dir.path().join("nope.json"))
            .load()
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_rag_config_without_credentials() {
        let dir = tempdir().unwrap();
        write(
            &dir.path().join("syllabus.json"),
            r#"{"api_key": "", "rag": {"max_results": 3}}"#,
        );

        let rag = CliConfigLoader::new()
            .with_working_dir(dir.path().to_path_buf())
            .load_rag_config()
            .await
            .unwrap();

        assert_eq!(rag.max_results, 3);
        assert_eq!(rag.max_tool_rounds, 2);
    }

    #[test]
    fn test_env_only_requires_api_key() {
        assert!(raw_from_env(None, None, None).is_err());

        let raw = raw_from_env(
            Some("sk-env".to_string()),
            Some("claude-env".to_string()),
            None,
        )
        .unwrap();
        let config = resolve_config(raw).unwrap();
        assert_eq!(config.llm.model, "claude-env");
        assert_eq!(config.llm.base_url, "https://api.anthropic.com");
    }
}
