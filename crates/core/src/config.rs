//! Configuration management for the Localfind CLI.
//!
//! This module handles loading and merging configuration from multiple
//! sources, in increasing order of precedence:
//! - Built-in defaults
//! - Config file (`localfind.yaml`)
//! - Environment variables
//! - Command-line flags

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Default Gemini model for the fast search variant.
pub const DEFAULT_FAST_MODEL: &str = "gemini-2.5-flash";

/// Default Gemini model for the deep search variant.
pub const DEFAULT_DEEP_MODEL: &str = "gemini-2.5-pro";

/// Main application configuration.
///
/// This struct holds all global configuration options that affect
/// CLI behavior across commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Generative provider (currently only "gemini")
    pub provider: String,

    /// API key for the provider
    pub api_key: Option<String>,

    /// Custom endpoint base URL (defaults to the provider's public endpoint)
    pub endpoint: Option<String>,

    /// Model identifiers per search depth
    pub models: ModelCatalog,

    /// Retry tuning for the dispatch layer
    pub retry: RetryConfig,

    /// Optional Handlebars template file replacing the built-in prompt
    pub prompt_template: Option<PathBuf>,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Model identifiers for the two search variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelCatalog {
    /// Model used for the "fast" preference (and as "deep" fallback)
    pub fast: String,

    /// Model used for the "deep" preference (and as "fast" fallback)
    pub deep: String,
}

impl Default for ModelCatalog {
    fn default() -> Self {
        Self {
            fast: DEFAULT_FAST_MODEL.to_string(),
            deep: DEFAULT_DEEP_MODEL.to_string(),
        }
    }
}

/// Retry tuning for transient-failure handling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Attempts per model before giving up on overload errors
    #[serde(rename = "maxAttempts")]
    pub max_attempts: u32,

    /// Base delay for exponential backoff, in milliseconds
    #[serde(rename = "initialDelayMs")]
    pub initial_delay_ms: u64,

    /// Extra same-request attempts when the response fails to normalize
    #[serde(rename = "parseRetries")]
    pub parse_retries: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 1000,
            parse_retries: 2,
        }
    }
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    provider: Option<String>,
    endpoint: Option<String>,
    models: Option<ModelCatalog>,
    retry: Option<RetryConfig>,
    prompt: Option<PromptFileConfig>,
    logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PromptFileConfig {
    #[serde(rename = "templateFile")]
    template_file: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingConfig {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            provider: "gemini".to_string(),
            api_key: None,
            endpoint: None,
            models: ModelCatalog::default(),
            retry: RetryConfig::default(),
            prompt_template: None,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from the config file and environment variables.
    ///
    /// Environment variables:
    /// - `LOCALFIND_CONFIG`: Path to config file (default: `localfind.yaml`)
    /// - `LOCALFIND_PROVIDER`: Generative provider
    /// - `LOCALFIND_API_KEY` / `GEMINI_API_KEY`: API key
    /// - `LOCALFIND_ENDPOINT`: Custom endpoint base URL
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        Self::load_with_file(None)
    }

    /// Load configuration, preferring an explicitly supplied config path
    /// (e.g. from the `--config` flag) over `LOCALFIND_CONFIG` and the
    /// default file. An explicit path that does not exist is an error; the
    /// implicit default is skipped silently when absent.
    pub fn load_with_file(config_file: Option<PathBuf>) -> AppResult<Self> {
        let mut config = Self::default();

        let explicit = config_file
            .or_else(|| std::env::var("LOCALFIND_CONFIG").ok().map(PathBuf::from));

        let config_path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file not found: {:?}",
                        path
                    )));
                }
                config.config_file = Some(path.clone());
                path
            }
            None => PathBuf::from("localfind.yaml"),
        };

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override the config file
        if let Ok(provider) = std::env::var("LOCALFIND_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(endpoint) = std::env::var("LOCALFIND_ENDPOINT") {
            config.endpoint = Some(endpoint);
        }

        config.api_key = std::env::var("LOCALFIND_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .ok();
        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(provider) = config_file.provider {
            result.provider = provider;
        }

        if let Some(endpoint) = config_file.endpoint {
            result.endpoint = Some(endpoint);
        }

        if let Some(models) = config_file.models {
            result.models = models;
        }

        if let Some(retry) = config_file.retry {
            result.retry = retry;
        }

        if let Some(prompt) = config_file.prompt {
            if let Some(template_file) = prompt.template_file {
                result.prompt_template = Some(PathBuf::from(template_file));
            }
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// This method merges command-line flags with the loaded configuration,
    /// giving precedence to CLI flags over environment variables.
    pub fn with_overrides(
        mut self,
        provider: Option<String>,
        api_key: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(api_key) = api_key {
            self.api_key = Some(api_key);
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Resolve the model identifier for a search-depth name ("fast"/"deep").
    pub fn model_for(&self, depth: &str) -> AppResult<&str> {
        match depth {
            "fast" => Ok(&self.models.fast),
            "deep" => Ok(&self.models.deep),
            other => Err(AppError::Config(format!(
                "Unknown search depth: {}. Supported: fast, deep",
                other
            ))),
        }
    }

    /// Validate configuration for the active provider.
    pub fn validate(&self) -> AppResult<()> {
        let known_providers = ["gemini"];

        if !known_providers.contains(&self.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown provider: {}. Supported: {}",
                self.provider,
                known_providers.join(", ")
            )));
        }

        if self.api_key.as_deref().unwrap_or("").is_empty() {
            return Err(AppError::Config(
                "No API key configured. Set GEMINI_API_KEY or pass --api-key.".to_string(),
            ));
        }

        if let Some(ref template) = self.prompt_template {
            if !template.exists() {
                return Err(AppError::Config(format!(
                    "Prompt template file not found: {:?}",
                    template
                )));
            }
        }

        Ok(())
    }
}
