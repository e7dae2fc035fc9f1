use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

const ENV_CONFIG_PATH: &str = "CONTRADICTION_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const ENV_API_KEY: &str = "OPENAI_API_KEY";
const ENV_MODEL: &str = "ANALYSIS_MODEL";
const ENV_PROMPTS_DIR: &str = "PROMPTS_DIR";
const ENV_CORS_ORIGINS: &str = "CORS_ORIGINS";

const ENV_AZURE_ENDPOINT: &str = "AZURE_OPENAI_ENDPOINT";
const ENV_AZURE_API_KEY: &str = "AZURE_OPENAI_API_KEY";
const ENV_AZURE_API_VERSION: &str = "AZURE_OPENAI_API_VERSION";
const ENV_AZURE_DEPLOYMENT: &str = "AZURE_OPENAI_DEPLOYMENT_NAME";

const AZURE_VARS: [&str; 4] = [
    ENV_AZURE_ENDPOINT,
    ENV_AZURE_API_KEY,
    ENV_AZURE_API_VERSION,
    ENV_AZURE_DEPLOYMENT,
];

/// Default model for classification and contradiction detection
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Errors that prevent the service from starting
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    Missing(&'static str),

    #[error("Missing required configuration: {}", .0.join(", "))]
    MissingAll(Vec<&'static str>),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Which analyzed categories are reported in the response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryInclusion {
    /// Every analyzed category, even without contradictions
    #[default]
    All,
    /// Only categories with at least one contradiction
    WithContradictions,
}

/// Settings for calls to the reasoning backend
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReasoningSettings {
    pub model: String,
    /// Upper bound on generated tokens, identical for every call
    pub max_output_tokens: u64,
    pub request_timeout_secs: u64,
}

impl Default for ReasoningSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_output_tokens: 1024,
            request_timeout_secs: 60,
        }
    }
}

/// Settings for the analysis pipeline
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub category_inclusion: CategoryInclusion,
    /// Number of categories checked for contradictions at the same time
    pub max_concurrent_detections: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            category_inclusion: CategoryInclusion::All,
            max_concurrent_detections: 4,
        }
    }
}

/// Azure OpenAI deployment
#[derive(Clone, PartialEq, Eq)]
pub struct AzureSettings {
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com`
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    pub deployment: String,
}

/// Provider serving the reasoning calls
#[derive(Clone, PartialEq, Eq)]
pub enum LlmBackend {
    OpenAi { api_key: String },
    Azure(AzureSettings),
}

impl fmt::Debug for LlmBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmBackend::OpenAi { .. } => f
                .debug_struct("OpenAi")
                .field("api_key", &"<redacted>")
                .finish(),
            LlmBackend::Azure(azure) => f
                .debug_struct("Azure")
                .field("endpoint", &azure.endpoint)
                .field("api_key", &"<redacted>")
                .field("api_version", &azure.api_version)
                .field("deployment", &azure.deployment)
                .finish(),
        }
    }
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub reasoning: ReasoningSettings,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    /// Directory with `.prompty` templates overriding the built-in ones
    #[serde(default)]
    pub prompts_dir: Option<PathBuf>,
    /// Origins allowed to call the API from a browser
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub backend: LlmBackend,
    pub reasoning: ReasoningSettings,
    pub analysis: AnalysisSettings,
    pub prompts_dir: Option<PathBuf>,
    pub cors_origins: Vec<String>,
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Result<Self, ConfigError> {
        let config_path = std::env::var(ENV_CONFIG_PATH)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let file = Self::load_config_file(&config_path).unwrap_or_default();

        Self::from_sources(|key| std::env::var(key).ok(), file)
    }

    /// Build configuration from a variable lookup and a parsed config file
    ///
    /// Environment values take precedence over the file. Setting any
    /// `AZURE_OPENAI_*` variable selects Azure OpenAI, which then needs all four.
    pub fn from_sources<F>(lookup: F, file: ConfigFile) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port: u16 = match non_empty("PORT") {
            Some(p) => p
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT must be a port number, got '{}'", p)))?,
            None => 8080,
        };
        let host = non_empty("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let mut reasoning = file.reasoning;
        if let Some(model) = non_empty(ENV_MODEL) {
            reasoning.model = model;
        }

        let backend = if AZURE_VARS.iter().any(|&key| non_empty(key).is_some()) {
            let missing: Vec<&'static str> = AZURE_VARS
                .into_iter()
                .filter(|&key| non_empty(key).is_none())
                .collect();
            if !missing.is_empty() {
                return Err(ConfigError::MissingAll(missing));
            }

            let azure = AzureSettings {
                endpoint: non_empty(ENV_AZURE_ENDPOINT).unwrap_or_default(),
                api_key: non_empty(ENV_AZURE_API_KEY).unwrap_or_default(),
                api_version: non_empty(ENV_AZURE_API_VERSION).unwrap_or_default(),
                deployment: non_empty(ENV_AZURE_DEPLOYMENT).unwrap_or_default(),
            };
            // Azure routes requests by deployment name
            reasoning.model = azure.deployment.clone();
            LlmBackend::Azure(azure)
        } else {
            let api_key = non_empty(ENV_API_KEY).ok_or(ConfigError::Missing(ENV_API_KEY))?;
            LlmBackend::OpenAi { api_key }
        };

        let prompts_dir = non_empty(ENV_PROMPTS_DIR)
            .map(PathBuf::from)
            .or(file.prompts_dir);

        let cors_origins = match non_empty(ENV_CORS_ORIGINS) {
            Some(origins) => parse_origins(&origins),
            None => file.cors_origins,
        };

        let config = Self {
            host,
            port,
            backend,
            reasoning,
            analysis: file.analysis,
            prompts_dir,
            cors_origins,
        };
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.reasoning.model.trim().is_empty() {
            return Err(ConfigError::Missing("reasoning.model"));
        }
        if self.reasoning.max_output_tokens == 0 {
            return Err(ConfigError::Invalid(
                "reasoning.max_output_tokens must be greater than zero".to_string(),
            ));
        }
        if self.reasoning.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "reasoning.request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.analysis.max_concurrent_detections == 0 {
            return Err(ConfigError::Invalid(
                "analysis.max_concurrent_detections must be greater than zero".to_string(),
            ));
        }
        if let Some(origin) = self
            .cors_origins
            .iter()
            .find(|origin| !is_http_url(origin) || origin.contains('*'))
        {
            return Err(ConfigError::Invalid(format!(
                "CORS origin must be an explicit http(s) origin, got '{}'",
                origin
            )));
        }
        if let LlmBackend::Azure(azure) = &self.backend
            && !is_http_url(&azure.endpoint)
        {
            return Err(ConfigError::Invalid(format!(
                "{} must be an http(s) URL, got '{}'",
                ENV_AZURE_ENDPOINT, azure.endpoint
            )));
        }
        Ok(())
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => Self::parse_config_file(path, &contents),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    fn parse_config_file(path: &Path, contents: &str) -> Option<ConfigFile> {
        // Handle empty file
        let contents = contents.trim();
        if contents.is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Some(ConfigFile::default());
        }

        match serde_yaml::from_str(contents) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "Loaded configuration from file");
                Some(config)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("https://") || value.starts_with("http://")
}

/// Split a comma-separated origin list, skipping blanks
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
