//! Process configuration.
//!
//! `AppConfig` is built once at start-up (`AppConfig::from_env`) and passed
//! by reference afterwards; nothing reads the environment after that point.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;

use crate::pipeline::summary::{
    GeminiClient, OllamaClient, Summarizer, SummaryError, DEFAULT_GEMINI_MODEL,
    DEFAULT_GEMINI_URL, DEFAULT_OLLAMA_URL,
};

/// Application-level constants
pub const APP_NAME: &str = "MediScan";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

const DEFAULT_OLLAMA_MODEL: &str = "llama3.1";
const DEFAULT_SUMMARY_TIMEOUT_SECS: u64 = 120;

/// Get the application data directory
/// ~/MediScan/ on all platforms; falls back to the working directory.
pub fn app_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Get the models directory (estimator + scaler JSON files)
pub fn models_dir() -> PathBuf {
    app_data_dir().join("models")
}

pub fn default_log_filter() -> &'static str {
    "info,mediscan_lib=debug"
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown summarizer backend '{0}' (expected gemini or ollama)")]
    UnknownSummarizer(String),

    #[error("Invalid value for {var}: '{value}'")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SummarizerBackend {
    Gemini,
    Ollama,
}

impl std::str::FromStr for SummarizerBackend {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" => Ok(Self::Gemini),
            "ollama" => Ok(Self::Ollama),
            _ => Err(ConfigError::UnknownSummarizer(s.to_string())),
        }
    }
}

/// Secret that never shows up in logs or serialized config.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AppConfig {
    pub models_dir: PathBuf,
    pub summarizer: SummarizerBackend,
    #[serde(skip)]
    pub gemini_api_key: Option<ApiKey>,
    pub summary_model: String,
    pub summarizer_url: String,
    pub summary_timeout_secs: u64,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            models_dir: models_dir(),
            summarizer: SummarizerBackend::Gemini,
            gemini_api_key: None,
            summary_model: DEFAULT_GEMINI_MODEL.to_string(),
            summarizer_url: DEFAULT_GEMINI_URL.to_string(),
            summary_timeout_secs: DEFAULT_SUMMARY_TIMEOUT_SECS,
            log_filter: default_log_filter().to_string(),
        }
    }
}

impl AppConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();

        if let Some(dir) = get("MEDISCAN_MODELS_DIR") {
            config.models_dir = PathBuf::from(dir);
        }
        if let Some(backend) = get("MEDISCAN_SUMMARIZER") {
            config.summarizer = backend.parse()?;
        }
        if config.summarizer == SummarizerBackend::Ollama {
            config.summary_model = DEFAULT_OLLAMA_MODEL.to_string();
            config.summarizer_url = DEFAULT_OLLAMA_URL.to_string();
        }
        config.gemini_api_key = get("GEMINI_API_KEY").map(ApiKey);
        if let Some(model) = get("MEDISCAN_SUMMARY_MODEL") {
            config.summary_model = model;
        }
        if let Some(url) = get("MEDISCAN_SUMMARIZER_URL") {
            config.summarizer_url = url;
        }
        if let Some(secs) = get("MEDISCAN_SUMMARY_TIMEOUT_SECS") {
            config.summary_timeout_secs = secs
                .trim()
                .parse()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::InvalidValue {
                    var: "MEDISCAN_SUMMARY_TIMEOUT_SECS",
                    value: secs,
                })?;
        }
        if let Some(filter) = get("MEDISCAN_LOG") {
            config.log_filter = filter;
        }

        Ok(config)
    }

    /// Construct the configured summarizer client.
    pub fn build_summarizer(&self) -> Result<Box<dyn Summarizer + Send + Sync>, SummaryError> {
        match self.summarizer {
            SummarizerBackend::Gemini => {
                let key = self
                    .gemini_api_key
                    .as_ref()
                    .ok_or(SummaryError::MissingApiKey)?;
                Ok(Box::new(GeminiClient::new(
                    &self.summarizer_url,
                    key.expose(),
                    self.summary_timeout_secs,
                )?))
            }
            SummarizerBackend::Ollama => Ok(Box::new(OllamaClient::new(
                &self.summarizer_url,
                self.summary_timeout_secs,
            )?)),
        }
    }
}
