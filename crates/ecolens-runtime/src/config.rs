//! Runtime configuration.
//!
//! Loaded from YAML or JSON. Every field has a default, so an empty file is
//! a valid configuration with enrichment disabled. The `circuit_breaker`
//! section is optional; when present the provider is wrapped in a breaker
//! shared by all analyses.
//!
//! ```yaml
//! enrichment:
//!   enabled: true
//!   provider: gemini
//!   model: gemini-1.5-flash
//!   timeout: 15s
//!   provider_config:
//!     base_url: https://generativelanguage.googleapis.com/v1beta
//! circuit_breaker:
//!   failure_threshold: 3
//!   recovery_timeout: 30s
//!   success_threshold: 2
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::providers::{CompletionConfig, DEFAULT_MODEL};
use crate::resilience::CircuitBreakerConfig;

/// Errors loading runtime configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Top-level runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub enrichment: EnrichmentConfig,

    /// Off unless configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub circuit_breaker: Option<CircuitBreakerConfig>,
}

/// Settings for the optional enrichment call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Off unless explicitly enabled
    pub enabled: bool,

    /// Registry key of the provider factory
    pub provider: String,

    pub model: String,

    /// Upper bound on the whole enrichment call
    #[serde(with = "humantime_duration")]
    pub timeout: Duration,

    /// Free-form settings handed to the provider factory
    pub provider_config: JsonValue,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            provider: "gemini".to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(15),
            provider_config: JsonValue::Object(Default::default()),
        }
    }
}

impl EnrichmentConfig {
    /// Completion settings for the configured model and timeout.
    pub fn completion_config(&self) -> CompletionConfig {
        CompletionConfig::new(self.model.clone()).with_timeout(self.timeout)
    }
}

impl RuntimeConfig {
    /// Configuration with enrichment switched on for `provider`.
    pub fn enabled(provider: impl Into<String>) -> Self {
        let mut config = Self::default();
        config.enrichment.enabled = true;
        config.enrichment.provider = provider.into();
        config
    }

    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as null
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a file; `.json` is parsed as JSON, anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let enrichment = &self.enrichment;
        if enrichment.enabled && enrichment.provider.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "enrichment.provider must be set when enrichment is enabled".to_string(),
            ));
        }
        if enrichment.timeout.is_zero() {
            return Err(ConfigError::Invalid(
                "enrichment.timeout must be greater than zero".to_string(),
            ));
        }
        if !enrichment.provider_config.is_object() {
            return Err(ConfigError::Invalid(
                "enrichment.provider_config must be a mapping".to_string(),
            ));
        }

        if let Some(breaker) = &self.circuit_breaker {
            if breaker.failure_threshold == 0 || breaker.success_threshold == 0 {
                return Err(ConfigError::Invalid(
                    "circuit_breaker thresholds must be at least 1".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Serde helper for durations written as "15s", "1m 30s", "250ms".
pub(crate) mod humantime_duration {
    use serde::{de::Error, Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(D::Error::custom)
    }
}
