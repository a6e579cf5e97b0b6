//! Chat-completion backends used by LLM enrichment.
//!
//! The enrichment prompt is a single completion request; [`LlmProvider`]
//! is the seam between that request and a concrete API. Gemini is the only
//! built-in backend and sits behind the `gemini` feature. Credentials go
//! through [`ApiCredential`] so they never reach logs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

mod factory;
pub mod secrets;

#[cfg(feature = "gemini")]
mod gemini;

pub use factory::{ProviderFactory, ProviderRegistry};
pub use secrets::{ApiCredential, CredentialSource};

#[cfg(feature = "gemini")]
pub use gemini::{GeminiProvider, GeminiProviderFactory, GEMINI_API_KEY_ENV};

/// Model used when the config names none.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Errors from a completion backend.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    #[error("Rate limit exceeded, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    ParseError(String),

    #[error("Timeout after {0:?}")]
    Timeout(Duration),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// Settings for one completion request.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub model: String,

    /// Cap on generated tokens; the enrichment JSON is small
    pub max_tokens: u32,

    /// Zero keeps repeated analyses of one product stable
    pub temperature: f32,

    /// Per-request HTTP timeout
    pub timeout: Duration,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1024,
            temperature: 0.0,
            timeout: Duration::from_secs(15),
        }
    }
}

impl CompletionConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// One message of a completion request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// "system", "user" or "assistant"
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Text returned by a completion backend.
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    pub content: String,
    pub usage: TokenUsage,

    /// Model version reported by the backend
    pub model: String,

    pub stop_reason: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.prompt_tokens + self.completion_tokens
    }
}

/// A chat-completion backend.
///
/// Only the enrichment path calls this; heuristic scoring never does.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        config: &CompletionConfig,
    ) -> Result<CompletionResponse, ProviderError>;

    /// Name used in logs and circuit breaker keys.
    fn name(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_roles() {
        assert_eq!(ChatMessage::system("rubric").role, "system");
        assert_eq!(ChatMessage::user("product").role, "user");
    }

    #[test]
    fn test_completion_config_is_deterministic_by_default() {
        let config = CompletionConfig::default();
        assert_eq!(config.model, "gemini-1.5-flash");
        assert_eq!(config.temperature, 0.0);
        assert_eq!(config.timeout, Duration::from_secs(15));

        let config = CompletionConfig::new("gemini-1.5-pro").with_timeout(Duration::from_secs(3));
        assert_eq!(config.model, "gemini-1.5-pro");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage {
            prompt_tokens: 120,
            completion_tokens: 40,
        };
        assert_eq!(usage.total(), 160);
    }
}
