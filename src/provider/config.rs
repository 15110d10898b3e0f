//! Runtime configuration for the HTTP completion adapter.

use crate::provider::{domain::ReasoningEffort, ports::ProviderError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the provider API key.
pub const API_KEY_VAR: &str = "GROQ_API_KEY";
/// Environment variable overriding the provider base URL.
pub const BASE_URL_VAR: &str = "GROQ_BASE_URL";
/// Environment variable overriding the default model.
pub const MODEL_VAR: &str = "GROQ_MODEL";
/// Environment variable overriding the request timeout, in whole seconds.
pub const TIMEOUT_SECS_VAR: &str = "GROQ_TIMEOUT_SECS";

/// Base URL of the OpenAI-compatible Groq endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
/// Model used when neither configuration nor request names one.
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";

/// Connection settings for the completion provider.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API key sent as a bearer token.
    pub api_key: String,

    /// Base URL of the chat-completions API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model used when a request does not name one.
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Whole-request timeout enforced by the HTTP client.
    #[serde(default = "default_timeout")]
    pub timeout: Duration,

    /// Reasoning effort used when a request does not set one.
    #[serde(default)]
    pub reasoning_effort: ReasoningEffort,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field("timeout", &self.timeout)
            .field("reasoning_effort", &self.reasoning_effort)
            .finish()
    }
}

impl ProviderConfig {
    /// Creates a configuration with default endpoint, model, and timeout.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: default_base_url(),
            default_model: default_model(),
            timeout: default_timeout(),
            reasoning_effort: ReasoningEffort::default(),
        }
    }

    /// Loads configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] when the API key is missing
    /// or an override cannot be parsed.
    pub fn from_env() -> Result<Self, ProviderError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] when the API key is missing
    /// or an override cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ProviderError> {
        let api_key = lookup(API_KEY_VAR)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                ProviderError::Configuration(format!("{API_KEY_VAR} is not configured"))
            })?;

        let mut config = Self::new(api_key.trim());
        if let Some(base_url) = lookup(BASE_URL_VAR).filter(|value| !value.trim().is_empty()) {
            config = config.with_base_url(base_url);
        }
        if let Some(model) = lookup(MODEL_VAR).filter(|value| !value.trim().is_empty()) {
            config.default_model = model.trim().to_owned();
        }
        if let Some(raw_timeout) = lookup(TIMEOUT_SECS_VAR) {
            let seconds = raw_timeout.trim().parse::<u64>().map_err(|err| {
                ProviderError::Configuration(format!("{TIMEOUT_SECS_VAR} is invalid: {err}"))
            })?;
            config.timeout = Duration::from_secs(seconds);
        }
        Ok(config)
    }

    /// Sets the base URL, dropping any trailing slash.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim().trim_end_matches('/').to_owned();
        self
    }

    /// Sets the default model.
    #[must_use]
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the default reasoning effort.
    #[must_use]
    pub const fn with_reasoning_effort(mut self, effort: ReasoningEffort) -> Self {
        self.reasoning_effort = effort;
        self
    }

    /// Returns the chat-completions endpoint URL.
    #[must_use]
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_owned()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_owned()
}

const fn default_timeout() -> Duration {
    Duration::from_secs(120)
}
