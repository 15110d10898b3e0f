//! Per-attempt provider options.

use super::ProviderDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output token limit applied when the caller does not set one.
pub const DEFAULT_MAX_TOKENS: u32 = 8192;

/// Sampling temperature on the external 0–100 integer scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Temperature(u8);

impl Temperature {
    /// Largest value accepted on the external scale.
    pub const MAX: u8 = 100;

    /// Creates a validated temperature.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderDomainError::InvalidTemperature`] when the value
    /// exceeds 100.
    pub fn new(value: u32) -> Result<Self, ProviderDomainError> {
        u8::try_from(value)
            .ok()
            .filter(|scaled| *scaled <= Self::MAX)
            .map(Self)
            .ok_or(ProviderDomainError::InvalidTemperature(value))
    }

    /// Returns the value on the external 0–100 scale.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the value mapped linearly onto the provider's 0.0–1.0 scale.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "the provider expects a fractional temperature"
    )]
    pub fn provider_scale(self) -> f64 {
        f64::from(self.0) / f64::from(Self::MAX)
    }
}

impl TryFrom<u32> for Temperature {
    type Error = ProviderDomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Temperature> for u32 {
    fn from(value: Temperature) -> Self {
        Self::from(value.0)
    }
}

/// How an attempt talks to the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// One request, one complete response.
    #[default]
    SingleShot,
    /// One request, response delivered as incremental fragments.
    Streamed,
    /// Opaque multi-agent mode; executed as a single-shot request.
    MultiAgent,
}

impl ExecutionMode {
    /// Returns the canonical string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SingleShot => "single_shot",
            Self::Streamed => "streamed",
            Self::MultiAgent => "multi_agent",
        }
    }

    /// Returns `true` when the mode consumes a fragment stream.
    #[must_use]
    pub const fn is_streamed(self) -> bool {
        matches!(self, Self::Streamed)
    }
}

impl fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasoning-effort hint forwarded to reasoning-capable models.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasoningEffort {
    /// Minimal deliberation.
    Low,
    /// Balanced deliberation.
    #[default]
    Medium,
    /// Extended deliberation.
    High,
}

impl ReasoningEffort {
    /// Returns the canonical wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl TryFrom<&str> for ReasoningEffort {
    type Error = ProviderDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ProviderDomainError::InvalidReasoningEffort(value.to_owned())),
        }
    }
}

/// Options supplied fresh on every execution attempt.
///
/// Unset fields defer to the adapter's configured defaults, except
/// temperature, which is omitted from the request entirely so that the
/// provider's own default applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderOptions {
    model: Option<String>,
    temperature: Option<Temperature>,
    max_tokens: Option<u32>,
    mode: ExecutionMode,
    reasoning_effort: Option<ReasoningEffort>,
}

impl ProviderOptions {
    /// Creates options with every field unset and single-shot mode.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the model identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderDomainError::EmptyModel`] when the identifier is
    /// blank.
    pub fn with_model(mut self, model: impl Into<String>) -> Result<Self, ProviderDomainError> {
        let raw = model.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ProviderDomainError::EmptyModel);
        }
        self.model = Some(trimmed.to_owned());
        Ok(self)
    }

    /// Sets the sampling temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: Temperature) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Sets the maximum number of output tokens.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderDomainError::InvalidMaxTokens`] when the limit is
    /// zero.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Result<Self, ProviderDomainError> {
        if max_tokens == 0 {
            return Err(ProviderDomainError::InvalidMaxTokens);
        }
        self.max_tokens = Some(max_tokens);
        Ok(self)
    }

    /// Sets the execution mode tag.
    #[must_use]
    pub const fn with_mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    /// Sets the reasoning-effort hint.
    #[must_use]
    pub const fn with_reasoning_effort(mut self, effort: ReasoningEffort) -> Self {
        self.reasoning_effort = Some(effort);
        self
    }

    /// Returns the requested model, if any.
    #[must_use]
    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    /// Returns the requested temperature, if any.
    #[must_use]
    pub const fn temperature(&self) -> Option<Temperature> {
        self.temperature
    }

    /// Returns the explicitly requested token limit, if any.
    #[must_use]
    pub const fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }

    /// Returns the token limit to send, falling back to
    /// [`DEFAULT_MAX_TOKENS`].
    #[must_use]
    pub const fn effective_max_tokens(&self) -> u32 {
        match self.max_tokens {
            Some(limit) => limit,
            None => DEFAULT_MAX_TOKENS,
        }
    }

    /// Returns the execution mode tag.
    #[must_use]
    pub const fn mode(&self) -> ExecutionMode {
        self.mode
    }

    /// Returns the requested reasoning effort, if any.
    #[must_use]
    pub const fn reasoning_effort(&self) -> Option<ReasoningEffort> {
        self.reasoning_effort
    }
}
