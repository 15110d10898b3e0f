//! Request and response payloads for the chat-completions API.

use crate::provider::{
    config::ProviderConfig,
    domain::{ChatMessage, ProviderOptions},
    ports::{ProviderError, ProviderResult},
};
use serde::{Deserialize, Serialize};

/// Outbound chat-completions request body.
#[derive(Debug, Serialize)]
pub(crate) struct CompletionRequest<'a> {
    pub(crate) model: &'a str,
    pub(crate) messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) temperature: Option<f64>,
    pub(crate) max_completion_tokens: u32,
    pub(crate) top_p: u8,
    pub(crate) reasoning_effort: &'static str,
    pub(crate) stream: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct WireMessage<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> CompletionRequest<'a> {
    /// Shapes a request from messages, per-attempt options, and adapter
    /// defaults.
    pub(crate) fn new(
        config: &'a ProviderConfig,
        messages: &'a [ChatMessage],
        options: &'a ProviderOptions,
        stream: bool,
    ) -> Self {
        Self {
            model: options.model().unwrap_or(&config.default_model),
            messages: messages
                .iter()
                .map(|message| WireMessage {
                    role: message.role().as_str(),
                    content: message.content(),
                })
                .collect(),
            temperature: options.temperature().map(|value| value.provider_scale()),
            max_completion_tokens: options.effective_max_tokens(),
            top_p: 1,
            reasoning_effort: options
                .reasoning_effort()
                .unwrap_or(config.reasoning_effort)
                .as_str(),
            stream,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamChunk {
    #[serde(default)]
    choices: Vec<StreamChoice>,
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct StreamChoice {
    delta: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Extracts the first choice's text from a single-shot response body.
///
/// A response without content yields an empty string; deciding whether
/// that is acceptable is left to the caller.
pub(crate) fn parse_completion_body(body: &str) -> ProviderResult<String> {
    let response: CompletionResponse = serde_json::from_str(body)
        .map_err(|err| ProviderError::MalformedResponse(err.to_string()))?;
    Ok(response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .unwrap_or_default())
}

/// Extracts the text delta carried by one streamed event payload.
///
/// Returns `Ok(None)` for chunks without text (role announcements, usage
/// trailers).
pub(crate) fn parse_stream_payload(payload: &str) -> ProviderResult<Option<String>> {
    let chunk: StreamChunk = serde_json::from_str(payload)
        .map_err(|err| ProviderError::MalformedResponse(err.to_string()))?;
    if let Some(error) = chunk.error {
        return Err(ProviderError::upstream(error.message));
    }
    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta)
        .and_then(|delta| delta.content)
        .filter(|content| !content.is_empty()))
}

/// Extracts a human-readable message from an error response body.
pub(crate) fn parse_error_body(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error.message)
        .filter(|message| !message.trim().is_empty())
}
