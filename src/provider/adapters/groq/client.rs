//! HTTP client for the Groq chat-completions API.

use super::{
    sse::{SseDecoder, SseEvent},
    wire::{CompletionRequest, parse_completion_body, parse_error_body, parse_stream_payload},
};
use crate::provider::{
    config::ProviderConfig,
    domain::{ChatMessage, ProviderOptions},
    ports::{CompletionProvider, FragmentStream, ProviderError, ProviderResult},
};
use async_trait::async_trait;
use futures::{
    Stream, StreamExt,
    stream::{self, BoxStream},
};
use reqwest::{Client, Response};
use std::collections::VecDeque;
use std::time::Duration;
use tracing::debug;

/// Completion provider backed by the Groq HTTP API.
///
/// Construct once at startup and share behind an `Arc`; the inner HTTP
/// client pools connections and is never reconfigured per call.
#[derive(Debug, Clone)]
pub struct GroqClient {
    config: ProviderConfig,
    http: Client,
}

impl GroqClient {
    /// Creates a client from validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] when the API key is blank or
    /// the HTTP client cannot be built.
    pub fn new(config: ProviderConfig) -> ProviderResult<Self> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderError::Configuration(
                "API key must not be empty".to_owned(),
            ));
        }
        let http = Client::builder()
            .connect_timeout(config.timeout)
            .build()
            .map_err(|err| ProviderError::Configuration(err.to_string()))?;
        Ok(Self { config, http })
    }

    /// Creates a client from `GROQ_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Configuration`] when required variables are
    /// missing or invalid.
    pub fn from_env() -> ProviderResult<Self> {
        Self::new(ProviderConfig::from_env()?)
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn send(
        &self,
        body: &CompletionRequest<'_>,
        timeout: Option<Duration>,
    ) -> ProviderResult<Response> {
        debug!(
            model = body.model,
            stream = body.stream,
            max_completion_tokens = body.max_completion_tokens,
            temperature = ?body.temperature,
            "sending completion request"
        );
        let mut request = self
            .http
            .post(self.config.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(body);
        if let Some(limit) = timeout {
            request = request.timeout(limit);
        }
        let response = request
            .send()
            .await
            .map_err(|err| map_request_error(err, self.config.timeout))?;
        ensure_success(response).await
    }
}

#[async_trait]
impl CompletionProvider for GroqClient {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &ProviderOptions,
    ) -> ProviderResult<String> {
        let body = CompletionRequest::new(&self.config, messages, options, false);
        let response = self.send(&body, Some(self.config.timeout)).await?;
        let text = response
            .text()
            .await
            .map_err(|err| map_request_error(err, self.config.timeout))?;
        parse_completion_body(&text)
    }

    async fn stream_complete(
        &self,
        messages: &[ChatMessage],
        options: &ProviderOptions,
    ) -> ProviderResult<FragmentStream> {
        let body = CompletionRequest::new(&self.config, messages, options, true);
        let response = self.send(&body, None).await?;
        let bytes = response
            .bytes_stream()
            .map(|chunk| chunk.map(|data| data.to_vec()).map_err(ProviderError::transport));
        Ok(decode_fragments(bytes))
    }
}

fn map_request_error(err: reqwest::Error, timeout: Duration) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout(timeout)
    } else {
        ProviderError::transport(err)
    }
}

async fn ensure_success(response: Response) -> ProviderResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = parse_error_body(&body).unwrap_or_else(|| {
        let detail = body.trim();
        if detail.is_empty() {
            format!("provider returned HTTP {status}")
        } else {
            format!("provider returned HTTP {status}: {detail}")
        }
    });
    Err(ProviderError::Upstream {
        status: Some(status.as_u16()),
        message,
    })
}

struct FragmentState {
    bytes: BoxStream<'static, ProviderResult<Vec<u8>>>,
    decoder: SseDecoder,
    pending: VecDeque<String>,
    deferred_error: Option<ProviderError>,
    finished: bool,
}

impl FragmentState {
    fn absorb(&mut self, events: ProviderResult<Vec<SseEvent>>) {
        let decoded = match events {
            Ok(decoded) => decoded,
            Err(err) => {
                self.deferred_error = Some(err);
                return;
            }
        };
        for event in decoded {
            match event {
                SseEvent::Done => {
                    self.finished = true;
                    return;
                }
                SseEvent::Data(payload) => match parse_stream_payload(&payload) {
                    Ok(Some(fragment)) => self.pending.push_back(fragment),
                    Ok(None) => {}
                    Err(err) => {
                        self.deferred_error = Some(err);
                        return;
                    }
                },
            }
        }
    }
}

/// Turns a raw event-stream body into completion text fragments.
///
/// Fragments decoded before a failure are yielded first; the failure is then
/// yielded once and the stream ends.
pub(crate) fn decode_fragments<S>(bytes: S) -> FragmentStream
where
    S: Stream<Item = ProviderResult<Vec<u8>>> + Send + 'static,
{
    let state = FragmentState {
        bytes: bytes.boxed(),
        decoder: SseDecoder::new(),
        pending: VecDeque::new(),
        deferred_error: None,
        finished: false,
    };
    stream::unfold(state, next_fragment).boxed()
}

async fn next_fragment(
    mut state: FragmentState,
) -> Option<(ProviderResult<String>, FragmentState)> {
    loop {
        if let Some(fragment) = state.pending.pop_front() {
            return Some((Ok(fragment), state));
        }
        if let Some(err) = state.deferred_error.take() {
            state.finished = true;
            return Some((Err(err), state));
        }
        if state.finished {
            return None;
        }
        let events = match state.bytes.next().await {
            Some(Ok(chunk)) => state.decoder.feed(&chunk),
            Some(Err(err)) => Err(err),
            None => {
                state.finished = true;
                state.decoder.finish()
            }
        };
        state.absorb(events);
    }
}
