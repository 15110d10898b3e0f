//! Deterministic completion provider driven by a queue of scripted replies.

use crate::provider::{
    domain::{ChatMessage, ProviderOptions},
    ports::{CompletionProvider, FragmentStream, ProviderError, ProviderResult},
};
use async_trait::async_trait;
use futures::{StreamExt, stream};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One queued reply, consumed by the next provider call.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    /// The complete generated text.
    Text(String),
    /// A failure raised before any output.
    Failure(ProviderError),
    /// A sequence of streamed steps.
    ///
    /// Single-shot calls concatenate the text steps and fail on the first
    /// failure step.
    Fragments(Vec<FragmentStep>),
}

impl ScriptedReply {
    /// Creates a text reply.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Creates a fragment reply from plain text pieces.
    pub fn fragments<I, S>(pieces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Fragments(
            pieces
                .into_iter()
                .map(|piece| FragmentStep::Text(piece.into()))
                .collect(),
        )
    }
}

/// One step of a scripted fragment stream.
#[derive(Debug, Clone)]
pub enum FragmentStep {
    /// Yields a text fragment.
    Text(String),
    /// Yields a failure.
    Failure(ProviderError),
    /// Waits before continuing, simulating a slow provider.
    Pause(Duration),
}

/// Which port operation a call used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// [`CompletionProvider::complete`].
    Complete,
    /// [`CompletionProvider::stream_complete`].
    Stream,
}

/// A call observed by the scripted provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Operation used.
    pub kind: CallKind,
    /// Messages sent.
    pub messages: Vec<ChatMessage>,
    /// Options sent.
    pub options: ProviderOptions,
}

#[derive(Debug, Default)]
struct ScriptState {
    replies: VecDeque<ScriptedReply>,
    calls: Vec<RecordedCall>,
}

/// Completion provider replaying queued replies in order.
///
/// Intended for tests and offline runs. Single-shot calls may be given an
/// artificial latency; the provider tracks how many single-shot calls were
/// in flight at once.
#[derive(Debug, Clone, Default)]
pub struct ScriptedCompletionProvider {
    state: Arc<Mutex<ScriptState>>,
    latency: Option<Duration>,
    open_delay: Option<Duration>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl ScriptedCompletionProvider {
    /// Creates a provider with an empty reply queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a delay applied to every single-shot call.
    #[must_use]
    pub const fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Sets a delay before every streamed call hands back its stream,
    /// simulating a provider that is slow to send response headers.
    #[must_use]
    pub const fn with_open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = Some(delay);
        self
    }

    /// Queues a reply.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Transport`] when lock acquisition fails.
    pub fn push_reply(&self, reply: ScriptedReply) -> ProviderResult<()> {
        self.lock()?.replies.push_back(reply);
        Ok(())
    }

    /// Returns every call observed so far.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Transport`] when lock acquisition fails.
    pub fn calls(&self) -> ProviderResult<Vec<RecordedCall>> {
        Ok(self.lock()?.calls.clone())
    }

    /// Returns the highest number of overlapping single-shot calls.
    #[must_use]
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn lock(&self) -> ProviderResult<std::sync::MutexGuard<'_, ScriptState>> {
        self.state
            .lock()
            .map_err(|err| ProviderError::transport(std::io::Error::other(err.to_string())))
    }

    fn take_reply(
        &self,
        kind: CallKind,
        messages: &[ChatMessage],
        options: &ProviderOptions,
    ) -> ProviderResult<ScriptedReply> {
        let mut state = self.lock()?;
        state.calls.push(RecordedCall {
            kind,
            messages: messages.to_vec(),
            options: options.clone(),
        });
        state
            .replies
            .pop_front()
            .ok_or_else(|| ProviderError::Configuration("no scripted reply queued".to_owned()))
    }
}

/// Decrements the in-flight counter when a call finishes or is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize, peak: &AtomicUsize) -> Self {
        let current = counter.fetch_add(1, Ordering::SeqCst).saturating_add(1);
        peak.fetch_max(current, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl CompletionProvider for ScriptedCompletionProvider {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &ProviderOptions,
    ) -> ProviderResult<String> {
        let reply = self.take_reply(CallKind::Complete, messages, options)?;
        let _in_flight = InFlight::enter(&self.in_flight, &self.peak_in_flight);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match reply {
            ScriptedReply::Text(text) => Ok(text),
            ScriptedReply::Failure(err) => Err(err),
            ScriptedReply::Fragments(steps) => collect_steps(steps).await,
        }
    }

    async fn stream_complete(
        &self,
        messages: &[ChatMessage],
        options: &ProviderOptions,
    ) -> ProviderResult<FragmentStream> {
        let steps = match self.take_reply(CallKind::Stream, messages, options)? {
            ScriptedReply::Text(text) => vec![FragmentStep::Text(text)],
            ScriptedReply::Failure(err) => return Err(err),
            ScriptedReply::Fragments(steps) => steps,
        };
        if let Some(delay) = self.open_delay {
            tokio::time::sleep(delay).await;
        }
        Ok(stream::iter(steps)
            .then(|step| async move {
                match step {
                    FragmentStep::Text(text) => Some(Ok(text)),
                    FragmentStep::Failure(err) => Some(Err(err)),
                    FragmentStep::Pause(duration) => {
                        tokio::time::sleep(duration).await;
                        None
                    }
                }
            })
            .filter_map(|item| async move { item })
            .boxed())
    }
}

async fn collect_steps(steps: Vec<FragmentStep>) -> ProviderResult<String> {
    let mut text = String::new();
    for step in steps {
        match step {
            FragmentStep::Text(fragment) => text.push_str(&fragment),
            FragmentStep::Failure(err) => return Err(err),
            FragmentStep::Pause(duration) => tokio::time::sleep(duration).await,
        }
    }
    Ok(text)
}
