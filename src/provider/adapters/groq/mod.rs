//! Groq adapter speaking the OpenAI-compatible chat-completions API.
//!
//! Single-shot requests decode one JSON body; streamed requests decode a
//! server-sent event stream of `chat.completion.chunk` payloads terminated by
//! `data: [DONE]`.

mod client;
mod sse;
mod wire;

pub use client::GroqClient;

#[cfg(test)]
pub(crate) use client::decode_fragments;
#[cfg(test)]
pub(crate) use sse::{SseDecoder, SseEvent};
#[cfg(test)]
pub(crate) use wire::{CompletionRequest, parse_completion_body, parse_stream_payload};
