//! Incremental decoder for `text/event-stream` bodies.

use crate::provider::ports::{ProviderError, ProviderResult};

const DONE_SENTINEL: &str = "[DONE]";

/// A dispatched server-sent event relevant to completions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SseEvent {
    /// The `data` payload of one event.
    Data(String),
    /// The `[DONE]` terminator.
    Done,
}

/// Buffers raw body bytes and yields complete events.
///
/// Bytes are split on line feeds before UTF-8 decoding, so multi-byte
/// characters straddling network chunks are reassembled intact.
#[derive(Debug, Default)]
pub(crate) struct SseDecoder {
    buffer: Vec<u8>,
    data_lines: Vec<String>,
}

impl SseDecoder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Appends a chunk and returns every event completed by it.
    pub(crate) fn feed(&mut self, chunk: &[u8]) -> ProviderResult<Vec<SseEvent>> {
        self.buffer.extend_from_slice(chunk);
        let mut events = Vec::new();
        while let Some(position) = self.buffer.iter().position(|byte| *byte == b'\n') {
            let raw_line: Vec<u8> = self.buffer.drain(..=position).collect();
            let line = decode_line(&raw_line)?;
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }
        Ok(events)
    }

    /// Flushes any trailing line and pending event at end of body.
    pub(crate) fn finish(&mut self) -> ProviderResult<Vec<SseEvent>> {
        let mut events = Vec::new();
        if !self.buffer.is_empty() {
            let raw_line = std::mem::take(&mut self.buffer);
            let line = decode_line(&raw_line)?;
            if let Some(event) = self.process_line(&line) {
                events.push(event);
            }
        }
        if let Some(event) = self.dispatch() {
            events.push(event);
        }
        Ok(events)
    }

    fn process_line(&mut self, line: &str) -> Option<SseEvent> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }
        if let Some(value) = line.strip_prefix("data:") {
            let payload = value.strip_prefix(' ').unwrap_or(value);
            self.data_lines.push(payload.to_owned());
        }
        None
    }

    fn dispatch(&mut self) -> Option<SseEvent> {
        if self.data_lines.is_empty() {
            return None;
        }
        let payload = self.data_lines.join("\n");
        self.data_lines.clear();
        if payload.trim() == DONE_SENTINEL {
            Some(SseEvent::Done)
        } else {
            Some(SseEvent::Data(payload))
        }
    }
}

fn decode_line(raw_line: &[u8]) -> ProviderResult<String> {
    let without_lf = raw_line.strip_suffix(b"\n").unwrap_or(raw_line);
    let without_cr = without_lf.strip_suffix(b"\r").unwrap_or(without_lf);
    String::from_utf8(without_cr.to_vec()).map_err(|err| {
        ProviderError::MalformedResponse(format!("event stream is not UTF-8: {err}"))
    })
}
