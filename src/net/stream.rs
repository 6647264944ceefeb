//! Incremental parser for the chat token stream.
//!
//! DESIGN
//! ======
//! The backend answers `POST /chat/stream` with a line-oriented text body.
//! Lines starting with [`EVENT_PREFIX`] carry one JSON fragment each:
//! `{"content": "..."}` for a token, `{"done": true, "session_id": "..."}`
//! for completion, `{"error": "..."}` for a server-side failure.
//!
//! The parser is a small state machine independent of any transport:
//! accumulate bytes, split on `\n`, decode the fragment, emit events. Bytes
//! are buffered until a full line arrives, so a fragment (or a multi-byte
//! character) split across network chunks decodes intact.
//!
//! ERROR HANDLING
//! ==============
//! A malformed fragment is dropped and counted; the exchange continues. Once
//! a completion or error fragment is seen the parser is finished and ignores
//! anything after it.

#[cfg(test)]
#[path = "stream_test.rs"]
mod stream_test;

use std::ops::ControlFlow;

use serde::Deserialize;
use tracing::debug;

use super::error::ApiError;

/// Marker that prefixes every data-bearing line.
pub const EVENT_PREFIX: &str = "data: ";

/// One decoded stream event, in receive order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StreamEvent {
    /// A content token to append to the partial reply.
    Chunk(String),
    /// The reply is complete; carries the server-issued session id if sent.
    Complete { session_id: Option<String> },
    /// The server reported a failure inside the stream.
    Failed(String),
}

/// Receiver for a streaming chat exchange.
///
/// Exactly one of `on_complete` / `on_error` ends an exchange; `on_chunk` is
/// only ever called before that.
pub trait ChatStreamHandler: Send {
    fn on_chunk(&mut self, text: &str);
    fn on_complete(&mut self, session_id: Option<String>);
    fn on_error(&mut self, error: ApiError);
}

#[derive(Deserialize)]
struct Fragment {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    session_id: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Default)]
pub struct StreamParser {
    buffer: Vec<u8>,
    finished: bool,
    discarded: usize,
}

impl StreamParser {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed raw body bytes; returns the events completed by this chunk.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<StreamEvent> {
        if self.finished {
            return Vec::new();
        }
        self.buffer.extend_from_slice(bytes);

        let mut events = Vec::new();
        while let Some(pos) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=pos).collect();
            if self.accept_line(&line[..pos], &mut events) {
                self.buffer.clear();
                break;
            }
        }
        events
    }

    /// Flush a trailing line that arrived without a final newline.
    pub fn finish(&mut self) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        if !self.finished && !self.buffer.is_empty() {
            let line = std::mem::take(&mut self.buffer);
            self.accept_line(&line, &mut events);
        }
        self.finished = true;
        events
    }

    /// True once a completion or error fragment has been seen.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Number of data lines dropped because they did not decode.
    #[must_use]
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Returns true when the line ended the stream.
    fn accept_line(&mut self, raw: &[u8], events: &mut Vec<StreamEvent>) -> bool {
        let line = String::from_utf8_lossy(raw);
        match parse_line(&line) {
            LineOutcome::Event(event) => {
                let terminal = !matches!(event, StreamEvent::Chunk(_));
                events.push(event);
                if terminal {
                    self.finished = true;
                }
                terminal
            }
            LineOutcome::Malformed => {
                self.discarded += 1;
                debug!(line = %line, "discarding malformed stream fragment");
                false
            }
            LineOutcome::Skip => false,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum LineOutcome {
    Event(StreamEvent),
    Malformed,
    Skip,
}

/// Decode one line. Non-data lines and empty tokens are skipped.
fn parse_line(line: &str) -> LineOutcome {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let Some(payload) = line.strip_prefix(EVENT_PREFIX) else {
        return LineOutcome::Skip;
    };
    let Ok(fragment) = serde_json::from_str::<Fragment>(payload) else {
        return LineOutcome::Malformed;
    };

    if fragment.done {
        return LineOutcome::Event(StreamEvent::Complete { session_id: fragment.session_id });
    }
    if let Some(message) = fragment.error {
        return LineOutcome::Event(StreamEvent::Failed(message));
    }
    match fragment.content {
        Some(content) if !content.is_empty() => LineOutcome::Event(StreamEvent::Chunk(content)),
        _ => LineOutcome::Skip,
    }
}

/// Hand one event to the handler. `Break` means the exchange is over.
pub fn deliver(event: StreamEvent, handler: &mut dyn ChatStreamHandler) -> ControlFlow<()> {
    match event {
        StreamEvent::Chunk(text) => {
            handler.on_chunk(&text);
            ControlFlow::Continue(())
        }
        StreamEvent::Complete { session_id } => {
            handler.on_complete(session_id);
            ControlFlow::Break(())
        }
        StreamEvent::Failed(message) => {
            handler.on_error(ApiError::Stream { status: 0, message });
            ControlFlow::Break(())
        }
    }
}
