//! Assistant chat exchange.
//!
//! DESIGN
//! ======
//! Each exchange walks `idle -> sending -> streaming -> idle`, or ends in
//! the failure branch. The store holds both phases: the user message is
//! appended and the loading flag raised before the request leaves, stream
//! chunks accumulate in the partial buffer, and completion or failure
//! resolves the turn in one action.
//!
//! ERROR HANDLING
//! ==============
//! Nothing escapes [`ChatClient`]. Any failure becomes the fixed fallback
//! assistant message, and clearing a session on the backend is best-effort.

pub mod suggestions;


use std::sync::Arc;

use tracing::{debug, warn};

use crate::net::api::ReefApi;
use crate::net::error::ApiError;
use crate::net::stream::ChatStreamHandler;
use crate::net::types::ChatRequest;
use crate::state::Store;
use crate::state::chat::ChatTurn;
pub use suggestions::suggested_prompts;

/// How an exchange ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatOutcome {
    /// An assistant reply was appended.
    Replied,
    /// The fallback error reply was appended.
    Failed,
    /// Blank input or a turn already in flight; nothing changed.
    Ignored,
}

#[derive(Clone)]
pub struct ChatClient {
    api: Arc<dyn ReefApi>,
    store: Store,
    include_context: bool,
}

impl ChatClient {
    /// Client that asks the backend to include current reef conditions.
    #[must_use]
    pub fn new(api: Arc<dyn ReefApi>, store: Store) -> Self {
        Self { api, store, include_context: true }
    }

    #[must_use]
    pub fn with_context(mut self, include_context: bool) -> Self {
        self.include_context = include_context;
        self
    }

    fn request(&self, turn: ChatTurn) -> ChatRequest {
        ChatRequest { message: turn.message, session_id: turn.session_id, include_context: self.include_context }
    }

    /// Send `content` over the streaming endpoint.
    pub async fn send_streaming(&self, content: &str) -> ChatOutcome {
        self.send_streaming_observed(content, |_| {}).await
    }

    /// As [`ChatClient::send_streaming`], also handing each chunk to
    /// `on_chunk` after it lands in the store.
    pub async fn send_streaming_observed(&self, content: &str, on_chunk: impl FnMut(&str) + Send) -> ChatOutcome {
        let Some(turn) = self.store.begin_chat_turn(content) else {
            return ChatOutcome::Ignored;
        };
        debug!(resumed = turn.session_id.is_some(), "streaming chat turn");
        let request = self.request(turn);

        let mut handler = StoreHandler { store: &self.store, on_chunk, outcome: None };
        self.api.stream_chat(&request, &mut handler).await;
        match handler.outcome {
            Some(outcome) => outcome,
            None => {
                handler.on_error(ApiError::Stream { status: 0, message: "stream returned without a result".into() });
                ChatOutcome::Failed
            }
        }
    }

    /// Send `content` over the plain request/response endpoint.
    pub async fn send(&self, content: &str) -> ChatOutcome {
        let Some(turn) = self.store.begin_chat_turn(content) else {
            return ChatOutcome::Ignored;
        };
        debug!(resumed = turn.session_id.is_some(), "sending chat turn");
        match self.api.send_chat(&self.request(turn)).await {
            Ok(reply) => {
                self.store.complete_chat_turn(reply.response, reply.session_id);
                ChatOutcome::Replied
            }
            Err(e) => {
                warn!(error = %e, "chat request failed");
                self.store.fail_chat_turn();
                ChatOutcome::Failed
            }
        }
    }

    /// Tell the backend to forget the session, then reset local chat.
    pub async fn clear(&self) {
        let session_id = self.store.read(|s| s.chat.session_id.clone());
        if let Some(session_id) = session_id {
            if let Err(e) = self.api.clear_chat_session(&session_id).await {
                debug!(error = %e, "ignoring chat session clear failure");
            }
        }
        self.store.clear_chat();
    }

    /// Prompts for the current store contents.
    #[must_use]
    pub fn suggestions(&self) -> Vec<&'static str> {
        self.store.read(|s| suggested_prompts(&s.data.sites, &s.data.alerts))
    }
}

/// Routes stream callbacks into store actions.
struct StoreHandler<'a, F> {
    store: &'a Store,
    on_chunk: F,
    outcome: Option<ChatOutcome>,
}

impl<F: FnMut(&str) + Send> ChatStreamHandler for StoreHandler<'_, F> {
    fn on_chunk(&mut self, text: &str) {
        self.store.append_stream_chunk(text);
        (self.on_chunk)(text);
    }

    fn on_complete(&mut self, session_id: Option<String>) {
        self.store.complete_streamed_turn(session_id);
        self.outcome = Some(ChatOutcome::Replied);
    }

    fn on_error(&mut self, error: ApiError) {
        warn!(error = %error, "chat stream failed");
        self.store.fail_chat_turn();
        self.outcome = Some(ChatOutcome::Failed);
    }
}
