//! Uniform failure shape for every backend call.
//!
//! DESIGN
//! ======
//! Callers only ever need two facts about a failure: the HTTP status (or `0`
//! when no usable response arrived) and a human-readable message. The variants
//! keep the origin visible for logging while [`ApiError::status`] collapses
//! them into that shape.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

/// Errors produced by [`crate::net::api::ReefApi`] operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never reached the server, or no response came back.
    #[error("Network error: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("API Error: {status} - {body}")]
    Http { status: u16, body: String },

    /// A success body arrived but did not match the expected schema.
    #[error("Network error: invalid response body: {0}")]
    Decode(String),

    /// The chat stream failed to open, returned non-success, or broke off.
    #[error("Stream request failed: {message}")]
    Stream { status: u16, message: String },
}

impl ApiError {
    /// Status code for this failure: the HTTP status when the server
    /// answered, otherwise `0`.
    #[must_use]
    pub fn status(&self) -> u16 {
        match self {
            Self::Http { status, .. } | Self::Stream { status, .. } => *status,
            Self::Transport(_) | Self::Decode(_) => 0,
        }
    }

    /// True when no HTTP response was received.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        self.status() == 0
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
