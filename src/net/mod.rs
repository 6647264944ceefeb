//! Networking modules for the ReefWatch backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` holds the `ReefApi` trait and its reqwest implementation, `stream`
//! parses the incremental chat token stream, `error` defines the uniform
//! failure shape, and `types` mirrors the backend's JSON schemas.

pub mod api;
pub mod error;
pub mod stream;
pub mod types;

#[cfg(test)]
#[path = "mock_test.rs"]
pub(crate) mod mock;
