//! ReefWatch client: state synchronization for the reef-conditions dashboard.
//!
//! SYSTEM CONTEXT
//! ==============
//! `net` talks to the ReefWatch backend, `state` holds the single shared
//! `AppState` aggregate, `sync` runs the polling and selection-driven
//! coordinators, and `chat` drives the assistant exchange. A view layer (the
//! console in `cli/`, or any UI) reads the store and calls its actions.

pub mod chat;
pub mod config;
pub mod net;
pub mod state;
pub mod sync;
pub mod util;

pub use chat::{ChatClient, ChatOutcome};
pub use config::{ClientConfig, ConfigError};
pub use net::api::{ApiClient, ReefApi};
pub use net::error::ApiError;
pub use state::{AppState, Store};
pub use sync::{AlertsCoordinator, ConditionsCoordinator, CoordinatorHandle, SiteDetailCoordinator};
