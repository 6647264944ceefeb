//! Alerts coordinator: fetch on activation, then every period.
//!
//! A failed fetch records its message in `ui.error` and keeps the last
//! known alerts. Alerts do not touch the loading flag.

#[cfg(test)]
#[path = "alerts_test.rs"]
mod alerts_test;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::poller::{CoordinatorHandle, spawn_poller};
use crate::config::ClientConfig;
use crate::net::api::ReefApi;
use crate::net::error::ApiError;
use crate::state::Store;

#[derive(Clone)]
pub struct AlertsCoordinator {
    api: Arc<dyn ReefApi>,
    store: Store,
    period: Duration,
}

impl AlertsCoordinator {
    #[must_use]
    pub fn new(api: Arc<dyn ReefApi>, store: Store, period: Duration) -> Self {
        Self { api, store, period }
    }

    #[must_use]
    pub fn from_config(api: Arc<dyn ReefApi>, store: Store, config: &ClientConfig) -> Self {
        Self::new(api, store, config.alerts_refresh)
    }

    /// # Errors
    ///
    /// Returns the fetch error after recording it in `ui.error`.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        debug!("fetching alerts");
        match self.api.alerts().await {
            Ok(response) => {
                debug!(count = response.alerts.len(), "alerts loaded");
                self.store.set_alerts(response.alerts);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "alerts fetch failed");
                self.store.set_error(Some(e.to_string()));
                Err(e)
            }
        }
    }

    #[must_use]
    pub fn activate(&self) -> CoordinatorHandle {
        info!(period_secs = self.period.as_secs(), "alerts coordinator active");
        let this = self.clone();
        spawn_poller("alerts", self.period, true, move || {
            let this = this.clone();
            async move {
                if let Err(e) = this.refresh().await {
                    debug!(error = %e, "alerts poll tick failed");
                }
            }
        })
    }
}
