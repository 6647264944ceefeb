//! Current-conditions coordinator.
//!
//! DESIGN
//! ======
//! Fetches `GET /current-conditions` into the store on activation (only when
//! no sites are loaded yet) and then on a fixed period. A manual refresh
//! calls the same [`ConditionsCoordinator::refresh`], so both triggers write
//! through the same actions.
//!
//! ERROR HANDLING
//! ==============
//! A failed fetch stores its message in `ui.error` and leaves the previously
//! loaded sites in place. The loading flag is raised for the duration of
//! every fetch and the error is cleared when one starts.

#[cfg(test)]
#[path = "conditions_test.rs"]
mod conditions_test;

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::poller::{CoordinatorHandle, spawn_poller};
use crate::config::ClientConfig;
use crate::net::api::ReefApi;
use crate::net::error::ApiError;
use crate::state::Store;

#[derive(Clone)]
pub struct ConditionsCoordinator {
    api: Arc<dyn ReefApi>,
    store: Store,
    period: Duration,
}

impl ConditionsCoordinator {
    #[must_use]
    pub fn new(api: Arc<dyn ReefApi>, store: Store, period: Duration) -> Self {
        Self { api, store, period }
    }

    #[must_use]
    pub fn from_config(api: Arc<dyn ReefApi>, store: Store, config: &ClientConfig) -> Self {
        Self::new(api, store, config.conditions_refresh)
    }

    /// Fetch once and write the result into the store.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after recording it in `ui.error`.
    pub async fn refresh(&self) -> Result<(), ApiError> {
        self.store.begin_loading();
        debug!("fetching current conditions");
        let result = self.api.current_conditions().await;
        let outcome = match result {
            Ok(response) => {
                debug!(sites = response.sites.len(), data_date = %response.data_date, "conditions loaded");
                self.store.apply_conditions(response);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "conditions fetch failed");
                self.store.set_error(Some(e.to_string()));
                Err(e)
            }
        };
        self.store.set_loading(false);
        outcome
    }

    /// Start polling. Fetches immediately as well if no sites are loaded.
    #[must_use]
    pub fn activate(&self) -> CoordinatorHandle {
        let initial = self.store.read(|s| s.data.sites.is_empty());
        info!(period_secs = self.period.as_secs(), initial_fetch = initial, "conditions coordinator active");
        let this = self.clone();
        spawn_poller("conditions", self.period, initial, move || {
            let this = this.clone();
            async move {
                if let Err(e) = this.refresh().await {
                    debug!(error = %e, "conditions poll tick failed");
                }
            }
        })
    }
}
