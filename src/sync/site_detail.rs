//! Site-detail coordinator.
//!
//! DESIGN
//! ======
//! Follows the store's selection channel. Every selection, including
//! re-selecting the current site, spawns a load that fetches history and
//! forecast concurrently and attaches each as it lands. Deselection loads
//! nothing.
//!
//! Loads for successive selections may overlap. Each result is attached
//! only if the site it was requested for is still selected, so a slow
//! response for an earlier site can never land on a later one.
//!
//! ERROR HANDLING
//! ==============
//! A failed fetch records its message in `ui.error` (again only while its
//! site is still selected) and leaves the selection in place.

#[cfg(test)]
#[path = "site_detail_test.rs"]
mod site_detail_test;

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::poller::CoordinatorHandle;
use crate::config::{ClientConfig, DEFAULT_FORECAST_DAYS, DEFAULT_HISTORY_DAYS};
use crate::net::api::ReefApi;
use crate::net::error::ApiError;
use crate::state::Store;

#[derive(Clone)]
pub struct SiteDetailCoordinator {
    api: Arc<dyn ReefApi>,
    store: Store,
    history_days: u32,
    forecast_days: u32,
}

impl SiteDetailCoordinator {
    #[must_use]
    pub fn new(api: Arc<dyn ReefApi>, store: Store) -> Self {
        Self { api, store, history_days: DEFAULT_HISTORY_DAYS, forecast_days: DEFAULT_FORECAST_DAYS }
    }

    #[must_use]
    pub fn from_config(api: Arc<dyn ReefApi>, store: Store, config: &ClientConfig) -> Self {
        Self { api, store, history_days: config.history_days, forecast_days: config.forecast_days }
    }

    fn is_selected(&self, site_id: &str) -> bool {
        self.store.read(|s| s.data.selected.as_ref().is_some_and(|sel| sel.id() == site_id))
    }

    fn record_failure(&self, site_id: &str, what: &str, error: &ApiError) {
        warn!(site_id, error = %error, "{what} fetch failed");
        if self.is_selected(site_id) {
            self.store.set_error(Some(error.to_string()));
        }
    }

    /// Fetch history and forecast for `site_id` and attach them.
    ///
    /// # Errors
    ///
    /// Returns the first fetch error; the other fetch still completes.
    pub async fn load(&self, site_id: &str) -> Result<(), ApiError> {
        debug!(site_id, history_days = self.history_days, forecast_days = self.forecast_days, "loading site detail");

        let history = async {
            let response = self.api.site_history(site_id, Some(self.history_days)).await;
            match response {
                Ok(r) => {
                    if !self.store.attach_history(site_id, r.data) {
                        debug!(site_id, "discarding history for deselected site");
                    }
                    Ok(())
                }
                Err(e) => {
                    self.record_failure(site_id, "history", &e);
                    Err(e)
                }
            }
        };
        let forecast = async {
            let response = self.api.site_forecast(site_id, Some(self.forecast_days)).await;
            match response {
                Ok(r) => {
                    if !self.store.attach_forecast(site_id, r.forecast) {
                        debug!(site_id, "discarding forecast for deselected site");
                    }
                    Ok(())
                }
                Err(e) => {
                    self.record_failure(site_id, "forecast", &e);
                    Err(e)
                }
            }
        };

        let (history, forecast) = tokio::join!(history, forecast);
        history.and(forecast)
    }

    /// Follow selections until the handle is dropped. A site already
    /// selected at activation is loaded straight away.
    #[must_use]
    pub fn activate(&self) -> CoordinatorHandle {
        info!(history_days = self.history_days, forecast_days = self.forecast_days, "site detail coordinator active");
        let mut selection = self.store.subscribe_selection();
        let current = self.store.read(|s| s.data.selected.as_ref().map(|sel| sel.id().to_owned()));
        let this = self.clone();

        let task = tokio::spawn(async move {
            if let Some(site_id) = current {
                this.spawn_load(site_id);
            }
            while selection.changed().await.is_ok() {
                let selected = selection.borrow_and_update().clone();
                if let Some(site_id) = selected {
                    this.spawn_load(site_id);
                }
            }
        });
        CoordinatorHandle::new("site_detail", task)
    }

    fn spawn_load(&self, site_id: String) {
        let this = self.clone();
        tokio::spawn(async move {
            if let Err(e) = this.load(&site_id).await {
                debug!(site_id = %site_id, error = %e, "site detail load incomplete");
            }
        });
    }
}
