#[cfg(test)]
#[path = "data_test.rs"]
mod data_test;

use crate::net::types::{Alert, ForecastDataPoint, HistoricalDataPoint, SiteWithConditions};

/// The site the user is inspecting, extended in place as detail arrives.
///
/// `history` and `forecast` are `None` until their fetch lands.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectedSite {
    pub site: SiteWithConditions,
    pub history: Option<Vec<HistoricalDataPoint>>,
    pub forecast: Option<Vec<ForecastDataPoint>>,
}

impl SelectedSite {
    /// Fresh wrapper with no detail attached.
    #[must_use]
    pub fn new(site: SiteWithConditions) -> Self {
        Self { site, history: None, forecast: None }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        self.site.id()
    }

    /// True once both history and forecast are attached.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.history.is_some() && self.forecast.is_some()
    }
}

/// Backend data held by the dashboard. Replaced wholesale per refresh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DataState {
    pub sites: Vec<SiteWithConditions>,
    pub alerts: Vec<Alert>,
    pub selected: Option<SelectedSite>,
    /// As-of date of the satellite data, as reported by the backend.
    pub data_date: Option<String>,
    /// Backend `updated_at` of the last successful conditions fetch.
    pub last_updated: Option<String>,
}
