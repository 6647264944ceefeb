//! Derived reads over [`AppState`](super::AppState). Pure, recomputed per call.

#[cfg(test)]
#[path = "selectors_test.rs"]
mod selectors_test;

use crate::net::types::{Alert, AlertType, SiteWithConditions};

/// Score at or above which a site counts as high risk.
pub const HIGH_RISK_SCORE: i8 = 2;

/// Sites whose risk score is at least [`HIGH_RISK_SCORE`], in list order.
#[must_use]
pub fn high_risk_sites(sites: &[SiteWithConditions]) -> Vec<&SiteWithConditions> {
    sites.iter().filter(|s| s.risk.score() >= HIGH_RISK_SCORE).collect()
}

#[must_use]
pub fn site_by_id<'a>(sites: &'a [SiteWithConditions], id: &str) -> Option<&'a SiteWithConditions> {
    sites.iter().find(|s| s.id() == id)
}

#[must_use]
pub fn active_alerts(alerts: &[Alert]) -> Vec<&Alert> {
    alerts.iter().filter(|a| a.is_active).collect()
}

/// Active alerts of type bleaching.
#[must_use]
pub fn bleaching_alerts(alerts: &[Alert]) -> Vec<&Alert> {
    alerts
        .iter()
        .filter(|a| a.is_active && a.alert_type == AlertType::Bleaching)
        .collect()
}
