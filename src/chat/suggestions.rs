//! Canned prompts offered in the chat pane.

#[cfg(test)]
#[path = "suggestions_test.rs"]
mod suggestions_test;

use crate::net::types::{Alert, SiteWithConditions};
use crate::state::selectors::{active_alerts, high_risk_sites};

pub const MAX_SUGGESTIONS: usize = 5;

const GENERAL: [&str; 3] = [
    "What's the current water temperature around Oahu?",
    "What does DHW mean and why is it important?",
    "Which snorkel spots are best for beginners?",
];

const HIGH_RISK: [&str; 2] = [
    "Why are some sites showing high risk right now?",
    "Is it safe to snorkel at sites with high risk?",
];

const ALERTS: &str = "Tell me more about the current alerts.";

/// Up to [`MAX_SUGGESTIONS`] prompts. Risk and alert prompts lead when any
/// site is high risk or any alert is active; general prompts fill the rest.
#[must_use]
pub fn suggested_prompts(sites: &[SiteWithConditions], alerts: &[Alert]) -> Vec<&'static str> {
    let mut prompts = Vec::with_capacity(MAX_SUGGESTIONS);
    if !high_risk_sites(sites).is_empty() {
        prompts.extend(HIGH_RISK);
    }
    if !active_alerts(alerts).is_empty() {
        prompts.push(ALERTS);
    }
    prompts.extend(GENERAL);
    prompts.truncate(MAX_SUGGESTIONS);
    prompts
}
