//! Client configuration parsed from environment variables.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_CONDITIONS_REFRESH_SECS: u64 = 5 * 60;
pub const DEFAULT_ALERTS_REFRESH_SECS: u64 = 10 * 60;
pub const DEFAULT_HISTORY_DAYS: u32 = 30;
pub const DEFAULT_FORECAST_DAYS: u32 = 7;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Errors produced while building a [`ClientConfig`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The API origin is not an http(s) URL.
    #[error("invalid {var}: {value} (expected http:// or https:// origin)")]
    InvalidUrl { var: &'static str, value: String },

    /// A polling period was configured as zero.
    #[error("{var} must be greater than zero")]
    ZeroInterval { var: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend origin without trailing slash; `/api` is appended per request.
    pub api_url: String,
    pub conditions_refresh: Duration,
    pub alerts_refresh: Duration,
    pub history_days: u32,
    pub forecast_days: u32,
    pub connect_timeout: Duration,
    /// Directory for the persisted preference record. `None` disables persistence.
    pub storage_dir: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_owned(),
            conditions_refresh: Duration::from_secs(DEFAULT_CONDITIONS_REFRESH_SECS),
            alerts_refresh: Duration::from_secs(DEFAULT_ALERTS_REFRESH_SECS),
            history_days: DEFAULT_HISTORY_DAYS,
            forecast_days: DEFAULT_FORECAST_DAYS,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            storage_dir: None,
        }
    }
}

impl ClientConfig {
    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `REEFWATCH_API_URL`: default `http://localhost:8000`
    /// - `REEFWATCH_CONDITIONS_REFRESH_SECS`: default 300
    /// - `REEFWATCH_ALERTS_REFRESH_SECS`: default 600
    /// - `REEFWATCH_HISTORY_DAYS`: default 30
    /// - `REEFWATCH_FORECAST_DAYS`: default 7
    /// - `REEFWATCH_CONNECT_TIMEOUT_SECS`: default 10
    /// - `REEFWATCH_STORAGE_DIR`: unset disables preference persistence
    ///
    /// # Errors
    ///
    /// Returns an error for a non-http(s) API URL or a zero polling period.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup. `from_env` delegates here.
    ///
    /// # Errors
    ///
    /// See [`ClientConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = parse_api_url(lookup("REEFWATCH_API_URL"))?;
        let conditions_refresh = parse_period(
            &lookup,
            "REEFWATCH_CONDITIONS_REFRESH_SECS",
            DEFAULT_CONDITIONS_REFRESH_SECS,
        )?;
        let alerts_refresh =
            parse_period(&lookup, "REEFWATCH_ALERTS_REFRESH_SECS", DEFAULT_ALERTS_REFRESH_SECS)?;
        let storage_dir = lookup("REEFWATCH_STORAGE_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            api_url,
            conditions_refresh,
            alerts_refresh,
            history_days: parse_or(&lookup, "REEFWATCH_HISTORY_DAYS", DEFAULT_HISTORY_DAYS),
            forecast_days: parse_or(&lookup, "REEFWATCH_FORECAST_DAYS", DEFAULT_FORECAST_DAYS),
            connect_timeout: Duration::from_secs(parse_or(
                &lookup,
                "REEFWATCH_CONNECT_TIMEOUT_SECS",
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )),
            storage_dir,
        })
    }

    /// Replace the API origin, applying the same normalization as the env path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] for a non-http(s) origin.
    pub fn with_api_url(mut self, api_url: &str) -> Result<Self, ConfigError> {
        self.api_url = parse_api_url(Some(api_url.to_owned()))?;
        Ok(self)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    lookup(key)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_period(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: u64,
) -> Result<Duration, ConfigError> {
    let secs = parse_or(lookup, var, default);
    if secs == 0 {
        return Err(ConfigError::ZeroInterval { var });
    }
    Ok(Duration::from_secs(secs))
}

fn parse_api_url(raw: Option<String>) -> Result<String, ConfigError> {
    let raw = raw.unwrap_or_else(|| DEFAULT_API_URL.to_owned());
    let url = raw.trim().trim_end_matches('/').to_owned();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::InvalidUrl { var: "REEFWATCH_API_URL", value: raw });
    }
    Ok(url)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
