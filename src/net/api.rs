//! Typed REST client for the ReefWatch backend.
//!
//! DESIGN
//! ======
//! [`ReefApi`] is the seam coordinators and the chat client depend on; the
//! production implementation is [`ApiClient`] over `reqwest`, tests swap in a
//! mock. Every operation maps to exactly one request: no caching, no retries.
//!
//! ERROR HANDLING
//! ==============
//! All failures collapse into [`ApiError`]. A non-success response has its
//! body read as text and folded into the error; a request that never gets a
//! response reports status `0`. The streaming call never returns an error,
//! it reports through [`ChatStreamHandler::on_error`] instead, and the
//! connectivity probe reports plain `false`.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, RequestBuilder};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::error::ApiError;
use super::stream::{ChatStreamHandler, StreamParser, deliver};
use super::types::{
    AlertsResponse, ChatRequest, ChatResponse, CurrentConditionsResponse, ForecastResponse, HealthResponse,
    RefreshResponse, Site, SiteForecastResponse, SiteHistoryResponse, SiteListResponse,
};
use crate::config::{ClientConfig, DEFAULT_FORECAST_DAYS, DEFAULT_HISTORY_DAYS};

const API_PREFIX: &str = "/api";

// =============================================================================
// PATHS
// =============================================================================

fn site_path(site_id: &str) -> String {
    format!("/sites/{site_id}")
}

fn site_history_path(site_id: &str, days: Option<u32>) -> String {
    format!("/sites/{site_id}/history?days={}", days.unwrap_or(DEFAULT_HISTORY_DAYS))
}

fn forecasts_path(days: Option<u32>) -> String {
    format!("/forecast?days={}", days.unwrap_or(DEFAULT_FORECAST_DAYS))
}

fn site_forecast_path(site_id: &str, days: Option<u32>) -> String {
    format!("/forecast/{site_id}?days={}", days.unwrap_or(DEFAULT_FORECAST_DAYS))
}

fn chat_session_path(session_id: &str) -> String {
    format!("/chat/{session_id}")
}

// =============================================================================
// TRAIT
// =============================================================================

/// One async operation per backend capability.
#[async_trait::async_trait]
pub trait ReefApi: Send + Sync {
    /// `GET /sites`
    async fn list_sites(&self) -> Result<SiteListResponse, ApiError>;

    /// `GET /sites/{id}`
    async fn get_site(&self, site_id: &str) -> Result<Site, ApiError>;

    /// `GET /sites/{id}/history?days=N`, N defaulting to 30.
    async fn site_history(&self, site_id: &str, days: Option<u32>) -> Result<SiteHistoryResponse, ApiError>;

    /// `GET /current-conditions`
    async fn current_conditions(&self) -> Result<CurrentConditionsResponse, ApiError>;

    /// `GET /alerts`
    async fn alerts(&self) -> Result<AlertsResponse, ApiError>;

    /// `GET /forecast?days=N`, N defaulting to 7.
    async fn forecasts(&self, days: Option<u32>) -> Result<ForecastResponse, ApiError>;

    /// `GET /forecast/{id}?days=N`, N defaulting to 7.
    async fn site_forecast(&self, site_id: &str, days: Option<u32>) -> Result<SiteForecastResponse, ApiError>;

    /// `POST /chat`
    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError>;

    /// `POST /chat/stream`, reporting progress through `handler`.
    ///
    /// Returns once the handler has seen `on_complete` or `on_error`.
    async fn stream_chat(&self, request: &ChatRequest, handler: &mut dyn ChatStreamHandler);

    /// `DELETE /chat/{session_id}`
    async fn clear_chat_session(&self, session_id: &str) -> Result<(), ApiError>;

    /// `GET /health`
    async fn health(&self) -> Result<HealthResponse, ApiError>;

    /// `POST /admin/refresh`
    async fn refresh_data(&self) -> Result<RefreshResponse, ApiError>;

    /// `GET /` outside the `/api` prefix. Never fails; any problem is `false`.
    async fn check_connection(&self) -> bool;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Build a client for `base_url` (origin only; `/api` is appended per call).
    ///
    /// Only the connect phase is bounded: chat streams run until the server
    /// closes them.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP client cannot be constructed.
    pub fn new(base_url: &str, connect_timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("HTTP client build failed: {e}")))?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_owned() })
    }

    /// # Errors
    ///
    /// See [`ApiClient::new`].
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(&config.api_url, config.connect_timeout)
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{API_PREFIX}{path}", self.base_url)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.api_url(path))
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.request(Method::GET, path)).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&(impl Serialize + Sync)>,
    ) -> Result<T, ApiError> {
        let mut builder = self.request(method, path);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.execute(builder).await
    }

    async fn execute<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        self.execute_raw(builder)
            .await?
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn execute_raw(&self, builder: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            debug!(status = status.as_u16(), "backend returned error status");
            return Err(ApiError::Http { status: status.as_u16(), body });
        }
        Ok(response)
    }
}

#[async_trait::async_trait]
impl ReefApi for ApiClient {
    async fn list_sites(&self) -> Result<SiteListResponse, ApiError> {
        self.get_json("/sites").await
    }

    async fn get_site(&self, site_id: &str) -> Result<Site, ApiError> {
        self.get_json(&site_path(site_id)).await
    }

    async fn site_history(&self, site_id: &str, days: Option<u32>) -> Result<SiteHistoryResponse, ApiError> {
        self.get_json(&site_history_path(site_id, days)).await
    }

    async fn current_conditions(&self) -> Result<CurrentConditionsResponse, ApiError> {
        self.get_json("/current-conditions").await
    }

    async fn alerts(&self) -> Result<AlertsResponse, ApiError> {
        self.get_json("/alerts").await
    }

    async fn forecasts(&self, days: Option<u32>) -> Result<ForecastResponse, ApiError> {
        self.get_json(&forecasts_path(days)).await
    }

    async fn site_forecast(&self, site_id: &str, days: Option<u32>) -> Result<SiteForecastResponse, ApiError> {
        self.get_json(&site_forecast_path(site_id, days)).await
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse, ApiError> {
        self.send_json(Method::POST, "/chat", Some(request)).await
    }

    async fn stream_chat(&self, request: &ChatRequest, handler: &mut dyn ChatStreamHandler) {
        let sent = self
            .request(Method::POST, "/chat/stream")
            .json(request)
            .send()
            .await;
        let mut response = match sent {
            Ok(response) => response,
            Err(e) => {
                handler.on_error(ApiError::Stream { status: 0, message: e.to_string() });
                return;
            }
        };
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            handler.on_error(ApiError::Stream { status: status.as_u16(), message: body });
            return;
        }

        let mut parser = StreamParser::new();
        loop {
            let events = match response.chunk().await {
                Ok(Some(bytes)) => parser.push(&bytes),
                Ok(None) => parser.finish(),
                Err(e) => {
                    handler.on_error(ApiError::Stream { status: 0, message: e.to_string() });
                    return;
                }
            };
            for event in events {
                if deliver(event, handler).is_break() {
                    return;
                }
            }
            if parser.is_finished() {
                break;
            }
        }

        // Body closed without a completion fragment.
        handler.on_error(ApiError::Stream { status: 0, message: "stream ended before completion".to_owned() });
    }

    async fn clear_chat_session(&self, session_id: &str) -> Result<(), ApiError> {
        self.execute_raw(self.request(Method::DELETE, &chat_session_path(session_id)))
            .await?;
        Ok(())
    }

    async fn health(&self) -> Result<HealthResponse, ApiError> {
        self.get_json("/health").await
    }

    async fn refresh_data(&self) -> Result<RefreshResponse, ApiError> {
        self.send_json(Method::POST, "/admin/refresh", None::<&()>).await
    }

    async fn check_connection(&self) -> bool {
        match self.http.get(format!("{}/", self.base_url)).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!(error = %e, "connectivity probe failed");
                false
            }
        }
    }
}
