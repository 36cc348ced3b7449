//! HTTP client for the storefront REST API.
//!
//! Wraps a `reqwest::Client` with the API base URL and the injected
//! [`Session`], and maps response statuses onto [`FetchError`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, RETRY_AFTER};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};
use url::Url;

use crate::config::{AppConfig, ConfigError};
use crate::error::FetchError;
use crate::session::Session;
use crate::telemetry;

const REQUEST_ID_HEADER: &str = "X-Request-Id";
const CORRELATION_ID_HEADER: &str = "X-Correlation-Id";
const HAL_JSON: &str = "application/hal+json, application/json";

/// Errors building an [`ApiClient`] from configuration.
#[derive(Debug, Error)]
pub enum ClientInitError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Authorized JSON client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<Session>,
}

impl ApiClient {
    /// Build a client from configuration.
    pub fn new(config: &AppConfig, session: Arc<Session>) -> Result<Self, ClientInitError> {
        let base_url = config.base_url()?;
        let client = Self::with_options(
            base_url,
            session,
            config.request_timeout(),
            &config.user_agent,
        )?;
        Ok(client)
    }

    pub fn with_options(
        base_url: Url,
        session: Arc<Session>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            http,
            base_url,
            session,
        })
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `path` (e.g. `customers/7/orders`) below the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidRequest {
                details: format!("base url {} cannot carry a path", self.base_url),
            })?
            .pop_if_empty()
            .extend(path.split('/').filter(|segment| !segment.is_empty()));
        Ok(url)
    }

    /// GET `path` with `query` and return the JSON body.
    pub async fn get_json(&self, path: &str, query: &[(String, String)]) -> Result<Value, FetchError> {
        let mut url = self.endpoint(path)?;
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }

        // Each request gets its own ID; the trace ID ties a whole run together.
        let request_id = uuid::Uuid::new_v4().to_string();
        let trace_id = telemetry::current_trace_id();
        let mut request = self
            .http
            .get(url.clone())
            .header(ACCEPT, HAL_JSON)
            .header(REQUEST_ID_HEADER, &request_id);
        if let Some(trace_id) = &trace_id {
            request = request.header(CORRELATION_ID_HEADER, trace_id);
        }
        if let Some(authorization) = self.session.authorization_header() {
            request = request.header(AUTHORIZATION, authorization.as_str());
        }

        debug!(%url, request_id = %request_id, trace_id = ?trace_id, "GET");
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            return serde_json::from_str(&body).map_err(|err| FetchError::Decode {
                details: err.to_string(),
            });
        }

        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                error!(%url, status = status.as_u16(), "API rejected session token");
                Err(FetchError::Unauthorized {
                    details: format!("{} for {}", status, url.path()),
                })
            }
            StatusCode::TOO_MANY_REQUESTS => {
                let retry_after_secs = response
                    .headers()
                    .get(RETRY_AFTER)
                    .and_then(|h| h.to_str().ok())
                    .and_then(|s| s.trim().parse::<u64>().ok());
                warn!(%url, ?retry_after_secs, "Rate limited by API");
                Err(FetchError::RateLimited { retry_after_secs })
            }
            _ => {
                let body = response.text().await.unwrap_or_default();
                warn!(%url, status = status.as_u16(), "API request failed");
                Err(FetchError::http(status.as_u16(), Some(body)))
            }
        }
    }
}
