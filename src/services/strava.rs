// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava API client for token management and activity retrieval.
//!
//! Handles:
//! - Authorization code exchange and token refresh
//! - Paginated activity listing and per-activity detail
//! - Ordered transport strategies (primary, then fallback)
//! - Rate limit detection

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::Credentials;
use crate::services::transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};
use crate::time_utils::YearRange;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Longest slice of an error body kept in error messages.
const ERROR_BODY_LIMIT: usize = 256;

/// Strava API client.
#[derive(Clone)]
pub struct StravaClient {
    transports: Vec<Arc<dyn Transport>>,
    base_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
}

impl StravaClient {
    /// Create a client using the primary transport with one fallback.
    pub fn new(config: &Config) -> Self {
        let transports: Vec<Arc<dyn Transport>> = vec![
            Arc::new(ReqwestTransport::primary()),
            Arc::new(ReqwestTransport::fallback()),
        ];
        Self::with_transports(config, transports)
    }

    /// Create a client with an explicit, ordered list of transport strategies.
    pub fn with_transports(config: &Config, transports: Vec<Arc<dyn Transport>>) -> Self {
        Self {
            transports,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token_url: config.token_url(),
            client_id: config.strava_client_id.clone(),
            client_secret: config.strava_client_secret.clone(),
        }
    }

    /// List one page of the athlete's activities inside `range`.
    ///
    /// Returns raw entries; type filtering is the caller's business.
    pub async fn list_activities(
        &self,
        access_token: &str,
        range: &YearRange,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<Value>> {
        let request = ApiRequest::get(format!("{}/athlete/activities", self.base_url))
            .bearer(access_token)
            .query("after", range.after)
            .query("before", range.before)
            .query("page", page)
            .query("per_page", per_page);

        self.execute(&request).await
    }

    /// Get a detailed activity by ID, including all efforts.
    pub async fn get_activity(&self, access_token: &str, activity_id: u64) -> Result<Value> {
        let request = ApiRequest::get(format!("{}/activities/{}", self.base_url, activity_id))
            .bearer(access_token)
            .query("include_all_efforts", "true");

        self.execute(&request).await
    }

    /// Refresh an expired access token. Strava may rotate the refresh token.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<Credentials> {
        let request = ApiRequest::post(&self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret)
            .field("refresh_token", refresh_token)
            .field("grant_type", "refresh_token")
            .auth_endpoint();

        self.execute(&request).await
    }

    /// Exchange an authorization code for tokens.
    pub async fn exchange_code(&self, code: &str) -> Result<Credentials> {
        let request = ApiRequest::post(&self.token_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &self.client_secret)
            .field("code", code)
            .field("grant_type", "authorization_code")
            .auth_endpoint();

        self.execute(&request).await
    }

    /// Send a request through each transport strategy in order.
    ///
    /// Moves to the next strategy only on transport-class failures; a token
    /// endpoint rejection is returned immediately.
    pub async fn execute<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let mut last_error =
            AppError::Transport("No transport strategies configured".to_string());

        for (attempt, transport) in self.transports.iter().enumerate() {
            if attempt > 0 {
                tracing::info!(
                    transport = transport.name(),
                    url = %request.url,
                    "Retrying with alternate transport"
                );
            }

            let outcome = match transport.send(request).await {
                Ok(response) => check_response_json(response, request.auth_endpoint),
                Err(e) => Err(e),
            };

            match outcome {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transport_failure() => {
                    tracing::warn!(
                        transport = transport.name(),
                        url = %request.url,
                        error = %e,
                        "Request failed"
                    );
                    last_error = e;
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error)
    }
}

/// Check response status and parse the JSON body.
///
/// On API calls every non-2xx status is a transport failure, so the next
/// strategy gets a try. On the token endpoint 400/401/403 are rejections.
fn check_response_json<T: DeserializeOwned>(
    response: ApiResponse,
    auth_endpoint: bool,
) -> Result<T> {
    let status = response.status;

    if !(200..300).contains(&status) {
        let body: String = response.body.chars().take(ERROR_BODY_LIMIT).collect();

        // Rate limit - the fallback transport gets one more try
        if status == 429 {
            tracing::warn!("Strava rate limit hit (429)");
            return Err(AppError::Transport(AppError::STRAVA_RATE_LIMIT.to_string()));
        }

        // Grant code or refresh token rejected
        if auth_endpoint && matches!(status, 400 | 401 | 403) {
            return Err(AppError::Auth(format!("HTTP {}: {}", status, body)));
        }

        return Err(AppError::Transport(format!("HTTP {}: {}", status, body)));
    }

    serde_json::from_str(&response.body)
        .map_err(|e| AppError::Parse(format!("JSON parse error: {}", e)))
}
