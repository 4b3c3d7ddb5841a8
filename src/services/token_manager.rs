// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Access token lifecycle: cached token, refresh, or full authorization.

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::credentials::{mask_secret, Credentials};
use crate::services::authorization::AuthorizationFlow;
use crate::services::strava::StravaClient;
use crate::services::token_store::TokenStore;
use crate::time_utils::{format_local, now_unix};

/// Hands out a usable access token, refreshing or authorizing as needed.
///
/// A rejected refresh token is returned as an error; it does not fall back to
/// a fresh authorization. A rejected grant code, on the other hand, sends the
/// operator back for another one (up to `max_code_attempts`, if set).
pub struct TokenManager {
    store: TokenStore,
    client: StravaClient,
    flow: AuthorizationFlow,
    max_code_attempts: Option<u32>,
}

impl TokenManager {
    pub fn new(config: &Config, client: StravaClient, flow: AuthorizationFlow) -> Self {
        Self {
            store: TokenStore::new(config.token_file.clone()),
            client,
            flow,
            max_code_attempts: config.max_code_attempts,
        }
    }

    /// Get a valid access token for this run.
    pub async fn get_access_token(&self) -> Result<String> {
        self.get_access_token_at(now_unix()).await
    }

    /// Same as [`get_access_token`](Self::get_access_token) with an explicit clock.
    pub async fn get_access_token_at(&self, now: i64) -> Result<String> {
        let Some(saved) = self.store.load()? else {
            tracing::info!("No saved credentials, starting OAuth authorization");
            return self.authorize().await;
        };

        if saved.needs_refresh(now) {
            tracing::info!(
                expires_at = %format_local(saved.expires_at),
                "Access token expired or expiring within the hour, refreshing"
            );
            return self.refresh(&saved).await;
        }

        tracing::info!(
            expires_at = %format_local(saved.expires_at),
            "Using saved access token"
        );
        Ok(saved.access_token)
    }

    async fn refresh(&self, saved: &Credentials) -> Result<String> {
        let credentials = self
            .client
            .refresh_token(&saved.refresh_token)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Token refresh failed");
                e
            })?;

        self.persist(&credentials);
        tracing::info!(
            expires_at = %format_local(credentials.expires_at),
            "Access token refreshed"
        );
        Ok(credentials.access_token)
    }

    async fn authorize(&self) -> Result<String> {
        let code = match self.flow.obtain_code().await {
            Ok(grant) => grant.code,
            // Denied or broken callback; a failed operator prompt is not retried
            Err(e @ (AppError::Auth(_) | AppError::Listener(_))) => {
                tracing::warn!(error = %e, "Automatic authorization failed, switching to manual entry");
                self.flow.prompt_for_code().await?
            }
            Err(e) => return Err(e),
        };

        self.exchange_with_retry(code).await
    }

    /// Exchange `code` for tokens, asking the operator for a new code after
    /// each rejection.
    pub async fn exchange_with_retry(&self, code: String) -> Result<String> {
        let mut code = code;
        let mut attempt: u32 = 1;

        loop {
            tracing::info!(
                attempt,
                code = %mask_secret(&code),
                "Exchanging authorization code for tokens"
            );

            match self.client.exchange_code(&code).await {
                Ok(credentials) => {
                    self.persist(&credentials);
                    tracing::info!(
                        expires_at = %format_local(credentials.expires_at),
                        "Access token obtained"
                    );
                    return Ok(credentials.access_token);
                }
                Err(e) => {
                    tracing::error!(attempt, error = %e, "Token exchange failed");

                    if self.max_code_attempts.is_some_and(|max| attempt >= max) {
                        return Err(e);
                    }

                    tracing::warn!("Authorization code may be invalid, requesting a new one");
                    code = self.flow.prompt_for_code().await?;
                    attempt += 1;
                }
            }
        }
    }

    /// Save credentials; a write failure costs the next run, not this one.
    fn persist(&self, credentials: &Credentials) {
        if let Err(e) = self.store.save(credentials) {
            tracing::error!(
                path = %self.store.path().display(),
                error = %e,
                "Failed to save credentials"
            );
        }
    }
}
