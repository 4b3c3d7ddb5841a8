// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types.

use crate::config::ConfigError;

/// Application error type shared by every stage of the ride export.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Network failure or an unexpected HTTP status from Strava.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Grant code or refresh token rejected by the token endpoint.
    #[error("Authorization error: {0}")]
    Auth(String),

    /// Response body was not the JSON we expected.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Local callback listener could not bind or handle the redirect.
    #[error("Callback listener error: {0}")]
    Listener(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Message carried by transport errors caused by HTTP 429.
    pub const STRAVA_RATE_LIMIT: &'static str = "Strava rate limit exceeded";

    /// Whether another transport strategy may succeed where this one failed.
    ///
    /// Parse failures count: a truncated or garbled body is as likely to be a
    /// transport problem as a server one.
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, AppError::Transport(_) | AppError::Parse(_))
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, AppError::Transport(msg) if msg.contains(Self::STRAVA_RATE_LIMIT))
    }
}

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AppError>;
