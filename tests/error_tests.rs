// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use strava_rides::config::ConfigError;
use strava_rides::error::AppError;

#[test]
fn test_transport_failure_matches() {
    let err = AppError::Transport("HTTP 503".to_string());
    assert!(err.is_transport_failure());

    let err = AppError::Parse("expected value at line 1 column 1".to_string());
    assert!(err.is_transport_failure());

    let err = AppError::Transport(AppError::STRAVA_RATE_LIMIT.to_string());
    assert!(err.is_transport_failure());
}

#[test]
fn test_transport_failure_no_match() {
    let err = AppError::Auth("Bad Request".to_string());
    assert!(!err.is_transport_failure());

    let err = AppError::Listener("Failed to bind".to_string());
    assert!(!err.is_transport_failure());

    let err = AppError::Config(ConfigError::Missing("STRAVA_CLIENT_ID"));
    assert!(!err.is_transport_failure());
}

#[test]
fn test_is_rate_limited() {
    let err = AppError::Transport(AppError::STRAVA_RATE_LIMIT.to_string());
    assert!(err.is_rate_limited());

    let err = AppError::Transport("HTTP 500".to_string());
    assert!(!err.is_rate_limited());

    let err = AppError::Auth(AppError::STRAVA_RATE_LIMIT.to_string());
    assert!(!err.is_rate_limited());
}

#[test]
fn test_config_error_is_transparent() {
    let err: AppError = ConfigError::Missing("STRAVA_CLIENT_SECRET").into();
    assert_eq!(
        err.to_string(),
        ConfigError::Missing("STRAVA_CLIENT_SECRET").to_string()
    );
}
