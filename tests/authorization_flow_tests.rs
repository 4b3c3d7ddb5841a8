// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authorization flow tests: callback listener, timeout and manual entry.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use std::sync::Arc;
use std::time::Duration;
use strava_rides::config::Config;
use strava_rides::error::AppError;
use strava_rides::services::authorization::FlowState;
use strava_rides::services::{
    AuthorizationFlow, CallbackListener, CallbackOutcome, GrantSource,
};
use tower::ServiceExt;

mod common;
use common::{free_port, RecordingBrowser, ScriptedInput};

fn flow_config(port: u16, timeout: Duration) -> Config {
    Config {
        callback_port: port,
        auth_timeout: timeout,
        ..Config::default()
    }
}

fn port_is_free(port: u16) -> bool {
    std::net::TcpListener::bind(("127.0.0.1", port)).is_ok()
}

async fn get(router: &axum::Router, uri: &str) -> StatusCode {
    router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
        .status()
}

/// Hit the live listener until it answers (it may still be binding).
async fn send_callback(port: u16, query: &str) -> reqwest::StatusCode {
    let url = format!("http://127.0.0.1:{}/callback?{}", port, query);
    for _ in 0..100 {
        if let Ok(response) = reqwest::get(&url).await {
            return response.status();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("callback listener never came up on port {}", port);
}

#[tokio::test]
async fn test_timeout_switches_to_manual_once_and_closes_listener() {
    let port = free_port();
    let config = flow_config(port, Duration::from_millis(150));
    let input = ScriptedInput::new(&["  pasted-code  "]);
    let browser = RecordingBrowser::new();
    let flow = AuthorizationFlow::new(&config, input.clone(), browser.clone());

    let grant = flow.obtain_code().await.unwrap();

    assert_eq!(grant.code, "pasted-code");
    assert_eq!(grant.source, GrantSource::Manual);
    assert_eq!(input.prompts(), 1);
    assert_eq!(flow.state(), FlowState::Done);
    assert_eq!(browser.opened(), vec![config.authorize_url()]);
    assert!(port_is_free(port), "listener still bound after timeout");
}

#[tokio::test]
async fn test_callback_code_resolves_flow() {
    let port = free_port();
    let config = flow_config(port, Duration::from_secs(10));
    let input = ScriptedInput::new(&[]);
    let flow = Arc::new(AuthorizationFlow::new(
        &config,
        input.clone(),
        RecordingBrowser::new(),
    ));

    let running = tokio::spawn({
        let flow = flow.clone();
        async move { flow.obtain_code().await }
    });

    let status = send_callback(port, "state=&code=from-browser&scope=read").await;
    assert_eq!(status, reqwest::StatusCode::OK);

    let grant = running.await.unwrap().unwrap();
    assert_eq!(grant.code, "from-browser");
    assert_eq!(grant.source, GrantSource::Callback);
    assert_eq!(input.prompts(), 0);
    assert!(port_is_free(port));
}

#[tokio::test]
async fn test_callback_error_fails_flow() {
    let port = free_port();
    let config = flow_config(port, Duration::from_secs(10));
    let input = ScriptedInput::new(&[]);
    let flow = Arc::new(AuthorizationFlow::new(
        &config,
        input.clone(),
        RecordingBrowser::new(),
    ));

    let running = tokio::spawn({
        let flow = flow.clone();
        async move { flow.obtain_code().await }
    });

    send_callback(port, "error=access_denied").await;

    let err = running.await.unwrap().unwrap_err();
    assert!(matches!(err, AppError::Auth(_)));
    assert_eq!(flow.state(), FlowState::Failed);
    assert_eq!(input.prompts(), 0);
}

#[tokio::test]
async fn test_bind_failure_falls_back_to_manual() {
    let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = occupied.local_addr().unwrap().port();
    let config = flow_config(port, Duration::from_secs(10));
    let input = ScriptedInput::new(&["http://localhost:8000/callback?code=manual-1"]);
    let browser = RecordingBrowser::new();
    let flow = AuthorizationFlow::new(&config, input.clone(), browser.clone());

    let grant = flow.obtain_code().await.unwrap();

    assert_eq!(grant.code, "manual-1");
    assert_eq!(grant.source, GrantSource::Manual);
    assert!(browser.opened().is_empty());
}

#[tokio::test]
async fn test_callback_without_code_keeps_listening() {
    let listener = CallbackListener::new();
    let router = listener.router();

    assert_eq!(get(&router, "/callback").await, StatusCode::BAD_REQUEST);
    assert_eq!(get(&router, "/callback?code=").await, StatusCode::BAD_REQUEST);
    assert_eq!(get(&router, "/callback?code=c1").await, StatusCode::OK);
    // First terminal callback wins
    assert_eq!(get(&router, "/callback?code=c2").await, StatusCode::GONE);
    assert_eq!(get(&router, "/elsewhere").await, StatusCode::NOT_FOUND);

    let outcome = listener.wait(Duration::from_millis(10)).await;
    assert_eq!(outcome, Some(CallbackOutcome::Code("c1".to_string())));
}

#[tokio::test]
async fn test_timeout_claims_slot_before_late_callback() {
    let listener = CallbackListener::new();
    let router = listener.router();

    assert_eq!(listener.wait(Duration::from_millis(10)).await, None);
    assert_eq!(get(&router, "/callback?code=late").await, StatusCode::GONE);
}
