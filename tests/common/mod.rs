// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use strava_rides::config::Config;
use strava_rides::error::{AppError, Result};
use strava_rides::models::Credentials;
use strava_rides::services::{BrowserLauncher, OperatorInput, TokenStore};
use wiremock::MockServer;

/// Operator stand-in that replays canned replies and counts prompts.
pub struct ScriptedInput {
    replies: Mutex<VecDeque<String>>,
    prompts: AtomicUsize,
}

#[allow(dead_code)]
impl ScriptedInput {
    pub fn new(replies: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.iter().map(|r| r.to_string()).collect()),
            prompts: AtomicUsize::new(0),
        })
    }

    pub fn prompts(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OperatorInput for ScriptedInput {
    async fn prompt(&self, _message: &str) -> Result<String> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| {
                AppError::Io(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "script exhausted",
                ))
            })
    }
}

/// Browser stand-in that records the URLs it was asked to open.
#[derive(Default)]
pub struct RecordingBrowser {
    opened: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl RecordingBrowser {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn opened(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }
}

impl BrowserLauncher for RecordingBrowser {
    fn open(&self, url: &str) -> std::io::Result<()> {
        self.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

/// Grab a port nothing is listening on right now.
#[allow(dead_code)]
pub fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Config pointing every endpoint at the mock server and files into `dir`.
#[allow(dead_code)]
pub fn test_config(server: &MockServer, dir: &Path) -> Config {
    Config {
        api_base_url: format!("{}/api/v3", server.uri()),
        oauth_base_url: server.uri(),
        token_file: dir.join("token.json"),
        output_file: dir.join("strava_data.json"),
        callback_port: free_port(),
        auth_timeout: Duration::from_millis(200),
        detail_delay: Duration::from_millis(1),
        ..Config::default()
    }
}

#[allow(dead_code)]
pub fn seed_tokens(config: &Config, access: &str, refresh: &str, expires_at: i64) -> Credentials {
    let credentials = Credentials {
        access_token: access.to_string(),
        refresh_token: refresh.to_string(),
        expires_at,
    };
    TokenStore::new(config.token_file.clone())
        .save(&credentials)
        .unwrap();
    credentials
}

/// Token endpoint response body, including fields we do not keep.
#[allow(dead_code)]
pub fn token_body(access: &str, refresh: &str, expires_at: i64) -> Value {
    json!({
        "token_type": "Bearer",
        "access_token": access,
        "refresh_token": refresh,
        "expires_at": expires_at,
        "expires_in": 21600,
        "athlete": {"id": 1234, "firstname": "Test"}
    })
}
