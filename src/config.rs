// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Built once at startup and handed to each component by reference.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Strava list endpoint maximum page size.
pub const PAGE_SIZE: u32 = 100;

/// Path on the local listener that receives the OAuth redirect.
pub const CALLBACK_PATH: &str = "/callback";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Strava OAuth client ID (public)
    pub strava_client_id: String,
    /// Strava OAuth client secret
    pub strava_client_secret: String,
    /// REST API base, e.g. `https://www.strava.com/api/v3`
    pub api_base_url: String,
    /// Host serving `/oauth/authorize` and `/oauth/token`
    pub oauth_base_url: String,
    /// Redirect URI registered with the Strava application
    pub redirect_uri: String,
    /// Requested OAuth scopes (comma separated)
    pub scope: String,
    /// Credential record location
    pub token_file: PathBuf,
    /// Where the normalized rides are written
    pub output_file: PathBuf,
    /// Port the callback listener binds on localhost
    pub callback_port: u16,
    /// How long to wait for the browser redirect before asking the operator
    pub auth_timeout: Duration,
    /// Pause after every detail request
    pub detail_delay: Duration,
    /// Upper bound on code exchange attempts; `None` keeps asking forever
    pub max_code_attempts: Option<u32>,
    /// Emit JSON log lines instead of human-readable text
    pub json_logs: bool,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            strava_client_id: "test_client_id".to_string(),
            strava_client_secret: "test_secret".to_string(),
            api_base_url: "https://www.strava.com/api/v3".to_string(),
            oauth_base_url: "https://www.strava.com".to_string(),
            redirect_uri: "http://localhost:8000/callback".to_string(),
            scope: "read,activity:read_all".to_string(),
            token_file: PathBuf::from("strava_token.json"),
            output_file: PathBuf::from("strava_data.json"),
            callback_port: 8000,
            auth_timeout: Duration::from_secs(60),
            detail_delay: Duration::from_millis(100),
            max_code_attempts: None,
            json_logs: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is honored if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        Ok(Self {
            strava_client_id: env::var("STRAVA_CLIENT_ID")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_ID"))?,
            strava_client_secret: env::var("STRAVA_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("STRAVA_CLIENT_SECRET"))?,
            api_base_url: env::var("STRAVA_BASE_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),
            oauth_base_url: env::var("STRAVA_OAUTH_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.oauth_base_url),
            redirect_uri: env::var("STRAVA_REDIRECT_URI").unwrap_or(defaults.redirect_uri),
            scope: env::var("STRAVA_SCOPE").unwrap_or(defaults.scope),
            token_file: env::var("STRAVA_TOKEN")
                .map(PathBuf::from)
                .unwrap_or(defaults.token_file),
            output_file: env::var("STRAVA_OUTPUT")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_file),
            callback_port: parse_var("STRAVA_CALLBACK_PORT")?.unwrap_or(defaults.callback_port),
            auth_timeout: parse_var("STRAVA_AUTH_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.auth_timeout),
            detail_delay: parse_var("STRAVA_DETAIL_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.detail_delay),
            max_code_attempts: parse_var("STRAVA_MAX_CODE_ATTEMPTS")?,
            json_logs: env::var("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        })
    }

    /// Browser-facing authorization URL.
    pub fn authorize_url(&self) -> String {
        format!(
            "{}/oauth/authorize?client_id={}&redirect_uri={}&response_type=code&scope={}",
            self.oauth_base_url,
            self.strava_client_id,
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&self.scope)
        )
    }

    pub fn token_url(&self) -> String {
        format!("{}/oauth/token", self.oauth_base_url)
    }
}

/// Parse an optional environment variable, rejecting malformed values.
fn parse_var<T: std::str::FromStr>(name: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(name, raw)),
        Err(_) => Ok(None),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1:?}")]
    Invalid(&'static str, String),
}
