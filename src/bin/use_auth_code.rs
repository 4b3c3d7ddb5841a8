// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Exchange an existing Strava authorization code for tokens.
//!
//! Usage: `use-auth-code [CODE_OR_REDIRECT_URL]`. Without an argument the code
//! is read from the terminal.

use std::process::ExitCode;
use strava_rides::{
    config::Config,
    error::Result,
    logging,
    models::credentials::mask_secret,
    services::{authorization::extract_code, ConsoleInput, OperatorInput, StravaClient, TokenStore},
    time_utils::format_local,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::from_env();
    logging::init(config.as_ref().is_ok_and(|c| c.json_logs));

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let input = ConsoleInput::new();
    let raw = match read_code(&config, &input, std::env::args().nth(1)).await {
        Ok(raw) => raw,
        Err(e) => {
            tracing::error!(error = %e, "Could not read an authorization code");
            return ExitCode::FAILURE;
        }
    };

    let code = extract_code(&raw);
    match exchange(&config, &code).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Could not obtain a Strava access token");
            log_troubleshooting(&config, &code);
            ExitCode::FAILURE
        }
    }
}

async fn read_code(config: &Config, input: &ConsoleInput, arg: Option<String>) -> Result<String> {
    if let Some(arg) = arg {
        tracing::info!("Using authorization code from the command line");
        return Ok(arg);
    }

    tracing::info!(url = %config.authorize_url(), "To get a new authorization code, visit");
    input
        .prompt("Enter your Strava authorization code or the full redirect URL: ")
        .await
}

async fn exchange(config: &Config, code: &str) -> Result<()> {
    tracing::info!(code = %mask_secret(code), "Exchanging authorization code for tokens");

    let credentials = StravaClient::new(config).exchange_code(code).await?;

    tracing::info!(
        access_token = %mask_secret(&credentials.access_token),
        refresh_token = %mask_secret(&credentials.refresh_token),
        expires_at = %format_local(credentials.expires_at),
        "Access token obtained"
    );

    TokenStore::new(config.token_file.clone()).save(&credentials)?;
    tracing::info!("You can now run strava-rides to export your rides");
    Ok(())
}

fn log_troubleshooting(config: &Config, code: &str) {
    tracing::info!(
        "Check the application at https://www.strava.com/settings/api: \
         the authorization callback domain must match {}",
        config.redirect_uri
    );
    tracing::info!("To try by hand: {}", manual_exchange_command(config, code));
}

/// curl equivalent of the token exchange, with the secret and code masked.
fn manual_exchange_command(config: &Config, code: &str) -> String {
    format!(
        "curl -X POST {} -d client_id={} -d client_secret={} -d code={} \
         -d grant_type=authorization_code",
        config.token_url(),
        config.strava_client_id,
        mask_secret(&config.strava_client_secret),
        mask_secret(code)
    )
}
