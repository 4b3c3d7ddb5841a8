// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Strava-Rides CLI
//!
//! Authorizes with Strava (reusing saved credentials when possible), then
//! writes this year's rides to a JSON file.

use std::process::ExitCode;
use std::sync::Arc;
use strava_rides::{
    config::Config,
    logging,
    services::{BrowserLauncher, ConsoleInput, OperatorInput, SystemBrowser},
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

    // Single console handle for the whole run
    let input: Arc<dyn OperatorInput> = Arc::new(ConsoleInput::new());
    let browser: Arc<dyn BrowserLauncher> = Arc::new(SystemBrowser);

    match strava_rides::run(&config, input, browser).await {
        Ok(summary) => {
            tracing::info!(
                year = summary.year,
                rides = summary.rides,
                degraded = summary.degraded,
                output = %summary.output.display(),
                "Ride export complete"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Ride export failed");
            ExitCode::FAILURE
        }
    }
}
