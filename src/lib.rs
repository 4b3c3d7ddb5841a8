// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava-Rides: export this year's rides from Strava to a local JSON file.
//!
//! This crate manages the OAuth token lifecycle and runs the list, detail and
//! normalize stages that produce the output file.

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod services;
pub mod time_utils;

use config::Config;
use error::Result;
use services::{
    normalize, ActivityFetcher, AuthorizationFlow, BrowserLauncher, DetailFetcher, OperatorInput,
    StravaClient, TokenManager,
};
use std::path::PathBuf;
use std::sync::Arc;
use time_utils::YearRange;

/// What a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub year: i32,
    pub rides: usize,
    /// Rides written from list data because their detail fetch failed.
    pub degraded: usize,
    pub output: PathBuf,
}

/// Export the current calendar year's rides.
pub async fn run(
    config: &Config,
    input: Arc<dyn OperatorInput>,
    browser: Arc<dyn BrowserLauncher>,
) -> Result<RunSummary> {
    run_for_range(config, input, browser, YearRange::current()).await
}

/// Export rides for an explicit time window.
pub async fn run_for_range(
    config: &Config,
    input: Arc<dyn OperatorInput>,
    browser: Arc<dyn BrowserLauncher>,
    range: YearRange,
) -> Result<RunSummary> {
    tracing::info!(year = range.year, "Fetching rides");

    let client = StravaClient::new(config);
    let flow = AuthorizationFlow::new(config, input, browser);
    let tokens = TokenManager::new(config, client.clone(), flow);

    let access_token = tokens.get_access_token().await?;
    tracing::info!("Access token ready");

    let rides = ActivityFetcher::new(client.clone())
        .list(&access_token, &range)
        .await;

    let batch = DetailFetcher::new(client, config.detail_delay)
        .fetch_all(&access_token, &rides)
        .await;

    let display = normalize::normalize_all(&batch.details);
    services::export::write_activities(&config.output_file, &display)?;

    Ok(RunSummary {
        year: range.year,
        rides: display.len(),
        degraded: batch.degraded,
        output: config.output_file.clone(),
    })
}
