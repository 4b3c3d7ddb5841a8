// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Paginated listing of the athlete's rides.

use crate::config::PAGE_SIZE;
use crate::models::activity::RIDE_TYPE;
use crate::models::ActivitySummary;
use crate::services::strava::StravaClient;
use crate::time_utils::YearRange;
use serde_json::Value;

/// Walks the list endpoint page by page, keeping only rides.
#[derive(Clone)]
pub struct ActivityFetcher {
    client: StravaClient,
    per_page: u32,
}

impl ActivityFetcher {
    pub fn new(client: StravaClient) -> Self {
        Self {
            client,
            per_page: PAGE_SIZE,
        }
    }

    /// List every ride in `range`.
    ///
    /// Stops at the first page with no entries at all (a page of only
    /// non-rides keeps going). If a page fails on every transport, the rides
    /// gathered so far are returned as the result.
    pub async fn list(&self, access_token: &str, range: &YearRange) -> Vec<ActivitySummary> {
        let mut rides = Vec::new();
        let mut page = 1u32;

        loop {
            tracing::info!(page, "Fetching activity page");

            let entries = match self
                .client
                .list_activities(access_token, range, page, self.per_page)
                .await
            {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::error!(
                        page,
                        error = %e,
                        collected = rides.len(),
                        "Activity listing failed, keeping what was collected"
                    );
                    if e.is_rate_limited() {
                        tracing::warn!("Strava rate limit reached, rerun later for a complete export");
                    }
                    break;
                }
            };

            if entries.is_empty() {
                break;
            }

            let before = rides.len();
            rides.extend(entries.iter().filter_map(parse_ride));
            tracing::info!(
                page,
                activities = entries.len(),
                rides = rides.len() - before,
                "Activity page fetched"
            );

            page += 1;
        }

        tracing::info!(rides = rides.len(), year = range.year, "Ride listing complete");
        rides
    }
}

/// Keep every entry typed `Ride`, whatever else it is missing.
fn parse_ride(entry: &Value) -> Option<ActivitySummary> {
    let entry = entry.as_object()?;
    if entry.get("type").and_then(Value::as_str) != Some(RIDE_TYPE) {
        return None;
    }

    let summary = ActivitySummary::from_entry(entry);
    if summary.id.is_none() {
        tracing::warn!(name = %summary.name, "Ride entry has no usable id, keeping list data only");
    }
    Some(summary)
}
