// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Per-activity detail retrieval with a fixed pause between requests.

use crate::error::{AppError, Result};
use crate::models::{ActivityDetail, ActivitySummary};
use crate::services::strava::StravaClient;
use std::time::Duration;

/// Details for a batch of activities, in input order.
#[derive(Debug, Clone, Default)]
pub struct DetailBatch {
    pub details: Vec<ActivityDetail>,
    /// How many entries were built from summary data only.
    pub degraded: usize,
}

/// Fetches full activity records one at a time.
#[derive(Clone)]
pub struct DetailFetcher {
    client: StravaClient,
    delay: Duration,
}

impl DetailFetcher {
    pub fn new(client: StravaClient, delay: Duration) -> Self {
        Self { client, delay }
    }

    /// Detail for a single activity, degrading to the summary on failure.
    pub async fn detail(&self, access_token: &str, summary: &ActivitySummary) -> ActivityDetail {
        self.try_detail(access_token, summary)
            .await
            .unwrap_or_else(|_| ActivityDetail::from_summary(summary))
    }

    async fn try_detail(
        &self,
        access_token: &str,
        summary: &ActivitySummary,
    ) -> Result<ActivityDetail> {
        let Some(id) = summary.id else {
            tracing::error!(name = %summary.name, "Activity has no id, keeping summary data");
            return Err(AppError::Parse("Activity summary has no id".to_string()));
        };

        match self.client.get_activity(access_token, id).await {
            Ok(raw) => Ok(ActivityDetail::project(&raw)),
            Err(e) => {
                tracing::error!(
                    activity_id = id,
                    error = %e,
                    "Detail fetch failed, keeping summary data"
                );
                Err(e)
            }
        }
    }

    /// Fetch details for every summary, sequentially.
    ///
    /// Output has one entry per input, in the same order; the pause follows
    /// every item whether or not its request succeeded.
    pub async fn fetch_all(&self, access_token: &str, summaries: &[ActivitySummary]) -> DetailBatch {
        let mut batch = DetailBatch {
            details: Vec::with_capacity(summaries.len()),
            degraded: 0,
        };

        for (i, summary) in summaries.iter().enumerate() {
            tracing::info!(
                activity_id = ?summary.id,
                name = %summary.name,
                "Fetching activity detail {}/{}",
                i + 1,
                summaries.len()
            );

            let detail = match self.try_detail(access_token, summary).await {
                Ok(detail) => detail,
                Err(_) => {
                    batch.degraded += 1;
                    ActivityDetail::from_summary(summary)
                }
            };
            batch.details.push(detail);

            tokio::time::sleep(self.delay).await;
        }

        batch
    }
}
