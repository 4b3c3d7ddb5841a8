// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Output file writer.

use crate::error::{AppError, Result};
use crate::models::DisplayActivity;
use std::fs;
use std::path::Path;

/// Write activities as a pretty-printed JSON array, replacing any previous file.
pub fn write_activities(path: &Path, activities: &[DisplayActivity]) -> Result<()> {
    let json = serde_json::to_string_pretty(activities)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Serialize activities: {}", e)))?;

    fs::write(path, json)?;

    tracing::info!(
        path = %path.display(),
        count = activities.len(),
        "Ride data written"
    );
    Ok(())
}
