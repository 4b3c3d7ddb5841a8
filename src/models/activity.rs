// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Strava activity models: list summaries, projected details, display records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Public permalink prefix for activities (not the API host).
pub const ACTIVITY_URL_BASE: &str = "https://www.strava.com/activities";

/// Activity type kept by the list filter.
pub const RIDE_TYPE: &str = "Ride";

/// Summary activity from the list endpoint.
///
/// Everything besides `id`, `type` and `name` is kept verbatim in `extra`, so a
/// degraded detail record can still draw distance, times and speeds from it.
/// `id` is `None` when the listing entry carried no usable integer id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivitySummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(rename = "type")]
    pub activity_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ActivitySummary {
    /// Build a summary from a raw listing entry without rejecting it.
    ///
    /// A missing or non-integer `id` leaves `id` as `None`; a non-string
    /// `type` or `name` becomes empty.
    pub fn from_entry(entry: &Map<String, Value>) -> Self {
        let mut extra = entry.clone();
        let id = extra.remove("id").as_ref().and_then(Value::as_u64);
        let activity_type = extra
            .remove("type")
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_default();
        let name = extra
            .remove("name")
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_default();

        Self {
            id,
            activity_type,
            name,
            extra,
        }
    }

    pub fn is_ride(&self) -> bool {
        self.activity_type == RIDE_TYPE
    }

    /// Rebuild the upstream JSON object this summary was parsed from.
    pub fn to_raw(&self) -> Value {
        let mut raw = self.extra.clone();
        if let Some(id) = self.id {
            raw.insert("id".to_string(), Value::from(id));
        }
        raw.insert("type".to_string(), Value::from(self.activity_type.clone()));
        raw.insert("name".to_string(), Value::from(self.name.clone()));
        Value::Object(raw)
    }
}

/// Detailed activity, projected onto a fixed allow-list of fields.
///
/// Fields missing upstream stay `None` and are omitted from serialized output.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ActivityDetail {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Local start time, ISO 8601 (`2025-04-08T13:56:26Z`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date_local: Option<String>,
    /// Meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moving_time: Option<u64>,
    /// Meters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_elevation_gain: Option<f64>,
    /// m/s
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_speed: Option<f64>,
    /// m/s
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_heartrate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_heartrate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_heartrate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ActivityDetail {
    /// Project a raw activity payload onto the allow-list.
    ///
    /// Never fails: wrong-typed or absent fields simply become `None`.
    pub fn project(raw: &Value) -> Self {
        Self {
            activity_type: str_field(raw, "type"),
            name: str_field(raw, "name"),
            start_date_local: str_field(raw, "start_date_local"),
            distance: f64_field(raw, "distance"),
            moving_time: raw
                .get("moving_time")
                .and_then(|v| v.as_u64().or_else(|| v.as_f64().map(|f| f as u64))),
            total_elevation_gain: f64_field(raw, "total_elevation_gain"),
            average_speed: f64_field(raw, "average_speed"),
            max_speed: f64_field(raw, "max_speed"),
            has_heartrate: raw.get("has_heartrate").and_then(Value::as_bool),
            average_heartrate: f64_field(raw, "average_heartrate"),
            max_heartrate: f64_field(raw, "max_heartrate"),
            calories: f64_field(raw, "calories"),
            url: raw
                .get("id")
                .and_then(Value::as_u64)
                .map(|id| format!("{}/{}", ACTIVITY_URL_BASE, id)),
        }
    }

    /// Degraded record built from list data only.
    pub fn from_summary(summary: &ActivitySummary) -> Self {
        Self::project(&summary.to_raw())
    }
}

fn str_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_string)
}

fn f64_field(raw: &Value, key: &str) -> Option<f64> {
    raw.get(key).and_then(Value::as_f64)
}

/// Activity converted to display units, as written to the output file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplayActivity {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub activity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `YYYY-MM-DD`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date_local: Option<String>,
    /// Kilometers, 2 decimals
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// `HH.M` hours and whole minutes, e.g. `01.30`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moving_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_elevation_gain: Option<f64>,
    /// km/h, 1 decimal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_speed: Option<f64>,
    /// km/h, 1 decimal
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_speed: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_heartrate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_heartrate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_heartrate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}
