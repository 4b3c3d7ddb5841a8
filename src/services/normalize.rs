// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Unit conversion from Strava's raw units to display units.
//!
//! - speed: m/s -> km/h, 1 decimal
//! - distance: m -> km, 2 decimals
//! - moving time: seconds -> `HH.M` (hours, then whole minutes unpadded)
//! - start date: ISO 8601 -> `YYYY-MM-DD`
//!
//! Absent inputs stay absent; nothing here fails.

use crate::models::{ActivityDetail, DisplayActivity};

/// Convert one projected activity for output.
pub fn normalize(detail: &ActivityDetail) -> DisplayActivity {
    DisplayActivity {
        activity_type: detail.activity_type.clone(),
        name: detail.name.clone(),
        start_date_local: detail.start_date_local.as_deref().map(date_only),
        distance: detail.distance.map(meters_to_km),
        moving_time: detail.moving_time.map(format_moving_time),
        total_elevation_gain: detail.total_elevation_gain,
        average_speed: detail.average_speed.map(ms_to_kmh),
        max_speed: detail.max_speed.map(ms_to_kmh),
        has_heartrate: detail.has_heartrate,
        average_heartrate: detail.average_heartrate,
        max_heartrate: detail.max_heartrate,
        calories: detail.calories,
        url: detail.url.clone(),
    }
}

pub fn normalize_all(details: &[ActivityDetail]) -> Vec<DisplayActivity> {
    details.iter().map(normalize).collect()
}

/// Round to nearest, halves toward +infinity.
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// x3.6 done as x36 then /10 to keep one decimal exact.
fn ms_to_kmh(speed: f64) -> f64 {
    round_half_up(speed * 36.0) / 10.0
}

fn meters_to_km(distance: f64) -> f64 {
    round_half_up(distance / 10.0) / 100.0
}

/// Hours zero-padded to two digits, then minutes as a plain integer.
///
/// 5400 s -> `01.30`, 3660 s -> `01.1`. The minute part is not padded, so
/// this reads like a decimal, not `HH:MM`.
fn format_moving_time(seconds: u64) -> String {
    let total_hours = seconds as f64 / 3600.0;
    let hours = total_hours.floor();
    let decimal_minutes = (total_hours - hours) * 60.0;
    let rounded_minutes = round_half_up(decimal_minutes * 100.0) / 100.0;

    format!("{:02}.{}", hours as u64, round_half_up(rounded_minutes) as u64)
}

fn date_only(start: &str) -> String {
    start.chars().take(10).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_reference_activity() {
        let detail = ActivityDetail {
            average_speed: Some(10.0),
            moving_time: Some(5400),
            distance: Some(15000.0),
            start_date_local: Some("2025-04-08T13:56:26Z".to_string()),
            ..Default::default()
        };

        let out = normalize(&detail);
        assert_eq!(out.average_speed, Some(36.0));
        assert_eq!(out.moving_time.as_deref(), Some("01.30"));
        assert_eq!(out.distance, Some(15.0));
        assert_eq!(out.start_date_local.as_deref(), Some("2025-04-08"));
    }

    #[test]
    fn test_speed_rounding() {
        assert_eq!(ms_to_kmh(8.333), 30.0);
        assert_eq!(ms_to_kmh(5.125), 18.5);
        assert_eq!(ms_to_kmh(0.0), 0.0);
    }

    #[test]
    fn test_distance_two_decimals() {
        assert_eq!(meters_to_km(42195.0), 42.2);
        assert_eq!(meters_to_km(1234.0), 1.23);
        assert_eq!(meters_to_km(1235.0), 1.24);
    }

    #[test]
    fn test_moving_time_minutes_not_padded() {
        assert_eq!(format_moving_time(3660), "01.1");
        assert_eq!(format_moving_time(45 * 60), "00.45");
        assert_eq!(format_moving_time(10 * 3600 + 5 * 60 + 31), "10.6");
        assert_eq!(format_moving_time(0), "00.0");
    }

    #[test]
    fn test_short_date_kept_as_is() {
        assert_eq!(date_only("2025-04"), "2025-04");
    }

    #[test]
    fn test_degraded_item_keeps_absent_fields_absent() {
        let detail = ActivityDetail {
            activity_type: Some("Ride".to_string()),
            name: Some("Commute".to_string()),
            ..Default::default()
        };

        let out = normalize(&detail);
        assert_eq!(out.name.as_deref(), Some("Commute"));
        assert_eq!(out.distance, None);
        assert_eq!(out.moving_time, None);
        assert_eq!(out.average_speed, None);
        assert_eq!(out.start_date_local, None);
    }

    #[test]
    fn test_normalize_all_preserves_order() {
        let details: Vec<ActivityDetail> = (0..3)
            .map(|i| ActivityDetail {
                name: Some(format!("ride {}", i)),
                ..Default::default()
            })
            .collect();

        let names: Vec<_> = normalize_all(&details)
            .into_iter()
            .map(|d| d.name.unwrap())
            .collect();
        assert_eq!(names, vec!["ride 0", "ride 1", "ride 2"]);
    }
}
