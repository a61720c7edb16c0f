//! Test utilities for property-based testing
//!
//! This module provides generators for property-based tests using the
//! proptest framework: beacon ids, timestamps inside a fixed day, optional
//! sensor values, and complete readings or reading sets.

pub mod generators {
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use proptest::prelude::*;

    use crate::readings::{BucketWidth, Reading};

    /// Seconds in the generated day
    pub const DAY_SECONDS: i64 = 24 * 3600;

    /// Midnight of the day every generated timestamp falls on
    pub fn day_start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid fixed date")
    }

    /// Generate a beacon id from a small pool so readings share beacons
    pub fn beacon_id() -> impl Strategy<Value = String> {
        (1u8..=6).prop_map(|n| format!("Beacon_{:02}", n))
    }

    /// Generate a timestamp on 2024-01-01 with second resolution
    pub fn timestamp() -> impl Strategy<Value = NaiveDateTime> {
        (0..DAY_SECONDS).prop_map(|s| day_start() + Duration::seconds(s))
    }

    /// Generate an ordered window `(start, end)` within the day
    pub fn time_window() -> impl Strategy<Value = (NaiveDateTime, NaiveDateTime)> {
        (timestamp(), timestamp()).prop_map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
    }

    /// Generate an optional temperature around a 115 °C process target
    pub fn temperature() -> impl Strategy<Value = Option<f64>> {
        prop::option::weighted(0.85, 20.0..150.0f64)
    }

    /// Generate an optional signal strength in dBm
    pub fn signal_strength() -> impl Strategy<Value = Option<f64>> {
        prop::option::weighted(0.85, -100.0..-50.0f64)
    }

    pub fn bucket_width() -> impl Strategy<Value = BucketWidth> {
        prop::sample::select(BucketWidth::ALL.to_vec())
    }

    /// Generate a complete Reading
    pub fn reading() -> impl Strategy<Value = Reading> {
        (
            timestamp(),
            beacon_id(),
            temperature(),
            temperature(),
            signal_strength(),
        )
            .prop_map(|(ts, beacon, primary, secondary, signal)| {
                Reading::new(ts, beacon, primary, secondary, signal)
            })
    }

    /// Generate an unordered reading set (0-200 readings)
    pub fn readings() -> impl Strategy<Value = Vec<Reading>> {
        prop::collection::vec(reading(), 0..200)
    }
}

pub mod helpers {
    use chrono::{NaiveDate, NaiveDateTime};

    /// Timestamp on 2024-01-01 at the given wall-clock time
    pub fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.and_hms_opt(hour, minute, second))
            .expect("valid wall-clock time")
    }
}
