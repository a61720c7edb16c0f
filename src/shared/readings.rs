use chrono::{Duration, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::EngineError;

// ============================================================================
// Core Domain Models
// ============================================================================

/// Reading represents one timestamped sample from a beacon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Reading {
    #[serde(with = "crate::time::timestamp_format")]
    pub timestamp: NaiveDateTime,
    pub beacon_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_primary: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp_secondary: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_strength: Option<f64>, // dBm
}

impl Reading {
    pub fn new(
        timestamp: NaiveDateTime,
        beacon_id: impl Into<String>,
        temp_primary: Option<f64>,
        temp_secondary: Option<f64>,
        signal_strength: Option<f64>,
    ) -> Self {
        Self {
            timestamp,
            beacon_id: beacon_id.into(),
            temp_primary,
            temp_secondary,
            signal_strength,
        }
    }
}

// ============================================================================
// Summary Models
// ============================================================================

/// Distance band of a beacon's peak temperature from the target
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Classification {
    NearTarget,
    ModerateOffset,
    FarOffset,
}

/// Upper bound (inclusive) of the near-target band in °C
pub const NEAR_TARGET_MAX_OFFSET_C: f64 = 5.0;
/// Upper bound (inclusive) of the moderate-offset band in °C
pub const MODERATE_OFFSET_MAX_OFFSET_C: f64 = 15.0;

impl Classification {
    /// Classify an absolute offset from the target; each band is closed on its upper edge
    pub fn from_offset(offset: f64) -> Self {
        if offset <= NEAR_TARGET_MAX_OFFSET_C {
            Classification::NearTarget
        } else if offset <= MODERATE_OFFSET_MAX_OFFSET_C {
            Classification::ModerateOffset
        } else {
            Classification::FarOffset
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::NearTarget => "NEAR_TARGET",
            Classification::ModerateOffset => "MODERATE_OFFSET",
            Classification::FarOffset => "FAR_OFFSET",
        }
    }
}

/// Peak temperature of one beacon within the analysed window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BeaconSummary {
    pub beacon_id: String,
    pub max_temp_primary: f64, // rounded to one decimal
    pub classification: Classification,
}

/// Message surfaced when a window holds no readings at all
pub const NO_DATA_MESSAGE: &str = "No data found for the specified time range.";

/// Result of summarizing a window.
///
/// `NoData` is distinct from `Beacons(vec![])`: the former means the window
/// had no readings, the latter that readings existed but none carried a
/// primary temperature.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", content = "beacons", rename_all = "snake_case")]
pub enum SummaryOutcome {
    NoData,
    Beacons(Vec<BeaconSummary>),
}

impl SummaryOutcome {
    pub fn is_no_data(&self) -> bool {
        matches!(self, SummaryOutcome::NoData)
    }

    /// Summaries, empty for the no-data case
    pub fn beacons(&self) -> &[BeaconSummary] {
        match self {
            SummaryOutcome::NoData => &[],
            SummaryOutcome::Beacons(beacons) => beacons,
        }
    }
}

// ============================================================================
// Resampling Models
// ============================================================================

/// Resampling bucket width
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum BucketWidth {
    #[serde(rename = "1min")]
    OneMinute,
    #[default]
    #[serde(rename = "5min")]
    FiveMinutes,
    #[serde(rename = "10min")]
    TenMinutes,
    #[serde(rename = "30min")]
    ThirtyMinutes,
    #[serde(rename = "1H")]
    OneHour,
}

impl BucketWidth {
    pub const ALL: [BucketWidth; 5] = [
        BucketWidth::OneMinute,
        BucketWidth::FiveMinutes,
        BucketWidth::TenMinutes,
        BucketWidth::ThirtyMinutes,
        BucketWidth::OneHour,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BucketWidth::OneMinute => "1min",
            BucketWidth::FiveMinutes => "5min",
            BucketWidth::TenMinutes => "10min",
            BucketWidth::ThirtyMinutes => "30min",
            BucketWidth::OneHour => "1H",
        }
    }

    pub fn seconds(&self) -> i64 {
        match self {
            BucketWidth::OneMinute => 60,
            BucketWidth::FiveMinutes => 300,
            BucketWidth::TenMinutes => 600,
            BucketWidth::ThirtyMinutes => 1800,
            BucketWidth::OneHour => 3600,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::seconds(self.seconds())
    }

    fn from_seconds(seconds: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|w| w.seconds() == seconds)
    }
}

impl fmt::Display for BucketWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BucketWidth {
    type Err = EngineError;

    /// Accepts window aliases such as `5min`, `5T`, `1H`, `1h`, `60min`
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        static ALIAS_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = ALIAS_REGEX.get_or_init(|| {
            Regex::new(r"^\s*(\d{1,4})\s*(min|m|T|H|h)\s*$").expect("valid bucket alias regex")
        });

        let invalid = || EngineError::InvalidBucketWidth(value.to_string());
        let caps = regex.captures(value).ok_or_else(invalid)?;
        let count: i64 = caps[1].parse().map_err(|_| invalid())?;
        let unit_seconds = match &caps[2] {
            "H" | "h" => 3600,
            _ => 60,
        };

        Self::from_seconds(count * unit_seconds).ok_or_else(invalid)
    }
}

impl TryFrom<Duration> for BucketWidth {
    type Error = EngineError;

    fn try_from(duration: Duration) -> Result<Self, Self::Error> {
        if duration.subsec_nanos() != 0 {
            return Err(EngineError::InvalidBucketWidth(format!("{}", duration)));
        }
        Self::from_seconds(duration.num_seconds())
            .ok_or_else(|| EngineError::InvalidBucketWidth(format!("{}", duration)))
    }
}

/// One bucket of a resampled series
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResampledPoint {
    #[serde(with = "crate::time::timestamp_format")]
    pub bucket_start: NaiveDateTime,
    pub mean_temp_primary: Option<f64>,
    pub mean_temp_secondary: Option<f64>,
    pub median_signal_strength: Option<f64>,
}

impl ResampledPoint {
    /// True when no column received a value
    pub fn is_gap(&self) -> bool {
        self.mean_temp_primary.is_none()
            && self.mean_temp_secondary.is_none()
            && self.median_signal_strength.is_none()
    }
}

/// Regular-grid series for one beacon at one bucket width
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResampledSeries {
    pub beacon_id: String,
    pub bucket_width: BucketWidth,
    pub points: Vec<ResampledPoint>,
}

impl ResampledSeries {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}
