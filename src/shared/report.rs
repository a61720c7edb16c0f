use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::EngineError;
use crate::filter::filter_readings;
use crate::readings::{BucketWidth, Reading, ResampledSeries, SummaryOutcome, NO_DATA_MESSAGE};
use crate::resample::resample;
use crate::stats::{
    beacon_ids, beacon_stats, classification_counts, dataset_overview, BeaconStats,
    ClassificationCounts, DatasetOverview,
};
use crate::summary::summarize_max_temperature;
use crate::validators::{validate_target_temperature, validate_time_range};

/// Default target temperature in °C
pub const DEFAULT_TARGET_TEMP_C: f64 = 115.0;

fn default_target_temp() -> f64 {
    DEFAULT_TARGET_TEMP_C
}

/// Everything one analysis run needs, passed explicitly on each call
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisRequest {
    #[serde(with = "crate::time::timestamp_format")]
    pub start: NaiveDateTime,
    #[serde(with = "crate::time::timestamp_format")]
    pub end: NaiveDateTime,
    /// Beacons to include; empty means all
    #[serde(default)]
    pub beacon_ids: Vec<String>,
    #[serde(default = "default_target_temp")]
    pub target_temp_c: f64,
    #[serde(default)]
    pub bucket_width: BucketWidth,
}

impl AnalysisRequest {
    /// Request over `[start, end]` for all beacons with default target and bucket width
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end,
            beacon_ids: Vec::new(),
            target_temp_c: DEFAULT_TARGET_TEMP_C,
            bucket_width: BucketWidth::default(),
        }
    }

    pub fn with_beacons(mut self, beacon_ids: Vec<String>) -> Self {
        self.beacon_ids = beacon_ids;
        self
    }

    pub fn with_target(mut self, target_temp_c: f64) -> Self {
        self.target_temp_c = target_temp_c;
        self
    }

    pub fn with_bucket_width(mut self, bucket_width: BucketWidth) -> Self {
        self.bucket_width = bucket_width;
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        validate_time_range(self.start, self.end)?;
        validate_target_temperature(self.target_temp_c)
    }
}

/// Per-beacon section of a report
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BeaconAnalysis {
    pub stats: BeaconStats,
    pub series: ResampledSeries,
}

/// Output of one analysis run
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisReport {
    pub request: AnalysisRequest,
    pub overview: DatasetOverview,
    pub summary: SummaryOutcome,
    pub counts: ClassificationCounts,
    pub beacons: Vec<BeaconAnalysis>,
}

/// Run filter, summary and resampling for one request
pub fn analyze(readings: &[Reading], request: &AnalysisRequest) -> Result<AnalysisReport, EngineError> {
    request.validate()?;

    let filtered = filter_readings(
        readings,
        request.start,
        request.end,
        Some(request.beacon_ids.as_slice()),
    )?;

    let summary = summarize_max_temperature(&filtered, request.target_temp_c);
    if summary.is_no_data() {
        warn!(
            start = %request.start,
            end = %request.end,
            beacons = request.beacon_ids.len(),
            "{}",
            NO_DATA_MESSAGE
        );
    }

    let counts = classification_counts(summary.beacons());
    let overview = dataset_overview(&filtered);

    let beacons: Vec<BeaconAnalysis> = beacon_ids(&filtered)
        .iter()
        .map(|beacon_id| BeaconAnalysis {
            stats: beacon_stats(&filtered, beacon_id),
            series: resample(&filtered, beacon_id, request.bucket_width),
        })
        .collect();

    info!(
        readings = filtered.len(),
        beacons = beacons.len(),
        near_target = counts.near_target,
        moderate_offset = counts.moderate_offset,
        far_offset = counts.far_offset,
        bucket_width = %request.bucket_width,
        "Analysis completed"
    );

    Ok(AnalysisReport {
        request: request.clone(),
        overview,
        summary,
        counts,
        beacons,
    })
}
