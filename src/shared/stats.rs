use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::readings::{BeaconSummary, Classification, Reading};

/// Size of a reading set
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct DatasetOverview {
    pub total_records: usize,
    pub distinct_days: usize,
    pub beacon_count: usize,
}

/// Plain averages for one beacon over the analysed window
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BeaconStats {
    pub beacon_id: String,
    pub avg_temp_primary: Option<f64>,
    pub avg_signal_strength: Option<f64>,
    pub data_points: usize,
}

/// Number of beacons per classification band
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ClassificationCounts {
    pub near_target: usize,
    pub moderate_offset: usize,
    pub far_offset: usize,
    /// Classified beacons; a beacon with no primary temperature is not counted
    pub total: usize,
}

/// Distinct beacon ids in ascending order
pub fn beacon_ids(readings: &[Reading]) -> Vec<String> {
    readings
        .iter()
        .map(|r| r.beacon_id.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Earliest and latest timestamp, if any reading exists
pub fn time_span(readings: &[Reading]) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let earliest = readings.iter().map(|r| r.timestamp).min()?;
    let latest = readings.iter().map(|r| r.timestamp).max()?;
    Some((earliest, latest))
}

pub fn dataset_overview(readings: &[Reading]) -> DatasetOverview {
    let days: BTreeSet<NaiveDate> = readings.iter().map(|r| r.timestamp.date()).collect();
    let beacons: BTreeSet<&str> = readings.iter().map(|r| r.beacon_id.as_str()).collect();

    DatasetOverview {
        total_records: readings.len(),
        distinct_days: days.len(),
        beacon_count: beacons.len(),
    }
}

/// Averages for `beacon_id`; values are summed in input order
pub fn beacon_stats(readings: &[Reading], beacon_id: &str) -> BeaconStats {
    let mut temp_sum = 0.0;
    let mut temp_count = 0usize;
    let mut signal_sum = 0.0;
    let mut signal_count = 0usize;
    let mut data_points = 0usize;

    for reading in readings.iter().filter(|r| r.beacon_id == beacon_id) {
        data_points += 1;
        if let Some(t) = reading.temp_primary {
            temp_sum += t;
            temp_count += 1;
        }
        if let Some(s) = reading.signal_strength {
            signal_sum += s;
            signal_count += 1;
        }
    }

    BeaconStats {
        beacon_id: beacon_id.to_string(),
        avg_temp_primary: (temp_count > 0).then(|| temp_sum / temp_count as f64),
        avg_signal_strength: (signal_count > 0).then(|| signal_sum / signal_count as f64),
        data_points,
    }
}

pub fn classification_counts(summaries: &[BeaconSummary]) -> ClassificationCounts {
    summaries
        .iter()
        .fold(ClassificationCounts::default(), |mut counts, summary| {
            match summary.classification {
                Classification::NearTarget => counts.near_target += 1,
                Classification::ModerateOffset => counts.moderate_offset += 1,
                Classification::FarOffset => counts.far_offset += 1,
            }
            counts.total += 1;
            counts
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn sample() -> Vec<Reading> {
        vec![
            Reading::new(at(2, 10), "B2", Some(100.0), None, Some(-70.0)),
            Reading::new(at(1, 10), "B1", Some(110.0), None, None),
            Reading::new(at(1, 12), "B1", None, None, Some(-80.0)),
            Reading::new(at(1, 14), "B1", Some(120.0), None, Some(-60.0)),
        ]
    }

    #[test]
    fn test_beacon_ids_sorted_distinct() {
        assert_eq!(beacon_ids(&sample()), vec!["B1".to_string(), "B2".to_string()]);
        assert!(beacon_ids(&[]).is_empty());
    }

    #[test]
    fn test_time_span() {
        assert_eq!(time_span(&sample()), Some((at(1, 10), at(2, 10))));
        assert_eq!(time_span(&[]), None);
    }

    #[test]
    fn test_dataset_overview() {
        let overview = dataset_overview(&sample());
        assert_eq!(
            overview,
            DatasetOverview {
                total_records: 4,
                distinct_days: 2,
                beacon_count: 2,
            }
        );
        assert_eq!(dataset_overview(&[]), DatasetOverview::default());
    }

    #[test]
    fn test_beacon_stats_skip_missing_values() {
        let stats = beacon_stats(&sample(), "B1");
        assert_eq!(stats.data_points, 3);
        assert_eq!(stats.avg_temp_primary, Some(115.0));
        assert_eq!(stats.avg_signal_strength, Some(-70.0));
    }

    #[test]
    fn test_beacon_stats_unknown_beacon() {
        let stats = beacon_stats(&sample(), "B9");
        assert_eq!(stats.data_points, 0);
        assert_eq!(stats.avg_temp_primary, None);
        assert_eq!(stats.avg_signal_strength, None);
    }

    #[test]
    fn test_classification_counts() {
        let summary = |id: &str, classification| BeaconSummary {
            beacon_id: id.to_string(),
            max_temp_primary: 0.0,
            classification,
        };
        let summaries = vec![
            summary("B1", Classification::NearTarget),
            summary("B2", Classification::FarOffset),
            summary("B3", Classification::NearTarget),
        ];

        let counts = classification_counts(&summaries);
        assert_eq!(counts.near_target, 2);
        assert_eq!(counts.moderate_offset, 0);
        assert_eq!(counts.far_offset, 1);
        assert_eq!(counts.total, 3);
    }

    #[test]
    fn test_counts_total_skips_beacon_without_primary() {
        let readings = vec![
            Reading::new(at(1, 10), "B1", Some(118.0), None, None),
            Reading::new(at(1, 10), "B2", None, Some(90.0), Some(-70.0)),
        ];
        let summary = crate::summary::summarize_max_temperature(&readings, 115.0);

        let counts = classification_counts(summary.beacons());
        assert_eq!(dataset_overview(&readings).beacon_count, 2);
        assert_eq!(counts.total, 1);
        assert_eq!(counts.near_target, 1);
    }
}
