use std::collections::BTreeMap;
use tracing::debug;

use crate::readings::{BeaconSummary, Classification, Reading, SummaryOutcome};

/// Round to one decimal place, ties to even (115.25 -> 115.2, 115.35 -> 115.4
/// modulo the binary representation of the input).
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Classify a peak temperature against a target
pub fn classify(max_temp_c: f64, target_temp_c: f64) -> Classification {
    Classification::from_offset((max_temp_c - target_temp_c).abs())
}

/// Per-beacon peak of `temp_primary`, rounded and classified against `target_temp_c`.
///
/// Beacons without any primary temperature are left out. Output is ordered by
/// beacon id. An empty input yields [`SummaryOutcome::NoData`].
pub fn summarize_max_temperature(readings: &[Reading], target_temp_c: f64) -> SummaryOutcome {
    if readings.is_empty() {
        debug!("No readings to summarize");
        return SummaryOutcome::NoData;
    }

    let mut peaks: BTreeMap<&str, Option<f64>> = BTreeMap::new();
    for reading in readings {
        let peak = peaks.entry(reading.beacon_id.as_str()).or_insert(None);
        if let Some(temp) = reading.temp_primary {
            *peak = Some(peak.map_or(temp, |current| current.max(temp)));
        }
    }

    let summaries: Vec<BeaconSummary> = peaks
        .into_iter()
        .filter_map(|(beacon_id, peak)| {
            let max_temp_primary = round_one_decimal(peak?);
            Some(BeaconSummary {
                beacon_id: beacon_id.to_string(),
                max_temp_primary,
                classification: classify(max_temp_primary, target_temp_c),
            })
        })
        .collect();

    debug!(
        readings = readings.len(),
        beacons = summaries.len(),
        target_temp_c,
        "Summarized peak temperatures"
    );

    SummaryOutcome::Beacons(summaries)
}
