use chrono::NaiveDateTime;
use std::collections::HashSet;
use tracing::debug;

use crate::error::EngineError;
use crate::readings::Reading;
use crate::validators::validate_time_range;

/// Keep the readings whose timestamp lies in `[start, end]` (both bounds inclusive)
/// and, when `beacon_ids` is non-empty, whose beacon is listed.
///
/// Input order is preserved. Duplicated `(beacon_id, timestamp)` pairs are kept as-is.
pub fn filter_readings(
    readings: &[Reading],
    start: NaiveDateTime,
    end: NaiveDateTime,
    beacon_ids: Option<&[String]>,
) -> Result<Vec<Reading>, EngineError> {
    validate_time_range(start, end)?;

    let allowed: Option<HashSet<&str>> = beacon_ids
        .filter(|ids| !ids.is_empty())
        .map(|ids| ids.iter().map(String::as_str).collect());

    let kept: Vec<Reading> = readings
        .iter()
        .filter(|r| r.timestamp >= start && r.timestamp <= end)
        .filter(|r| {
            allowed
                .as_ref()
                .map_or(true, |ids| ids.contains(r.beacon_id.as_str()))
        })
        .cloned()
        .collect();

    debug!(
        input = readings.len(),
        kept = kept.len(),
        start = %start,
        end = %end,
        beacon_filter = allowed.as_ref().map_or(0, HashSet::len),
        "Filtered readings"
    );

    Ok(kept)
}

/// Readings of a single beacon, in input order
pub fn readings_for_beacon<'a>(readings: &'a [Reading], beacon_id: &str) -> Vec<&'a Reading> {
    readings.iter().filter(|r| r.beacon_id == beacon_id).collect()
}
