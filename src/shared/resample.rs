use chrono::NaiveDateTime;
use tracing::debug;

use crate::error::EngineError;
use crate::filter::readings_for_beacon;
use crate::readings::{BucketWidth, Reading, ResampledPoint, ResampledSeries};
use crate::time::{align_to_bucket, next_bucket};
use crate::validators::validate_time_range;

/// Running totals for one bucket
#[derive(Debug, Default)]
struct BucketAccumulator {
    primary_sum: f64,
    primary_count: usize,
    secondary_sum: f64,
    secondary_count: usize,
    signals: Vec<f64>,
}

impl BucketAccumulator {
    fn push(&mut self, reading: &Reading) {
        if let Some(t) = reading.temp_primary {
            self.primary_sum += t;
            self.primary_count += 1;
        }
        if let Some(t) = reading.temp_secondary {
            self.secondary_sum += t;
            self.secondary_count += 1;
        }
        if let Some(s) = reading.signal_strength {
            self.signals.push(s);
        }
    }

    fn finish(self, bucket_start: NaiveDateTime) -> ResampledPoint {
        ResampledPoint {
            bucket_start,
            mean_temp_primary: mean(self.primary_sum, self.primary_count),
            mean_temp_secondary: mean(self.secondary_sum, self.secondary_count),
            median_signal_strength: median(self.signals),
        }
    }
}

fn mean(sum: f64, count: usize) -> Option<f64> {
    (count > 0).then(|| sum / count as f64)
}

/// Statistical median; the two middle values are averaged for even counts
pub fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Beacon readings in chronological order; ties keep input order so sums are reproducible
fn chronological<'a>(readings: &'a [Reading], beacon_id: &str) -> Vec<&'a Reading> {
    let mut selected = readings_for_beacon(readings, beacon_id);
    selected.sort_by_key(|r| r.timestamp);
    selected
}

/// Aggregate sorted readings onto the grid `first, first + w, ..., last`.
/// Readings outside the grid are ignored.
fn bucketize(
    sorted: &[&Reading],
    first: NaiveDateTime,
    last: NaiveDateTime,
    width: BucketWidth,
) -> Vec<ResampledPoint> {
    let step = width.seconds();
    let bucket_count = ((last - first).num_seconds() / step + 1).max(0) as usize;
    let mut buckets: Vec<BucketAccumulator> = (0..bucket_count)
        .map(|_| BucketAccumulator::default())
        .collect();

    for reading in sorted {
        let offset = (align_to_bucket(reading.timestamp, step) - first).num_seconds();
        if offset < 0 {
            continue;
        }
        if let Some(bucket) = buckets.get_mut((offset / step) as usize) {
            bucket.push(reading);
        }
    }

    let mut bucket_start = first;
    let mut points = Vec::with_capacity(bucket_count);
    for bucket in buckets {
        points.push(bucket.finish(bucket_start));
        bucket_start = next_bucket(bucket_start, step);
    }
    points
}

/// Resample one beacon's readings onto a calendar-aligned grid.
///
/// The grid runs from the bucket holding the beacon's earliest reading to the
/// bucket holding its latest one. Buckets without readings are still emitted
/// with every column absent. No readings for the beacon yields an empty series.
pub fn resample(readings: &[Reading], beacon_id: &str, width: BucketWidth) -> ResampledSeries {
    let sorted = chronological(readings, beacon_id);

    let points = match (sorted.first(), sorted.last()) {
        (Some(earliest), Some(latest)) => {
            let first = align_to_bucket(earliest.timestamp, width.seconds());
            let last = align_to_bucket(latest.timestamp, width.seconds());
            bucketize(&sorted, first, last, width)
        }
        _ => Vec::new(),
    };

    debug!(
        beacon_id = %beacon_id,
        width = %width,
        readings = sorted.len(),
        buckets = points.len(),
        "Resampled beacon readings"
    );

    ResampledSeries {
        beacon_id: beacon_id.to_string(),
        bucket_width: width,
        points,
    }
}

/// Resample one beacon's readings onto a grid covering `[start, end]`.
///
/// The first bucket is the one holding `start`; buckets follow while their start
/// is before `end`. The bucket starting exactly at `end` is only added when a
/// reading sits on `end`, since the window is inclusive there.
pub fn resample_over_range(
    readings: &[Reading],
    beacon_id: &str,
    width: BucketWidth,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<ResampledSeries, EngineError> {
    validate_time_range(start, end)?;

    let step = width.seconds();
    let sorted: Vec<&Reading> = chronological(readings, beacon_id)
        .into_iter()
        .filter(|r| r.timestamp >= start && r.timestamp <= end)
        .collect();

    let first = align_to_bucket(start, step);
    let mut last = align_to_bucket(end, step);
    let reading_on_end = sorted.last().is_some_and(|r| r.timestamp == end);
    if last == end && !reading_on_end {
        last = last - width.duration();
    }

    // A zero-length window on a boundary steps `last` below `first`
    let points = if last < first {
        Vec::new()
    } else {
        bucketize(&sorted, first, last, width)
    };

    debug!(
        beacon_id = %beacon_id,
        width = %width,
        readings = sorted.len(),
        buckets = points.len(),
        "Resampled beacon readings over window"
    );

    Ok(ResampledSeries {
        beacon_id: beacon_id.to_string(),
        bucket_width: width,
        points,
    })
}
