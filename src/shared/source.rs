use std::io::Read;
use tracing::debug;

use crate::error::EngineError;
use crate::readings::Reading;
use crate::validators::validate_reading;

/// Decode a JSON array of readings and reject malformed rows.
///
/// Expected row shape:
/// `{"timestamp": "2024-01-01 10:00:00", "beacon_id": "B1", "temp_primary": 110.0,
///   "temp_secondary": null, "signal_strength": -70.0}`; numeric fields may be
/// null or omitted.
pub fn load_readings_json<R: Read>(reader: R) -> Result<Vec<Reading>, EngineError> {
    let readings: Vec<Reading> = serde_json::from_reader(reader)?;
    check_rows(readings)
}

/// Same as [`load_readings_json`] for an in-memory document
pub fn parse_readings_json(document: &str) -> Result<Vec<Reading>, EngineError> {
    let readings: Vec<Reading> = serde_json::from_str(document)?;
    check_rows(readings)
}

fn check_rows(readings: Vec<Reading>) -> Result<Vec<Reading>, EngineError> {
    for (index, reading) in readings.iter().enumerate() {
        validate_reading(index, reading)?;
    }
    debug!(rows = readings.len(), "Loaded readings");
    Ok(readings)
}
