use chrono::NaiveDateTime;

use crate::error::EngineError;
use crate::readings::Reading;

/// Lowest accepted target temperature in °C
pub const TARGET_TEMP_MIN_C: f64 = 50.0;
/// Highest accepted target temperature in °C
pub const TARGET_TEMP_MAX_C: f64 = 150.0;

/// Validate that a window is ordered. Equal bounds are a valid one-instant window.
pub fn validate_time_range(start: NaiveDateTime, end: NaiveDateTime) -> Result<(), EngineError> {
    if start > end {
        return Err(EngineError::InvalidRange { start, end });
    }
    Ok(())
}

/// Validate a target temperature against the accepted input range
pub fn validate_target_temperature(target_c: f64) -> Result<(), EngineError> {
    if !target_c.is_finite() || !(TARGET_TEMP_MIN_C..=TARGET_TEMP_MAX_C).contains(&target_c) {
        return Err(EngineError::InvalidTarget(target_c));
    }
    Ok(())
}

/// Validate a reading handed over by the data source.
/// Absent values are fine; present values must be finite numbers and the beacon must be named.
pub fn validate_reading(index: usize, reading: &Reading) -> Result<(), EngineError> {
    if reading.beacon_id.trim().is_empty() {
        return Err(EngineError::InvalidReading {
            index,
            reason: "beacon_id cannot be empty".to_string(),
        });
    }

    let fields = [
        ("temp_primary", reading.temp_primary),
        ("temp_secondary", reading.temp_secondary),
        ("signal_strength", reading.signal_strength),
    ];
    for (name, value) in fields {
        if let Some(v) = value {
            if !v.is_finite() {
                return Err(EngineError::InvalidReading {
                    index,
                    reason: format!("{} must be a finite number", name),
                });
            }
        }
    }

    Ok(())
}
