use chrono::{DateTime, Duration, NaiveDateTime};

/// Timestamp layout used by the reading source ("2024-01-15 10:30:00")
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// ISO variant with a `T` separator, accepted on input
pub const TIMESTAMP_FORMAT_ISO: &str = "%Y-%m-%dT%H:%M:%S";

/// Parse a timezone-naive timestamp in either the source or ISO layout
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let trimmed = value.trim();
    NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(trimmed, TIMESTAMP_FORMAT_ISO))
}

/// Format a timestamp in the source layout
pub fn format_timestamp(timestamp: &NaiveDateTime) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Floor a timestamp onto the epoch-aligned grid of the given width.
///
/// Buckets are anchored at 1970-01-01 00:00:00, so every width that divides
/// an hour lines up with the wall clock (5 minute buckets start at :00, :05, ...).
pub fn align_to_bucket(timestamp: NaiveDateTime, width_seconds: i64) -> NaiveDateTime {
    let utc = timestamp.and_utc();
    let seconds = utc.timestamp();
    let floored = seconds - seconds.rem_euclid(width_seconds);
    // Dropping sub-second precision is intended: readings have second resolution
    DateTime::from_timestamp(floored, 0)
        .map(|dt| dt.naive_utc())
        .unwrap_or(timestamp)
}

/// Start of the bucket following the one that starts at `bucket_start`
pub fn next_bucket(bucket_start: NaiveDateTime, width_seconds: i64) -> NaiveDateTime {
    bucket_start + Duration::seconds(width_seconds)
}

/// Serde adapter writing timestamps in the source layout and reading either layout
pub mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{self, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(timestamp: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::format_timestamp(timestamp))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(hour: u32, minute: u32, second: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(hour, minute, second)
            .unwrap()
    }

    #[test]
    fn test_parse_source_format() {
        let ts = parse_timestamp("2024-01-15 10:30:00").unwrap();
        assert_eq!(ts, at(10, 30, 0));
    }

    #[test]
    fn test_parse_iso_format() {
        let ts = parse_timestamp("2024-01-15T10:30:05").unwrap();
        assert_eq!(ts, at(10, 30, 5));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_err());
        assert!(parse_timestamp("2024-01-15").is_err());
    }

    #[test]
    fn test_format_round_trip() {
        let ts = at(8, 5, 9);
        assert_eq!(format_timestamp(&ts), "2024-01-15 08:05:09");
        assert_eq!(parse_timestamp(&format_timestamp(&ts)).unwrap(), ts);
    }

    #[test]
    fn test_align_five_minutes() {
        assert_eq!(align_to_bucket(at(10, 3, 59), 300), at(10, 0, 0));
        assert_eq!(align_to_bucket(at(10, 5, 0), 300), at(10, 5, 0));
        assert_eq!(align_to_bucket(at(10, 59, 59), 300), at(10, 55, 0));
    }

    #[test]
    fn test_align_hour() {
        assert_eq!(align_to_bucket(at(10, 30, 0), 3600), at(10, 0, 0));
        assert_eq!(align_to_bucket(at(23, 59, 59), 3600), at(23, 0, 0));
    }

    #[test]
    fn test_align_before_epoch() {
        let ts = NaiveDate::from_ymd_opt(1969, 12, 31)
            .unwrap()
            .and_hms_opt(23, 58, 30)
            .unwrap();
        let expected = NaiveDate::from_ymd_opt(1969, 12, 31)
            .unwrap()
            .and_hms_opt(23, 55, 0)
            .unwrap();
        assert_eq!(align_to_bucket(ts, 300), expected);
    }

    #[test]
    fn test_next_bucket() {
        assert_eq!(next_bucket(at(10, 55, 0), 300), at(11, 0, 0));
    }
}
