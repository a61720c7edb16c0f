use chrono::NaiveDateTime;
use std::path::PathBuf;

use beacon_analyzer::{parse_timestamp, AnalysisRequest, BucketWidth, DEFAULT_TARGET_TEMP_C};

/// Configuration for one analyze run
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// JSON file holding the reading set
    pub readings_path: PathBuf,
    /// Window start, inclusive
    pub start: NaiveDateTime,
    /// Window end, inclusive
    pub end: NaiveDateTime,
    /// Beacons to analyse; empty means all
    pub beacon_ids: Vec<String>,
    /// Reference temperature for classification
    pub target_temp_c: f64,
    /// Resampling bucket width
    pub bucket_width: BucketWidth,
}

impl Config {
    /// Create a new Config instance from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Create a Config from any variable lookup (environment, map, ...)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
        };

        let readings_path = PathBuf::from(required("READINGS_PATH")?);
        let start = parse_time("RANGE_START", &required("RANGE_START")?)?;
        let end = parse_time("RANGE_END", &required("RANGE_END")?)?;

        let beacon_ids = lookup("BEACON_IDS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let target_temp_c = match lookup("TARGET_TEMP_C") {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidValue("TARGET_TEMP_C".to_string(), raw))?,
            None => DEFAULT_TARGET_TEMP_C,
        };

        let bucket_width = match lookup("RESAMPLE_WINDOW") {
            Some(raw) => raw
                .parse::<BucketWidth>()
                .map_err(|_| ConfigError::InvalidValue("RESAMPLE_WINDOW".to_string(), raw))?,
            None => BucketWidth::default(),
        };

        Ok(Config {
            readings_path,
            start,
            end,
            beacon_ids,
            target_temp_c,
            bucket_width,
        })
    }

    /// Analysis request described by this configuration
    pub fn request(&self) -> AnalysisRequest {
        AnalysisRequest::new(self.start, self.end)
            .with_beacons(self.beacon_ids.clone())
            .with_target(self.target_temp_c)
            .with_bucket_width(self.bucket_width)
    }
}

fn parse_time(name: &str, raw: &str) -> Result<NaiveDateTime, ConfigError> {
    parse_timestamp(raw).map_err(|_| ConfigError::InvalidValue(name.to_string(), raw.to_string()))
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for environment variable {0}: {1:?}")]
    InvalidValue(String, String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn base() -> HashMap<String, String> {
        vars(&[
            ("READINGS_PATH", "/tmp/readings.json"),
            ("RANGE_START", "2024-01-01 10:00:00"),
            ("RANGE_END", "2024-01-01 18:00:00"),
        ])
    }

    fn at(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_config_defaults() {
        let env = base();
        let config = Config::from_lookup(|k| env.get(k).cloned()).unwrap();

        assert_eq!(config.readings_path, PathBuf::from("/tmp/readings.json"));
        assert_eq!(config.start, at(10));
        assert_eq!(config.end, at(18));
        assert!(config.beacon_ids.is_empty());
        assert_eq!(config.target_temp_c, 115.0);
        assert_eq!(config.bucket_width, BucketWidth::FiveMinutes);
    }

    #[test]
    fn test_config_optional_values() {
        let mut env = base();
        env.insert("BEACON_IDS".to_string(), "B1, B2,,B3 ".to_string());
        env.insert("TARGET_TEMP_C".to_string(), "120.5".to_string());
        env.insert("RESAMPLE_WINDOW".to_string(), "1H".to_string());

        let config = Config::from_lookup(|k| env.get(k).cloned()).unwrap();
        assert_eq!(config.beacon_ids, vec!["B1", "B2", "B3"]);
        assert_eq!(config.target_temp_c, 120.5);
        assert_eq!(config.bucket_width, BucketWidth::OneHour);

        let request = config.request();
        assert_eq!(request.beacon_ids.len(), 3);
        assert_eq!(request.bucket_width, BucketWidth::OneHour);
    }

    #[test]
    fn test_config_missing_vars() {
        let env: HashMap<String, String> = HashMap::new();
        let result = Config::from_lookup(|k| env.get(k).cloned());

        if let Err(ConfigError::MissingEnvVar(var)) = result {
            assert_eq!(var, "READINGS_PATH");
        } else {
            panic!("Expected MissingEnvVar error");
        }
    }

    #[test]
    fn test_config_invalid_values() {
        let mut env = base();
        env.insert("RESAMPLE_WINDOW".to_string(), "7min".to_string());
        let result = Config::from_lookup(|k| env.get(k).cloned());
        assert!(matches!(result, Err(ConfigError::InvalidValue(ref name, _)) if name == "RESAMPLE_WINDOW"));

        let mut env = base();
        env.insert("RANGE_END".to_string(), "tomorrow".to_string());
        let result = Config::from_lookup(|k| env.get(k).cloned());
        assert!(matches!(result, Err(ConfigError::InvalidValue(ref name, _)) if name == "RANGE_END"));
    }
}
