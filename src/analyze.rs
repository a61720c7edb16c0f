// Analyze binary entry point

#[path = "analyze/config.rs"]
mod config;

#[path = "analyze/error.rs"]
mod error;

use anyhow::Context;
use std::fs::File;
use std::io::BufReader;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use beacon_analyzer::{analyze, load_readings_json, AnalysisReport};
use config::Config;
use error::AppError;

fn run(config: &Config) -> Result<AnalysisReport, AppError> {
    let path = config.readings_path.display().to_string();
    let file = File::open(&config.readings_path).map_err(|source| AppError::Io {
        path: path.clone(),
        source,
    })?;

    let readings = load_readings_json(BufReader::new(file))?;
    info!(path = %path, rows = readings.len(), "Readings loaded");

    Ok(analyze(&readings, &config.request())?)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    info!("Beacon analyzer starting");

    let outcome = Config::from_env()
        .map_err(AppError::from)
        .and_then(|config| run(&config));

    match outcome {
        Ok(report) => {
            let json =
                serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
            println!("{}", json);
            Ok(())
        }
        Err(app_error) => {
            error!(error = %app_error, "Analysis failed");
            let json = app_error
                .to_response()
                .to_json_pretty()
                .context("Failed to serialize error response")?;
            println!("{}", json);
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn config_for(path: PathBuf) -> Config {
        let env = [
            ("READINGS_PATH", path.display().to_string()),
            ("RANGE_START", "2024-01-01 10:00:00".to_string()),
            ("RANGE_END", "2024-01-01 10:05:00".to_string()),
        ];
        Config::from_lookup(|k| env.iter().find(|(name, _)| *name == k).map(|(_, v)| v.clone()))
            .unwrap()
    }

    #[test]
    fn test_run_reads_file_and_analyzes() {
        let path = std::env::temp_dir().join(format!("beacon-analyze-{}.json", std::process::id()));
        let mut file = File::create(&path).unwrap();
        write!(
            file,
            r#"[
                {{"timestamp": "2024-01-01 10:00:00", "beacon_id": "B1", "temp_primary": 110, "temp_secondary": 112, "signal_strength": -70}},
                {{"timestamp": "2024-01-01 10:03:00", "beacon_id": "B1", "temp_primary": 120, "temp_secondary": 118, "signal_strength": -72}}
            ]"#
        )
        .unwrap();
        drop(file);

        let report = run(&config_for(path.clone())).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(report.summary.beacons().len(), 1);
        assert_eq!(report.beacons[0].series.points[0].median_signal_strength, Some(-71.0));
    }

    #[test]
    fn test_run_missing_file() {
        let result = run(&config_for(PathBuf::from("/nonexistent/readings.json")));
        assert!(matches!(result, Err(AppError::Io { .. })));
    }
}
