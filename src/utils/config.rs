//! Benchmark settings
//!
//! Built-in defaults reproduce the fixed scenario sequence. A JSON file named
//! by `INTEROP_BENCH_SETTINGS` may override any subset of them; nothing is
//! read or written otherwise.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{HarnessError, Result};
use crate::ui::report::TimeUnit;

/// Environment variable pointing at an optional settings file
pub const SETTINGS_ENV: &str = "INTEROP_BENCH_SETTINGS";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "CallIterations", deserialize_with = "validate_positive_u64")]
    pub call_iterations: u64,
    #[serde(rename = "StructCallIterations", deserialize_with = "validate_positive_u64")]
    pub struct_call_iterations: u64,
    #[serde(rename = "CreationIterations", deserialize_with = "validate_positive_u64")]
    pub creation_iterations: u64,
    #[serde(rename = "StringIterations", deserialize_with = "validate_positive_u64")]
    pub string_iterations: u64,
    #[serde(rename = "MathIterations", deserialize_with = "validate_positive_u64")]
    pub math_iterations: u64,
    #[serde(rename = "ArrayIterations", deserialize_with = "validate_positive_u64")]
    pub array_iterations: u64,
    /// Zero disables warm-up
    #[serde(rename = "WarmupIterations")]
    pub warmup_iterations: u64,
    #[serde(rename = "ConsistencyTrials", deserialize_with = "validate_positive_u32")]
    pub consistency_trials: u32,
    #[serde(rename = "CallsPerTrial", deserialize_with = "validate_positive_u64")]
    pub calls_per_trial: u64,
    #[serde(rename = "TimeUnit")]
    pub time_unit: TimeUnit,
    #[serde(rename = "ShowProgress")]
    pub show_progress: bool,
    #[serde(rename = "CsvExport")]
    pub csv_export: Option<PathBuf>,
    #[serde(rename = "JsonExport")]
    pub json_export: Option<PathBuf>,
}

fn validate_positive_u64<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = u64::deserialize(deserializer)?;
    if value > 0 {
        Ok(value)
    } else {
        Err(serde::de::Error::custom("Value must be positive"))
    }
}

fn validate_positive_u32<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = u32::deserialize(deserializer)?;
    if value > 0 {
        Ok(value)
    } else {
        Err(serde::de::Error::custom("Value must be positive"))
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            call_iterations: 10_000,
            struct_call_iterations: 10_000,
            creation_iterations: 5_000,
            string_iterations: 1_000,
            math_iterations: 1_000,
            array_iterations: 1_000,
            warmup_iterations: 100,
            consistency_trials: 10,
            calls_per_trial: 1_000,
            time_unit: TimeUnit::Microseconds,
            show_progress: true,
            csv_export: None,
            json_export: None,
        }
    }
}

impl Settings {
    /// Defaults, or the file named by `INTEROP_BENCH_SETTINGS` when set.
    pub fn load_from_env() -> Result<Self> {
        match env::var_os(SETTINGS_ENV) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let settings: Settings =
            serde_json::from_str(&content).map_err(|source| HarnessError::Settings {
                path: path.to_path_buf(),
                source,
            })?;
        settings.validate()?;
        info!(path = %path.display(), "loaded benchmark settings");
        Ok(settings)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let settings: Settings = serde_json::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Re-check counts for settings built in code rather than parsed.
    pub fn validate(&self) -> Result<()> {
        let counts = [
            ("CallIterations", self.call_iterations),
            ("StructCallIterations", self.struct_call_iterations),
            ("CreationIterations", self.creation_iterations),
            ("StringIterations", self.string_iterations),
            ("MathIterations", self.math_iterations),
            ("ArrayIterations", self.array_iterations),
            ("ConsistencyTrials", u64::from(self.consistency_trials)),
            ("CallsPerTrial", self.calls_per_trial),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(HarnessError::invalid_configuration(format!(
                    "{} must be positive",
                    name
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_fixed_sequence() {
        let settings = Settings::default();
        assert_eq!(settings.call_iterations, 10_000);
        assert_eq!(settings.creation_iterations, 5_000);
        assert_eq!(settings.string_iterations, 1_000);
        assert_eq!(settings.warmup_iterations, 100);
        assert_eq!(settings.consistency_trials, 10);
        assert_eq!(settings.calls_per_trial, 1_000);
        settings.validate().unwrap();
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings =
            Settings::from_json(r#"{ "CallIterations": 500, "TimeUnit": "ns", "WarmupIterations": 0 }"#)
                .unwrap();
        assert_eq!(settings.call_iterations, 500);
        assert_eq!(settings.warmup_iterations, 0);
        assert_eq!(settings.time_unit, TimeUnit::Nanoseconds);
        assert_eq!(settings.struct_call_iterations, 10_000);
        assert!(settings.csv_export.is_none());
    }

    #[test]
    fn zero_counts_are_rejected_when_parsing() {
        let err = Settings::from_json(r#"{ "ConsistencyTrials": 0 }"#).unwrap_err();
        assert!(err.to_string().contains("Value must be positive"));
    }

    #[test]
    fn zero_counts_are_rejected_in_code() {
        let settings = Settings {
            calls_per_trial: 0,
            ..Settings::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.is_invalid_configuration());
        assert!(err.to_string().contains("CallsPerTrial"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Settings::load(Path::new("/nonexistent/interop_bench.json")).unwrap_err();
        assert!(matches!(err, HarnessError::Io(_)));
    }

    #[test]
    fn malformed_file_names_the_path() {
        let path = env::temp_dir().join(format!("interop_bench_settings_{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        let err = Settings::load(&path).unwrap_err();
        fs::remove_file(&path).ok();
        assert!(matches!(err, HarnessError::Settings { .. }));
    }
}
