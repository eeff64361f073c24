//! Engine Configuration Module
//!
//! Every tunable the pipelines depend on (activity thresholds, smoothing
//! window, alarm channel and benign-code filter, rated power and energy
//! on-threshold) lives here as an operator-editable TOML value. Defaults
//! match the constants the reports were originally calibrated with, so an
//! absent config file changes nothing.
//!
//! ## Loading Order
//!
//! 1. `CNC_INSIGHT_CONFIG` environment variable (path to TOML file)
//! 2. `engine_config.toml` in the current working directory
//! 3. Built-in defaults
//!
//! The config is a plain value handed to [`crate::service::ReportService`];
//! there is no process-global. Tests and callers construct and override it
//! freely.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for the report engine.
///
/// Load with [`EngineConfig::load`], or build a default and override fields
/// in code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// State classification tuning
    #[serde(default)]
    pub activity: ActivityConfig,

    /// Alarm channel and noise suppression
    #[serde(default)]
    pub alarms: AlarmConfig,

    /// Energy integration tuning
    #[serde(default)]
    pub energy: EnergyConfig,
}

impl EngineConfig {
    /// Load configuration using the standard search order:
    /// 1. `$CNC_INSIGHT_CONFIG` environment variable
    /// 2. `./engine_config.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("CNC_INSIGHT_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded engine config from CNC_INSIGHT_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from CNC_INSIGHT_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "CNC_INSIGHT_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("engine_config.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded engine config from ./engine_config.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./engine_config.toml, using defaults");
                }
            }
        }

        info!("No engine_config.toml found, using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all tunables for internal consistency.
    ///
    /// Collects every violation instead of stopping at the first, so a
    /// misconfigured file is reported in one pass.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        if self.activity.smoothing_window == 0 {
            errors.push("activity.smoothing_window must be >= 1".to_string());
        }
        let (low, mid) = self.activity.bounds();
        if !low.is_finite() || !mid.is_finite() {
            errors.push(format!(
                "activity thresholds must be finite (got low_max={low}, intermediate_max={mid})"
            ));
        } else if low >= mid {
            errors.push(format!(
                "activity.low_max ({low:.1}) must be less than activity.intermediate_max ({mid:.1})"
            ));
        }

        if !self.energy.rated_power_kw.is_finite() || self.energy.rated_power_kw <= 0.0 {
            errors.push(format!(
                "energy.rated_power_kw must be positive (got {})",
                self.energy.rated_power_kw
            ));
        }
        if !self.energy.on_threshold_pct.is_finite()
            || !(0.0..100.0).contains(&self.energy.on_threshold_pct)
        {
            errors.push(format!(
                "energy.on_threshold_pct must be in [0, 100) (got {})",
                self.energy.on_threshold_pct
            ));
        }
        if self.energy.load_variable.is_empty() {
            errors.push("energy.load_variable must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Activity classification
// ============================================================================

/// Named threshold profile for activity classification.
///
/// The source data was calibrated twice and the two profiles disagree:
/// `smoothed` (14 / 20) was fitted against the windowed moving average,
/// `kmeans` (17 / 24) against raw per-second counts before smoothing
/// existed. `smoothed` is the default because it matches the smoothing this
/// engine always applies; `kmeans` is retained for comparison until the
/// domain team retires one of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityProfile {
    #[default]
    Smoothed,
    KMeans,
    /// Bounds taken from `low_max` / `intermediate_max` fields.
    Custom,
}

/// State classification tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityConfig {
    /// Threshold profile to classify smoothed counts with.
    #[serde(default)]
    pub profile: ActivityProfile,

    /// Moving-average window size in buckets (seconds). The first
    /// `smoothing_window - 1` buckets of each day are warm-up and are not
    /// classified.
    #[serde(default = "default_smoothing_window")]
    pub smoothing_window: usize,

    /// Upper bound (inclusive) for Low Activity under the `custom` profile.
    #[serde(default = "default_low_max")]
    pub low_max: f64,

    /// Upper bound (inclusive) for Intermediate Activity under the `custom`
    /// profile.
    #[serde(default = "default_intermediate_max")]
    pub intermediate_max: f64,
}

impl ActivityConfig {
    /// Resolve the active (low_max, intermediate_max) pair.
    pub fn bounds(&self) -> (f64, f64) {
        match self.profile {
            ActivityProfile::Smoothed => (14.0, 20.0),
            ActivityProfile::KMeans => (17.0, 24.0),
            ActivityProfile::Custom => (self.low_max, self.intermediate_max),
        }
    }
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            profile: ActivityProfile::default(),
            smoothing_window: default_smoothing_window(),
            low_max: default_low_max(),
            intermediate_max: default_intermediate_max(),
        }
    }
}

fn default_smoothing_window() -> usize {
    15
}

fn default_low_max() -> f64 {
    14.0
}

fn default_intermediate_max() -> f64 {
    20.0
}

// ============================================================================
// Alarms
// ============================================================================

/// Alarm channel selection and noise suppression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmConfig {
    /// String-channel variable id carrying the raw alarm log.
    #[serde(default = "default_alarm_channel")]
    pub channel: u32,

    /// Codes considered operational noise. A raw line containing any of
    /// these is discarded before decoding, so benign codes can never reach
    /// incident output, and they do not supersede real occurrences either.
    #[serde(default = "default_benign_codes")]
    pub benign_codes: Vec<String>,
}

impl Default for AlarmConfig {
    fn default() -> Self {
        Self {
            channel: default_alarm_channel(),
            benign_codes: default_benign_codes(),
        }
    }
}

fn default_alarm_channel() -> u32 {
    447
}

fn default_benign_codes() -> Vec<String> {
    [
        "PLC00054", "PLC00010", "PLC01005", "PLC00499", "PLC00051", "PLC00050", "PLC00474",
        "PLC00475", "2a8-0003", "130-019c", "PLC00052", "PLC00761",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}

// ============================================================================
// Energy
// ============================================================================

/// Energy integration tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyConfig {
    /// Nameplate power of the monitored drive (kW). Energy is estimated as
    /// load% of this constant: an approximation, not a power measurement.
    #[serde(default = "default_rated_power_kw")]
    pub rated_power_kw: f64,

    /// Load percentage above which a sample counts as "on".
    #[serde(default)]
    pub on_threshold_pct: f64,

    /// Name of the percentage-load variable in the store.
    #[serde(default = "default_load_variable")]
    pub load_variable: String,
}

impl Default for EnergyConfig {
    fn default() -> Self {
        Self {
            rated_power_kw: default_rated_power_kw(),
            on_threshold_pct: 0.0,
            load_variable: default_load_variable(),
        }
    }
}

fn default_rated_power_kw() -> f64 {
    15.0
}

fn default_load_variable() -> String {
    "MANDRINO_CONSUMO_VISUALIZADO".to_string()
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(PathBuf, std::io::Error),
    Parse(PathBuf, toml::de::Error),
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(path, e) => write!(f, "Config I/O error ({}): {}", path.display(), e),
            ConfigError::Parse(path, e) => {
                write!(f, "Config parse error ({}): {}", path.display(), e)
            }
            ConfigError::Validation(errors) => {
                writeln!(f, "Config validation failed:")?;
                for e in errors {
                    writeln!(f, "  - {}", e)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_original_constants() {
        let config = EngineConfig::default();
        assert_eq!(config.activity.smoothing_window, 15);
        assert_eq!(config.activity.bounds(), (14.0, 20.0));
        assert_eq!(config.alarms.channel, 447);
        assert_eq!(config.alarms.benign_codes.len(), 12);
        assert!((config.energy.rated_power_kw - 15.0).abs() < f64::EPSILON);
        assert!(config.energy.on_threshold_pct.abs() < f64::EPSILON);
        assert_eq!(config.energy.load_variable, "MANDRINO_CONSUMO_VISUALIZADO");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_profile_bounds() {
        let mut config = EngineConfig::default();
        config.activity.profile = ActivityProfile::KMeans;
        assert_eq!(config.activity.bounds(), (17.0, 24.0));

        config.activity.profile = ActivityProfile::Custom;
        config.activity.low_max = 5.0;
        config.activity.intermediate_max = 9.0;
        assert_eq!(config.activity.bounds(), (5.0, 9.0));
    }

    #[test]
    fn test_validation_rejects_inverted_thresholds() {
        let mut config = EngineConfig::default();
        config.activity.profile = ActivityProfile::Custom;
        config.activity.low_max = 20.0;
        config.activity.intermediate_max = 10.0;

        let err = config.validate().unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("low_max"), "unexpected message: {msg}");
    }

    #[test]
    fn test_validation_collects_all_errors() {
        let mut config = EngineConfig::default();
        config.activity.smoothing_window = 0;
        config.energy.rated_power_kw = -1.0;
        config.energy.load_variable = String::new();

        match config.validate() {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 3),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_toml_round_trip_with_partial_file() {
        let toml_str = r#"
            [activity]
            profile = "kmeans"

            [energy]
            rated_power_kw = 22.5
        "#;
        let config: EngineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.activity.profile, ActivityProfile::KMeans);
        assert_eq!(config.activity.smoothing_window, 15);
        assert!((config.energy.rated_power_kw - 22.5).abs() < f64::EPSILON);
        assert_eq!(config.alarms.channel, 447);
    }
}
