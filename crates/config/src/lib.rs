//! Configuration models and loaders for the Bermuda rocket tracker.
//!
//! Every section defaults to the values the tracker ships with, so a config
//! file only needs to name what it overrides.

use std::fs::File;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracker_core::Observer;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub observer: Observer,
    pub visibility: VisibilityParams,
    pub plume: PlumeParams,
    pub cache: CachePolicy,
    pub sources: SourcesConfig,
    pub logging: LogConfig,
}

/// Tunables for the visibility verdict. The numbers are empirically tuned;
/// only their ordering carries meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityParams {
    pub thresholds: LikelihoodThresholds,
    pub eligible_region: LaunchRegion,
    pub orbit_scores: OrbitScores,
    pub night_bonus: f64,
    pub twilight_bonus: f64,
    pub daylight_penalty: f64,
    /// Added when the trajectory has a visibility window at all.
    pub window_bonus: f64,
    /// Scaled by window duration up to `window_full_duration_s`.
    pub window_duration_bonus: f64,
    pub window_full_duration_s: f64,
    pub close_approach_bonus: f64,
    pub close_approach_km: f64,
    /// Subtracted when a trajectory is known but never clears the horizon.
    pub no_window_penalty: f64,
    /// Score change below which a delay counts as no impact.
    pub minor_change_threshold: f64,
}

impl Default for VisibilityParams {
    fn default() -> Self {
        Self {
            thresholds: LikelihoodThresholds::default(),
            eligible_region: LaunchRegion::default(),
            orbit_scores: OrbitScores::default(),
            night_bonus: 0.35,
            twilight_bonus: 0.3,
            daylight_penalty: 0.25,
            window_bonus: 0.1,
            window_duration_bonus: 0.05,
            window_full_duration_s: 300.0,
            close_approach_bonus: 0.05,
            close_approach_km: 800.0,
            no_window_penalty: 0.2,
            minor_change_threshold: 0.05,
        }
    }
}

/// Score cut-offs; anything above zero and below `medium` is `low`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LikelihoodThresholds {
    pub high: f64,
    pub medium: f64,
}

impl Default for LikelihoodThresholds {
    fn default() -> Self {
        Self {
            high: 0.7,
            medium: 0.45,
        }
    }
}

/// Bounding box of launch sites whose ascents can reach Bermuda's sky.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchRegion {
    pub name: String,
    pub min_latitude: f64,
    pub max_latitude: f64,
    pub min_longitude: f64,
    pub max_longitude: f64,
}

impl Default for LaunchRegion {
    fn default() -> Self {
        Self {
            name: "Florida".to_string(),
            min_latitude: 24.0,
            max_latitude: 31.5,
            min_longitude: -88.0,
            max_longitude: -79.0,
        }
    }
}

impl LaunchRegion {
    pub fn contains(&self, latitude: f64, longitude: f64) -> bool {
        (self.min_latitude..=self.max_latitude).contains(&latitude)
            && (self.min_longitude..=self.max_longitude).contains(&longitude)
    }
}

/// Base score per orbit family before time-of-day and trajectory adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrbitScores {
    pub gto: f64,
    pub interplanetary: f64,
    pub iss: f64,
    pub meo: f64,
    pub starlink: f64,
    pub leo: f64,
}

impl Default for OrbitScores {
    fn default() -> Self {
        Self {
            gto: 0.6,
            interplanetary: 0.6,
            iss: 0.5,
            meo: 0.5,
            starlink: 0.45,
            leo: 0.4,
        }
    }
}

/// Tunables for plume illumination prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlumeParams {
    pub ascent: PlumeAscent,
    pub step_s: f64,
    pub duration_s: f64,
    /// Plume diameter at sea-level pressure (km).
    pub base_plume_size_km: f64,
    pub scale_height_km: f64,
    pub weights: QualityWeights,
    /// Illuminated time that earns the full duration score (s).
    pub full_duration_s: f64,
    /// Plume size that earns the full size score (km).
    pub full_size_km: f64,
}

impl Default for PlumeParams {
    fn default() -> Self {
        Self {
            ascent: PlumeAscent::default(),
            step_s: 10.0,
            duration_s: 600.0,
            base_plume_size_km: 5.0,
            scale_height_km: 8.5,
            weights: QualityWeights::default(),
            full_duration_s: 300.0,
            full_size_km: 20.0,
        }
    }
}

/// Altitude-only ascent used by the plume model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlumeAscent {
    pub meco_s: f64,
    pub meco_altitude_km: f64,
    pub seco_s: f64,
    pub seco_altitude_km: f64,
    pub first_stage_exponent: f64,
    pub second_stage_exponent: f64,
}

impl Default for PlumeAscent {
    fn default() -> Self {
        Self {
            meco_s: 150.0,
            meco_altitude_km: 70.0,
            seco_s: 510.0,
            seco_altitude_km: 210.0,
            first_stage_exponent: 1.8,
            second_stage_exponent: 1.2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityWeights {
    pub intensity: f64,
    pub duration: f64,
    pub twilight: f64,
    pub size: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        Self {
            intensity: 0.35,
            duration: 0.25,
            twilight: 0.2,
            size: 0.2,
        }
    }
}

/// Trajectory cache lifetimes keyed by how far away liftoff is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CachePolicy {
    /// Checked in order; the first tier whose threshold is exceeded applies.
    pub tiers: Vec<TtlTier>,
    /// Lifetime once liftoff is closer than every tier.
    pub floor_ttl_minutes: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TtlTier {
    pub min_hours_before_launch: f64,
    pub ttl_minutes: i64,
}

impl Default for CachePolicy {
    fn default() -> Self {
        let tier = |min_hours_before_launch, ttl_minutes| TtlTier {
            min_hours_before_launch,
            ttl_minutes,
        };
        Self {
            tiers: vec![
                tier(7.0 * 24.0, 24 * 60),
                tier(24.0, 6 * 60),
                tier(6.0, 2 * 60),
                tier(2.0, 60),
            ],
            floor_ttl_minutes: 30,
        }
    }
}

/// Upstream endpoints. `None` disables the corresponding tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub flightclub_base_url: Option<String>,
    pub flightclub_api_key: Option<String>,
    pub solar_api_base_url: Option<String>,
    /// YAML or JSON file of trajectory-graphic hints keyed by launch id.
    pub direction_hints_path: Option<PathBuf>,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            flightclub_base_url: None,
            flightclub_api_key: None,
            solar_api_base_url: None,
            direction_hints_path: None,
            timeout_secs: 15,
            user_agent: "bermuda-rocket-tracker".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Pretty,
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    /// Extra `EnvFilter` directives, e.g. `tracker_trajectory=debug`.
    pub filter: Option<String>,
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Load a configuration file; `.toml` files are read as TOML, anything else as YAML.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<TrackerConfig, ConfigError> {
    let path = path.as_ref();
    if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        from_toml_str(&contents)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

pub fn from_toml_str(contents: &str) -> Result<TrackerConfig, ConfigError> {
    Ok(toml::from_str(contents)?)
}

pub fn from_yaml_str(contents: &str) -> Result<TrackerConfig, ConfigError> {
    Ok(serde_yaml::from_str(contents)?)
}
