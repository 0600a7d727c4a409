//! Twilight phase classification and Earth-shadow geometry.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracker_core::constants::EARTH_RADIUS_M;

/// Sky brightness band derived from the sun's elevation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TwilightPhase {
    Day,
    Civil,
    Nautical,
    Astronomical,
    Night,
}

impl TwilightPhase {
    /// Any phase where the ground is no longer in daylight.
    pub fn is_dark(self) -> bool {
        !matches!(self, Self::Day)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Civil => "civil",
            Self::Nautical => "nautical",
            Self::Astronomical => "astronomical",
            Self::Night => "night",
        }
    }
}

impl fmt::Display for TwilightPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classify a solar elevation. Each band owns its upper boundary:
/// 0° is day, −6° is civil, −6.01° is nautical.
pub fn twilight_phase(elevation_deg: f64) -> TwilightPhase {
    if elevation_deg >= 0.0 {
        TwilightPhase::Day
    } else if elevation_deg >= -6.0 {
        TwilightPhase::Civil
    } else if elevation_deg >= -12.0 {
        TwilightPhase::Nautical
    } else if elevation_deg >= -18.0 {
        TwilightPhase::Astronomical
    } else {
        TwilightPhase::Night
    }
}

/// Height of Earth's shadow above the observer for a sun depression angle (m).
pub fn shadow_height_m(solar_elevation_deg: f64) -> f64 {
    solar_elevation_deg.abs().to_radians().tan() * EARTH_RADIUS_M
}

/// Whether an object at `altitude_m` still catches direct sunlight.
pub fn is_rocket_sunlit(altitude_m: f64, solar_elevation_deg: f64) -> bool {
    solar_elevation_deg > 0.0 || altitude_m > shadow_height_m(solar_elevation_deg)
}
