//! Compass-octant labels for launch trajectories seen from the Florida range.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse ground-track direction. Only the eastern half-plane is reachable
/// from the Florida pads, so the labels stop at Northeast and Southeast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassDirection {
    #[serde(rename = "Northeast")]
    Northeast,
    #[serde(rename = "East-Northeast")]
    EastNortheast,
    #[serde(rename = "East")]
    East,
    #[serde(rename = "East-Southeast")]
    EastSoutheast,
    #[serde(rename = "Southeast")]
    Southeast,
}

impl CompassDirection {
    /// Map a launch azimuth onto its octant band. Each band includes its
    /// upper bound; anything outside 15–165° reads as Northeast.
    pub fn from_azimuth(azimuth_deg: f64) -> Self {
        match azimuth_deg {
            a if a >= 15.0 && a <= 45.0 => Self::Northeast,
            a if a > 45.0 && a <= 75.0 => Self::EastNortheast,
            a if a > 75.0 && a <= 105.0 => Self::East,
            a if a > 105.0 && a <= 135.0 => Self::EastSoutheast,
            a if a > 135.0 && a <= 165.0 => Self::Southeast,
            _ => Self::Northeast,
        }
    }

    /// Representative azimuth for the band, used when only a label is known.
    pub fn center_azimuth(self) -> f64 {
        match self {
            Self::Northeast => 40.0,
            Self::EastNortheast => 60.0,
            Self::East => 90.0,
            Self::EastSoutheast => 120.0,
            Self::Southeast => 145.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Northeast => "Northeast",
            Self::EastNortheast => "East-Northeast",
            Self::East => "East",
            Self::EastSoutheast => "East-Southeast",
            Self::Southeast => "Southeast",
        }
    }

    /// Parse free-form labels such as "Northeast", "north-east", "ENE" or "east southeast".
    pub fn parse(label: &str) -> Option<Self> {
        let compact: String = label
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_ascii_lowercase();
        match compact.as_str() {
            "northeast" | "ne" => Some(Self::Northeast),
            "eastnortheast" | "ene" => Some(Self::EastNortheast),
            "east" | "e" => Some(Self::East),
            "eastsoutheast" | "ese" => Some(Self::EastSoutheast),
            "southeast" | "se" => Some(Self::Southeast),
            _ => None,
        }
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
