//! Orbit-family classification and the inclination-to-azimuth relation.

use serde::Serialize;

/// Launch azimuth used for retrograde and sun-synchronous targets. Range
/// safety keeps Florida SSO flights on the southern corridor over water.
pub const RETROGRADE_AZIMUTH_DEG: f64 = 140.0;

/// Coarse orbit family inferred from mission and orbit names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrbitFamily {
    /// Polar or sun-synchronous.
    Polar,
    Gto,
    Interplanetary,
    Iss,
    Meo,
    Starlink,
    Leo,
    Unknown,
}

impl OrbitFamily {
    pub fn label(self) -> &'static str {
        match self {
            Self::Polar => "Polar/SSO",
            Self::Gto => "GTO",
            Self::Interplanetary => "Interplanetary",
            Self::Iss => "ISS",
            Self::Meo => "MEO",
            Self::Starlink => "Starlink",
            Self::Leo => "LEO",
            Self::Unknown => "Unknown",
        }
    }

    /// Representative orbit for the family.
    pub fn estimate(self) -> OrbitEstimate {
        let (inclination_deg, apogee_km, perigee_km) = match self {
            Self::Polar => (97.5, 550.0, 550.0),
            Self::Gto => (28.5, 35_786.0, 200.0),
            Self::Interplanetary => (28.5, 400_000.0, 200.0),
            Self::Iss => (51.64, 420.0, 410.0),
            Self::Meo => (55.0, 20_200.0, 20_200.0),
            Self::Starlink => (53.0, 550.0, 540.0),
            Self::Leo => (45.0, 500.0, 400.0),
            Self::Unknown => (51.6, 400.0, 400.0),
        };
        OrbitEstimate {
            family: self,
            inclination_deg,
            apogee_km,
            perigee_km,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrbitEstimate {
    pub family: OrbitFamily,
    pub inclination_deg: f64,
    pub apogee_km: f64,
    pub perigee_km: f64,
}

/// Classify lower-cased mission/orbit text into an orbit family.
///
/// Checked from the most restrictive family down, so "Starlink ... SSO"
/// reads as polar and "Crew Dragon ... LEO" reads as ISS.
pub fn classify_orbit(text: &str) -> OrbitFamily {
    let lower = text.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    let has = |words: &[&str]| words.iter().any(|w| tokens.contains(w));
    let phrase = |phrases: &[&str]| phrases.iter().any(|p| lower.contains(p));

    if has(&["sso", "polar", "transporter"]) || phrase(&["sun-synchronous", "sun synchronous"]) {
        OrbitFamily::Polar
    } else if has(&[
        "gto",
        "geo",
        "gso",
        "geostationary",
        "geosynchronous",
        "supersynchronous",
    ]) {
        OrbitFamily::Gto
    } else if has(&[
        "heliocentric",
        "interplanetary",
        "lunar",
        "tli",
        "moon",
        "mars",
        "selenocentric",
        "escape",
    ]) {
        OrbitFamily::Interplanetary
    } else if has(&[
        "iss",
        "dragon",
        "crew",
        "cygnus",
        "cargo",
        "crs",
        "axiom",
        "starliner",
    ]) {
        OrbitFamily::Iss
    } else if has(&["meo", "gps", "galileo", "o3b"]) {
        OrbitFamily::Meo
    } else if has(&["starlink"]) {
        OrbitFamily::Starlink
    } else if has(&["leo", "kuiper"]) || phrase(&["low earth orbit"]) {
        OrbitFamily::Leo
    } else {
        OrbitFamily::Unknown
    }
}

/// Launch azimuth for a target inclination from a pad at `launch_latitude_deg`:
/// `acos(cos i / cos φ)` for prograde targets. A ratio at or above one means the
/// inclination is at or below the pad latitude, reached by flying due east.
pub fn launch_azimuth(inclination_deg: f64, launch_latitude_deg: f64) -> f64 {
    if inclination_deg >= 90.0 {
        return RETROGRADE_AZIMUTH_DEG;
    }
    let ratio = inclination_deg.to_radians().cos() / launch_latitude_deg.to_radians().cos();
    if ratio >= 1.0 {
        90.0
    } else {
        ratio.max(-1.0).acos().to_degrees()
    }
}
