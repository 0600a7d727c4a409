//! Curated launch azimuths for recurring missions and constellations.

use serde::Serialize;
use tracker_core::CompassDirection;

/// Missions whose trajectory is fixed no matter what any external source reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecialCaseKind {
    X37b,
    OrbitalTestVehicle,
    Ussf36,
}

impl SpecialCaseKind {
    const ALL: [(Self, &'static str); 3] = [
        (Self::X37b, "x-37b"),
        (Self::OrbitalTestVehicle, "otv-"),
        (Self::Ussf36, "ussf-36"),
    ];

    /// Pinned azimuth; every X-37B flight out of Florida has gone up the coast.
    pub fn azimuth(self) -> f64 {
        40.0
    }

    pub fn direction(self) -> CompassDirection {
        CompassDirection::Northeast
    }

    pub fn note(self) -> &'static str {
        match self {
            Self::X37b => "X-37B flights are pinned to a northeast trajectory",
            Self::OrbitalTestVehicle => "OTV flights are pinned to a northeast trajectory",
            Self::Ussf36 => "USSF-36 (X-37B) is pinned to a northeast trajectory",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionEntry {
    /// Slug token sequence matched against the mission slug.
    pub key: &'static str,
    pub azimuth: f64,
    pub direction: CompassDirection,
    pub note: &'static str,
}

const fn entry(
    key: &'static str,
    azimuth: f64,
    direction: CompassDirection,
    note: &'static str,
) -> MissionEntry {
    MissionEntry {
        key,
        azimuth,
        direction,
        note,
    }
}

use CompassDirection::{East, EastNortheast, Northeast, Southeast};

/// First match wins, so narrower keys come before broader ones.
pub const MISSION_DATABASE: &[MissionEntry] = &[
    entry("crew", 45.0, Northeast, "Crew Dragon to the ISS (51.6°)"),
    entry("crs", 45.0, Northeast, "Cargo Dragon to the ISS (51.6°)"),
    entry(
        "cygnus",
        45.0,
        Northeast,
        "Cygnus resupply to the ISS (51.6°)",
    ),
    entry("axiom", 45.0, Northeast, "Axiom crew to the ISS (51.6°)"),
    entry("ax", 45.0, Northeast, "Axiom crew to the ISS (51.6°)"),
    entry("starliner", 45.0, Northeast, "Starliner to the ISS (51.6°)"),
    entry("dragon", 45.0, Northeast, "Dragon to the ISS (51.6°)"),
    entry("iss", 45.0, Northeast, "ISS rendezvous (51.6°)"),
    entry(
        "starlink-group-6",
        146.0,
        Southeast,
        "Starlink 43° shell, southeast corridor",
    ),
    entry(
        "starlink-group-12",
        146.0,
        Southeast,
        "Starlink 43° shell, southeast corridor",
    ),
    entry("kuiper", 46.0, EastNortheast, "Project Kuiper 51.9° shell"),
    entry(
        "oneweb",
        35.0,
        Northeast,
        "OneWeb near-polar shell, flown up the coast",
    ),
    entry(
        "transporter",
        140.0,
        Southeast,
        "Transporter SSO rideshare, southern corridor",
    ),
    entry(
        "bandwagon",
        140.0,
        Southeast,
        "Bandwagon mid-inclination rideshare, southern corridor",
    ),
    entry("gps", 40.0, Northeast, "GPS III to MEO (55°)"),
    entry("ussf", 95.0, East, "USSF direct-to-GEO or GTO"),
    entry("sirius", 95.0, East, "SiriusXM GTO"),
    entry("sxm", 95.0, East, "SiriusXM GTO"),
    entry(
        "europa-clipper",
        90.0,
        East,
        "Europa Clipper interplanetary departure",
    ),
    entry("psyche", 90.0, East, "Psyche interplanetary departure"),
    entry("im", 90.0, East, "Intuitive Machines lunar transfer"),
    entry("blue-ghost", 90.0, East, "Blue Ghost lunar transfer"),
];

/// Special-case pins, checked before the database.
pub fn special_case(slug: &str) -> Option<SpecialCaseKind> {
    SpecialCaseKind::ALL
        .iter()
        .find(|(_, key)| slug_contains(slug, key))
        .map(|(kind, _)| *kind)
}

pub fn lookup(slug: &str) -> Option<&'static MissionEntry> {
    MISSION_DATABASE
        .iter()
        .find(|entry| slug_contains(slug, entry.key))
}

/// Whole-token containment on dash-separated slugs. A key ending in `-`
/// matches any token that starts with it ("otv-" matches "otv-7").
pub fn slug_contains(slug: &str, key: &str) -> bool {
    let padded = format!("-{slug}-");
    if key.ends_with('-') {
        padded.contains(&format!("-{key}"))
    } else {
        padded.contains(&format!("-{key}-"))
    }
}

/// Lower-case, alphanumerics only, runs of anything else collapsed to a dash.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') && !slug.is_empty() {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
