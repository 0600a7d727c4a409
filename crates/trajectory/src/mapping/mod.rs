//! Mission metadata to launch azimuth and compass octant.
//!
//! Resolution goes through [`MissionDirective`] so the precedence is visible in
//! one `match`: pinned special cases, then the curated database, then the
//! Starlink group pattern, then inclination-based orbital mechanics.

pub mod database;
pub mod orbital;

use serde::Serialize;
use tracker_core::{CompassDirection, LaunchRecord};

pub use database::{MissionEntry, SpecialCaseKind, slugify};
pub use orbital::{OrbitEstimate, OrbitFamily, classify_orbit, launch_azimuth};

/// Latitude assumed when a launch has no usable pad coordinates (Cape Canaveral).
pub const DEFAULT_PAD_LATITUDE: f64 = 28.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingConfidence {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MappingSource {
    SpecialCase,
    Database,
    Pattern,
    OrbitalMechanics,
}

/// Starlink launches identified by name; `group` is the shell number when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StarlinkGroup {
    pub group: Option<u32>,
}

impl StarlinkGroup {
    /// Shells 6–9 fly the 43° inclination out of the southeast corridor; the
    /// rest climb up the coast.
    pub fn azimuth(self) -> f64 {
        match self.group {
            Some(6..=9) => 146.0,
            _ => 45.0,
        }
    }
}

/// How a mapping was decided, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "kebab-case")]
pub enum MissionDirective {
    SpecialCase(SpecialCaseKind),
    DatabaseHit(&'static MissionEntry),
    PatternMatch(StarlinkGroup),
    OrbitalMechanicsFallback(OrbitEstimate),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryMapping {
    pub azimuth: f64,
    pub direction: CompassDirection,
    pub confidence: MappingConfidence,
    pub source: MappingSource,
    pub directive: MissionDirective,
    pub note: String,
}

impl TrajectoryMapping {
    pub fn is_high_confidence(&self) -> bool {
        self.confidence == MappingConfidence::High
    }
}

/// Pick the directive for a launch. Name and mission name are both slugged and
/// matched; the orbit name only feeds the orbital-mechanics classifier.
pub fn resolve_directive(launch: &LaunchRecord) -> MissionDirective {
    let slug = slugify(&format!("{} {}", launch.name, launch.mission_name()));

    if let Some(kind) = database::special_case(&slug) {
        return MissionDirective::SpecialCase(kind);
    }
    if let Some(entry) = database::lookup(&slug) {
        return MissionDirective::DatabaseHit(entry);
    }
    if let Some(group) = starlink_group(&slug) {
        return MissionDirective::PatternMatch(group);
    }
    MissionDirective::OrbitalMechanicsFallback(classify_orbit(&launch.search_text()).estimate())
}

/// Launch azimuth and direction for a launch record.
pub fn get_trajectory_mapping(launch: &LaunchRecord) -> TrajectoryMapping {
    let directive = resolve_directive(launch);
    let (azimuth, confidence, source, note) = match directive {
        MissionDirective::SpecialCase(kind) => (
            kind.azimuth(),
            MappingConfidence::High,
            MappingSource::SpecialCase,
            kind.note().to_string(),
        ),
        MissionDirective::DatabaseHit(entry) => (
            entry.azimuth,
            MappingConfidence::High,
            MappingSource::Database,
            entry.note.to_string(),
        ),
        MissionDirective::PatternMatch(group) => (
            group.azimuth(),
            MappingConfidence::Medium,
            MappingSource::Pattern,
            match group.group {
                Some(n) => format!("Starlink group {n} shell"),
                None => "Starlink launch without a group number".to_string(),
            },
        ),
        MissionDirective::OrbitalMechanicsFallback(estimate) => {
            let latitude = launch
                .pad_coordinates()
                .map(|p| p.latitude)
                .unwrap_or(DEFAULT_PAD_LATITUDE);
            (
                launch_azimuth(estimate.inclination_deg, latitude),
                MappingConfidence::Medium,
                MappingSource::OrbitalMechanics,
                format!(
                    "{} orbit at {:.1}° inclination",
                    estimate.family.label(),
                    estimate.inclination_deg
                ),
            )
        }
    };

    let direction = match directive {
        MissionDirective::SpecialCase(kind) => kind.direction(),
        MissionDirective::DatabaseHit(entry) => entry.direction,
        _ => azimuth_to_direction(azimuth),
    };

    TrajectoryMapping {
        azimuth,
        direction,
        confidence,
        source,
        directive,
        note,
    }
}

pub fn azimuth_to_direction(azimuth_deg: f64) -> CompassDirection {
    CompassDirection::from_azimuth(azimuth_deg)
}

/// `starlink-group-N...` with N parsed, or bare `starlink` with no group.
fn starlink_group(slug: &str) -> Option<StarlinkGroup> {
    if !database::slug_contains(slug, "starlink") {
        return None;
    }
    let group = slug.find("starlink-group-").and_then(|idx| {
        let rest = &slug[idx + "starlink-group-".len()..];
        let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        digits.parse::<u32>().ok()
    });
    Some(StarlinkGroup { group })
}
