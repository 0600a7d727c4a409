//! Direction hints scraped from published trajectory graphics.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracker_core::{CompassDirection, LaunchRecord};

use super::profile::AscentProfile;
use super::telemetry::SourceError;
use super::{ProviderError, ReconstructionRequest, TrajectoryProvider};
use crate::mapping::{OrbitFamily, classify_orbit};
use crate::model::{TrajectoryConfidence, TrajectoryData, TrajectorySource};

/// What is known about a launch's trajectory graphic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectionHint {
    /// Human label such as "Northeast", when one was published.
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
}

pub trait DirectionHintSource: Send + Sync {
    fn direction_hint(&self, launch: &LaunchRecord) -> Result<Option<DirectionHint>, SourceError>;
}

/// Hints known ahead of time, keyed by launch id.
#[derive(Debug, Clone, Default)]
pub struct StaticDirectionHints {
    hints: HashMap<String, DirectionHint>,
}

impl StaticDirectionHints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hint(mut self, launch_id: impl Into<String>, hint: DirectionHint) -> Self {
        self.hints.insert(launch_id.into(), hint);
        self
    }

    pub fn len(&self) -> usize {
        self.hints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }
}

impl From<HashMap<String, DirectionHint>> for StaticDirectionHints {
    fn from(hints: HashMap<String, DirectionHint>) -> Self {
        Self { hints }
    }
}

impl DirectionHintSource for StaticDirectionHints {
    fn direction_hint(&self, launch: &LaunchRecord) -> Result<Option<DirectionHint>, SourceError> {
        Ok(self.hints.get(&launch.id).cloned())
    }
}

/// Azimuth and octant derived from a hint, plus how it was found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedDirection {
    pub azimuth: f64,
    pub direction: CompassDirection,
    pub basis: DirectionBasis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionBasis {
    Label,
    Filename,
    MissionPrior,
}

/// Read a direction out of a hint: the label first, then the image filename,
/// then what the mission type usually flies.
pub fn derive_direction(hint: &DirectionHint, launch: &LaunchRecord) -> Option<DerivedDirection> {
    if let Some(direction) = hint.label.as_deref().and_then(CompassDirection::parse) {
        return Some(DerivedDirection {
            azimuth: direction.center_azimuth(),
            direction,
            basis: DirectionBasis::Label,
        });
    }
    if let Some(azimuth) = hint.image_url.as_deref().and_then(azimuth_from_filename) {
        return Some(DerivedDirection {
            azimuth,
            direction: CompassDirection::from_azimuth(azimuth),
            basis: DirectionBasis::Filename,
        });
    }
    mission_prior(launch).map(|azimuth| DerivedDirection {
        azimuth,
        direction: CompassDirection::from_azimuth(azimuth),
        basis: DirectionBasis::MissionPrior,
    })
}

/// Filename heuristics: `az045`-style digits, direction words, or `rtls`
/// (return-to-launch-site profiles are flown up the coast).
pub fn azimuth_from_filename(url: &str) -> Option<f64> {
    let file = url
        .rsplit('/')
        .next()
        .unwrap_or(url)
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();

    for (idx, _) in file.match_indices("az") {
        let digits: String = file[idx + 2..]
            .trim_start_matches(['-', '_'])
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if let Ok(azimuth) = digits.parse::<f64>() {
            if azimuth < 360.0 {
                return Some(azimuth);
            }
        }
    }

    let tokens: Vec<&str> = file
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    // Longest labels first so "eastnortheast" is not read as "east".
    let words = [
        ("eastnortheast", CompassDirection::EastNortheast),
        ("eastsoutheast", CompassDirection::EastSoutheast),
        ("northeast", CompassDirection::Northeast),
        ("southeast", CompassDirection::Southeast),
        ("ene", CompassDirection::EastNortheast),
        ("ese", CompassDirection::EastSoutheast),
        ("ne", CompassDirection::Northeast),
        ("se", CompassDirection::Southeast),
        ("east", CompassDirection::East),
    ];
    for (word, direction) in words {
        if tokens.contains(&word) || (word.len() > 4 && file.contains(word)) {
            return Some(direction.center_azimuth());
        }
    }
    if tokens.contains(&"rtls") {
        return Some(CompassDirection::Northeast.center_azimuth());
    }
    None
}

fn mission_prior(launch: &LaunchRecord) -> Option<f64> {
    match classify_orbit(&launch.search_text()) {
        OrbitFamily::Iss | OrbitFamily::Starlink | OrbitFamily::Meo => Some(45.0),
        OrbitFamily::Gto | OrbitFamily::Interplanetary => Some(90.0),
        OrbitFamily::Polar => Some(140.0),
        OrbitFamily::Leo | OrbitFamily::Unknown => None,
    }
}

/// Second tier: the generic ascent flown along a direction read from a
/// trajectory graphic. Declines when no hint exists for the launch.
#[derive(Debug, Clone)]
pub struct ImageDerivedProvider<H> {
    hints: H,
    profile: AscentProfile,
}

impl<H: DirectionHintSource> ImageDerivedProvider<H> {
    pub fn new(hints: H) -> Self {
        Self {
            hints,
            profile: AscentProfile::default(),
        }
    }
}

impl<H: DirectionHintSource> TrajectoryProvider for ImageDerivedProvider<H> {
    fn name(&self) -> &'static str {
        "image-derived"
    }

    fn provide(
        &self,
        request: &ReconstructionRequest<'_>,
    ) -> Result<Option<TrajectoryData>, ProviderError> {
        let Some(hint) = self.hints.direction_hint(request.launch)? else {
            return Ok(None);
        };
        let Some(derived) = derive_direction(&hint, request.launch) else {
            return Ok(None);
        };
        let mut data = self.profile.trajectory(
            request.pad,
            derived.azimuth,
            request.observer.location,
            TrajectorySource::ImageDerived,
            TrajectoryConfidence::Projected,
        );
        data.trajectory_direction = derived.direction;
        Ok(Some(data))
    }
}
