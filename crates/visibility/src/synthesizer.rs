//! Merge pad geography, orbit class, sky darkness and trajectory geometry
//! into one verdict.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use tracker_config::{LikelihoodThresholds, OrbitScores, VisibilityParams};
use tracker_core::{CompassDirection, LaunchRecord, Observer};
use tracker_geodesy::bearing_degrees;
use tracker_solar::{SolarPosition, TwilightPhase, solar_position, twilight_phase};
use tracker_trajectory::{
    OrbitFamily, TrajectoryData, TrajectorySource, classify_orbit, get_trajectory_mapping,
};

/// Ordered `None < Low < Medium < High`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Likelihood {
    None,
    Low,
    Medium,
    High,
}

impl fmt::Display for Likelihood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "none",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        })
    }
}

/// Provenance of the trajectory behind a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    Flightclub,
    Calculated,
    Estimated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityVerdict {
    pub likelihood: Likelihood,
    pub score: f64,
    pub reason: String,
    /// Where to look from the observer, degrees from north.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bearing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trajectory_direction: Option<CompassDirection>,
    #[serde(default)]
    pub factors: Vec<String>,
    pub data_source: DataSource,
    /// Sky at the observer when the launch lifts off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twilight_phase: Option<TwilightPhase>,
}

impl VisibilityVerdict {
    pub(crate) fn not_visible(reason: impl Into<String>, data_source: DataSource) -> Self {
        let reason = reason.into();
        Self {
            likelihood: Likelihood::None,
            score: 0.0,
            factors: vec![reason.clone()],
            reason,
            bearing: None,
            trajectory_direction: None,
            data_source,
            twilight_phase: None,
        }
    }
}

/// Everything a verdict is computed from. `solar` is the sun at the observer
/// at liftoff; when absent it is computed.
#[derive(Debug, Clone, Copy)]
pub struct VisibilityInput<'a> {
    pub launch: &'a LaunchRecord,
    pub trajectory: Option<&'a TrajectoryData>,
    pub solar: Option<&'a SolarPosition>,
    pub observer: &'a Observer,
    pub params: &'a VisibilityParams,
}

pub fn likelihood_for_score(score: f64, thresholds: &LikelihoodThresholds) -> Likelihood {
    if score >= thresholds.high {
        Likelihood::High
    } else if score >= thresholds.medium {
        Likelihood::Medium
    } else if score > 0.0 {
        Likelihood::Low
    } else {
        Likelihood::None
    }
}

fn base_score(family: OrbitFamily, scores: &OrbitScores) -> Option<f64> {
    match family {
        OrbitFamily::Gto => Some(scores.gto),
        OrbitFamily::Interplanetary => Some(scores.interplanetary),
        OrbitFamily::Iss => Some(scores.iss),
        OrbitFamily::Meo => Some(scores.meo),
        OrbitFamily::Starlink => Some(scores.starlink),
        OrbitFamily::Leo => Some(scores.leo),
        OrbitFamily::Polar | OrbitFamily::Unknown => None,
    }
}

/// Visibility verdict for one launch. Pure: the same input always gives the
/// same verdict, and the reason is never empty.
pub fn calculate_visibility(input: &VisibilityInput<'_>) -> VisibilityVerdict {
    let launch = input.launch;
    let params = input.params;
    let data_source = match input.trajectory.map(|t| t.source) {
        Some(TrajectorySource::RealTelemetry) => DataSource::Flightclub,
        Some(_) => DataSource::Calculated,
        None => DataSource::Estimated,
    };

    let Some(pad) = launch.pad_coordinates() else {
        return VisibilityVerdict::not_visible("Launch site coordinates unavailable", data_source);
    };
    let Some(liftoff) = launch.liftoff_time() else {
        return VisibilityVerdict::not_visible("Launch time unavailable", data_source);
    };
    let region = &params.eligible_region;
    if !region.contains(pad.latitude, pad.longitude) {
        return VisibilityVerdict::not_visible(
            format!(
                "Launch not from {}; the ascent stays below Bermuda's horizon",
                region.name
            ),
            data_source,
        );
    }

    let family = classify_orbit(&launch.search_text());
    if family == OrbitFamily::Polar {
        return VisibilityVerdict::not_visible(
            "Polar/SSO trajectory heads south along the coast and is not visible from Bermuda",
            data_source,
        );
    }
    let Some(base) = base_score(family, &params.orbit_scores) else {
        return VisibilityVerdict::not_visible(
            "Orbit unknown; visibility cannot be assessed",
            data_source,
        );
    };

    let mut factors = Vec::new();
    let mut score = base;
    let orbit_note = match family {
        OrbitFamily::Leo | OrbitFamily::Starlink => {
            "LEO trajectory has limited visibility".to_string()
        }
        other => format!("{} trajectory climbs high enough to clear the horizon", other.label()),
    };
    factors.push(orbit_note.clone());

    let elevation = input
        .solar
        .map(|s| s.elevation)
        .unwrap_or_else(|| solar_position(liftoff, input.observer).elevation);
    let phase = twilight_phase(elevation);
    let sky_note = match phase {
        TwilightPhase::Night | TwilightPhase::Astronomical => {
            score += params.night_bonus;
            "Night launch: the exhaust stands out against a dark sky"
        }
        TwilightPhase::Civil | TwilightPhase::Nautical => {
            score += params.twilight_bonus;
            "Twilight launch: a sunlit plume is possible over a darkening sky"
        }
        TwilightPhase::Day => {
            score -= params.daylight_penalty;
            "Daylight reduces visibility"
        }
    };
    factors.push(format!("{sky_note} (sun {elevation:.1}°)"));

    let mut bearing = Some(bearing_degrees(input.observer.location, pad));
    let direction = if let Some(trajectory) = input.trajectory {
        match &trajectory.visibility_window {
            Some(window) if window.duration_s() <= 0.0 => {
                factors.push(format!(
                    "Touches the horizon only momentarily at {:.0}°",
                    window.start_bearing
                ));
                bearing = Some(window.start_bearing);
            }
            Some(window) => {
                let fraction = (window.duration_s() / params.window_full_duration_s).clamp(0.0, 1.0);
                score += params.window_bonus + params.window_duration_bonus * fraction;
                factors.push(format!(
                    "Above the horizon for {:.0} s from {:.0}° to {:.0}°",
                    window.duration_s(),
                    window.start_bearing,
                    window.end_bearing
                ));
                if window.closest_approach_km < params.close_approach_km {
                    score += params.close_approach_bonus;
                    factors.push(format!(
                        "Passes within {:.0} km of the observer",
                        window.closest_approach_km
                    ));
                }
                bearing = Some(window.start_bearing);
            }
            None => {
                score -= params.no_window_penalty;
                factors.push("Trajectory never clears the horizon".to_string());
            }
        }
        trajectory.trajectory_direction
    } else {
        get_trajectory_mapping(launch).direction
    };

    let score = score.clamp(0.0, 1.0);
    let likelihood = likelihood_for_score(score, &params.thresholds);
    debug!(launch = %launch.id, score, %likelihood, phase = %phase, "visibility computed");

    VisibilityVerdict {
        likelihood,
        score,
        reason: format!("{sky_note}. {orbit_note}."),
        bearing,
        trajectory_direction: Some(direction),
        factors,
        data_source,
        twilight_phase: Some(phase),
    }
}
