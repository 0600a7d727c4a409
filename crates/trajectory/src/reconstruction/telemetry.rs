//! Real flight telemetry, when a simulation of the mission can be found upstream.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use tracker_core::{CompassDirection, GeoPoint, LaunchRecord};
use tracker_geodesy::{bearing_degrees, look_angles};

use super::{ProviderError, ReconstructionRequest, TrajectoryProvider};
use crate::model::{
    EngineStatus, FlightEvent, FlightEventKind, FlightStage, TrajectoryConfidence, TrajectoryData,
    TrajectoryPoint, TrajectorySource,
};

/// Orbital missions must reach at least this altitude and speed in telemetry.
pub const MIN_ORBITAL_ALTITUDE_M: f64 = 100_000.0;
pub const MIN_ORBITAL_SPEED_M_S: f64 = 5_000.0;

const ORBITAL_KEYWORDS: [&str; 6] = ["dragon", "cygnus", "crew", "starlink", "iss", "cargo"];

/// Failures talking to a telemetry source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("telemetry request failed: {0}")]
    Request(String),
    #[error("telemetry source returned status {0}")]
    Status(u16),
    #[error("telemetry payload could not be decoded: {0}")]
    Payload(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionMatch {
    #[serde(alias = "id")]
    pub flight_club_sim_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationData {
    #[serde(default)]
    pub stages: Vec<StageTelemetry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageTelemetry {
    pub stage_number: u32,
    #[serde(default)]
    pub telemetry: Vec<TelemetryFrame>,
}

/// Altitude in metres, speed in m/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TelemetryFrame {
    pub time: f64,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    pub speed: f64,
}

/// Upstream simulation catalogue.
pub trait TelemetrySource: Send + Sync {
    /// Find the simulation for a launch; `Ok(None)` when the mission is not simulated.
    fn match_mission(&self, launch: &LaunchRecord) -> Result<Option<MissionMatch>, SourceError>;
    fn fetch_simulation(&self, sim_id: &str) -> Result<SimulationData, SourceError>;
}

impl<T: TelemetrySource + ?Sized> TelemetrySource for Box<T> {
    fn match_mission(&self, launch: &LaunchRecord) -> Result<Option<MissionMatch>, SourceError> {
        (**self).match_mission(launch)
    }

    fn fetch_simulation(&self, sim_id: &str) -> Result<SimulationData, SourceError> {
        (**self).fetch_simulation(sim_id)
    }
}

/// First tier: real telemetry from a [`TelemetrySource`].
#[derive(Debug, Clone)]
pub struct TelemetryProvider<S> {
    source: S,
}

impl<S: TelemetrySource> TelemetryProvider<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: TelemetrySource> TrajectoryProvider for TelemetryProvider<S> {
    fn name(&self) -> &'static str {
        "telemetry"
    }

    fn provide(
        &self,
        request: &ReconstructionRequest<'_>,
    ) -> Result<Option<TrajectoryData>, ProviderError> {
        let Some(found) = self.source.match_mission(request.launch)? else {
            debug!(launch = %request.launch.id, "no telemetry simulation for launch");
            return Ok(None);
        };
        let simulation = self.source.fetch_simulation(&found.flight_club_sim_id)?;
        let orbital = is_orbital_mission(request.launch);
        build_from_telemetry(&simulation, request.pad, request.observer.location, orbital).map(Some)
    }
}

/// Missions that are known to reach orbit and so must show orbital telemetry.
pub fn is_orbital_mission(launch: &LaunchRecord) -> bool {
    let text = launch.search_text();
    text.split(|c: char| !c.is_ascii_alphanumeric())
        .any(|token| ORBITAL_KEYWORDS.contains(&token))
}

/// Turn staged simulation frames into observer-relative trajectory points.
///
/// The lowest-numbered stage is the booster. Its frames count only up to
/// separation; afterwards they serve event detection alone.
pub fn build_from_telemetry(
    simulation: &SimulationData,
    pad: GeoPoint,
    observer: GeoPoint,
    orbital: bool,
) -> Result<TrajectoryData, ProviderError> {
    let mut stages: Vec<&StageTelemetry> = simulation
        .stages
        .iter()
        .filter(|s| !s.telemetry.is_empty())
        .collect();
    if stages.is_empty() {
        return Err(ProviderError::EmptyTelemetry);
    }
    stages.sort_by_key(|s| s.stage_number);

    let all_frames = || stages.iter().flat_map(|s| s.telemetry.iter());
    let max_altitude = all_frames().map(|f| f.altitude).fold(f64::MIN, f64::max);
    let max_speed = all_frames().map(|f| f.speed).fold(f64::MIN, f64::max);
    if orbital && (max_altitude <= MIN_ORBITAL_ALTITUDE_M || max_speed <= MIN_ORBITAL_SPEED_M_S) {
        return Err(ProviderError::ImplausibleTelemetry {
            max_altitude_km: max_altitude / 1_000.0,
            max_speed_km_s: max_speed / 1_000.0,
        });
    }

    let booster = stages[0];
    let upper = stages.get(1).copied();

    let meco = peak_speed_time(&booster.telemetry);
    let separation = upper
        .and_then(|u| u.telemetry.first())
        .map(|f| f.time)
        .or(meco);
    let seco = upper.and_then(|u| peak_speed_time(&u.telemetry));

    let mut frames: Vec<TelemetryFrame> = booster
        .telemetry
        .iter()
        .filter(|f| separation.is_none_or(|sep| upper.is_none() || f.time < sep))
        .copied()
        .collect();
    if let Some(upper) = upper {
        frames.extend(upper.telemetry.iter().copied());
    }
    frames.sort_by(|a, b| a.time.total_cmp(&b.time));
    frames.dedup_by(|b, a| b.time <= a.time);

    let points: Vec<TrajectoryPoint> = frames
        .iter()
        .map(|frame| {
            let ground = GeoPoint::new(frame.latitude, frame.longitude);
            let look = look_angles(observer, ground, frame.altitude);
            let (stage, engine_status) =
                classify_frame(frame.time, meco, separation, seco, upper.is_some());
            TrajectoryPoint {
                time: frame.time,
                latitude: frame.latitude,
                longitude: frame.longitude,
                altitude: frame.altitude,
                distance_from_observer: look.distance_km,
                bearing_from_observer: look.bearing_deg,
                elevation_angle: look.elevation_deg,
                above_horizon: look.elevation_deg > 0.0,
                stage,
                engine_status,
            }
        })
        .collect();

    let Some(last) = points.last() else {
        return Err(ProviderError::EmptyTelemetry);
    };
    let heading = bearing_degrees(pad, GeoPoint::new(last.latitude, last.longitude));

    let mut events = Vec::new();
    if let Some(time) = meco {
        events.push(FlightEvent {
            kind: FlightEventKind::Meco,
            time,
        });
    }
    if let (Some(time), Some(_)) = (separation, upper) {
        events.push(FlightEvent {
            kind: FlightEventKind::StageSeparation,
            time,
        });
    }
    if let Some(time) = seco {
        events.push(FlightEvent {
            kind: FlightEventKind::Seco,
            time,
        });
    }

    Ok(TrajectoryData::new(
        points,
        TrajectorySource::RealTelemetry,
        TrajectoryConfidence::Confirmed,
        CompassDirection::from_azimuth(heading),
    )
    .with_events(events))
}

/// Engine cut-off shows up as the speed peak of a burning stage.
fn peak_speed_time(frames: &[TelemetryFrame]) -> Option<f64> {
    frames
        .iter()
        .max_by(|a, b| a.speed.total_cmp(&b.speed))
        .map(|f| f.time)
}

fn classify_frame(
    t: f64,
    meco: Option<f64>,
    separation: Option<f64>,
    seco: Option<f64>,
    staged: bool,
) -> (FlightStage, EngineStatus) {
    match (meco, separation, seco) {
        (Some(m), _, _) if t <= m => (FlightStage::First, EngineStatus::Burning),
        (None, _, _) if !staged => (FlightStage::First, EngineStatus::Burning),
        (_, Some(s), _) if staged && t < s => (FlightStage::Separation, EngineStatus::Separation),
        _ if !staged => (FlightStage::First, EngineStatus::Shutdown),
        (_, _, Some(c)) if t <= c => (FlightStage::SecondBurn, EngineStatus::Burning),
        (_, _, Some(_)) => (FlightStage::SecondCoast, EngineStatus::Shutdown),
        _ => (FlightStage::SecondBurn, EngineStatus::Burning),
    }
}
