//! Trajectory data produced by every reconstruction tier.

use serde::{Deserialize, Serialize};
use tracker_core::CompassDirection;

/// Which part of the ascent a point belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlightStage {
    First,
    Separation,
    SecondBurn,
    SecondCoast,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineStatus {
    Burning,
    Shutdown,
    Separation,
}

/// One sample of the vehicle's flight, annotated relative to the observer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryPoint {
    /// Seconds after liftoff.
    pub time: f64,
    pub latitude: f64,
    pub longitude: f64,
    /// Metres above sea level.
    pub altitude: f64,
    pub distance_from_observer: f64,
    pub bearing_from_observer: f64,
    /// Signed; negative is below the horizon.
    pub elevation_angle: f64,
    pub above_horizon: bool,
    pub stage: FlightStage,
    pub engine_status: EngineStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrajectorySource {
    RealTelemetry,
    ImageDerived,
    Synthesized,
}

/// Ordered `Estimated < Projected < Confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrajectoryConfidence {
    Estimated,
    Projected,
    Confirmed,
}

/// Span of flight during which the vehicle is above the observer's horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisibilityWindow {
    pub start_time: f64,
    pub end_time: f64,
    pub start_bearing: f64,
    pub end_bearing: f64,
    pub closest_approach_km: f64,
}

impl VisibilityWindow {
    pub fn duration_s(&self) -> f64 {
        self.end_time - self.start_time
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlightEventKind {
    Meco,
    StageSeparation,
    Seco,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlightEvent {
    pub kind: FlightEventKind,
    pub time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrajectoryData {
    pub points: Vec<TrajectoryPoint>,
    pub source: TrajectorySource,
    pub confidence: TrajectoryConfidence,
    pub trajectory_direction: CompassDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility_window: Option<VisibilityWindow>,
    #[serde(default)]
    pub events: Vec<FlightEvent>,
    /// Notes from tiers that failed before this one answered.
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl TrajectoryData {
    pub fn new(
        points: Vec<TrajectoryPoint>,
        source: TrajectorySource,
        confidence: TrajectoryConfidence,
        trajectory_direction: CompassDirection,
    ) -> Self {
        let visibility_window = visibility_window(&points);
        Self {
            points,
            source,
            confidence,
            trajectory_direction,
            visibility_window,
            events: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn with_events(mut self, events: Vec<FlightEvent>) -> Self {
        self.events = events;
        self
    }

    pub fn event_time(&self, kind: FlightEventKind) -> Option<f64> {
        self.events.iter().find(|e| e.kind == kind).map(|e| e.time)
    }
}

/// Window spanned by the visible points, if any.
pub fn visibility_window(points: &[TrajectoryPoint]) -> Option<VisibilityWindow> {
    let mut visible = points.iter().filter(|p| p.above_horizon);
    let first = visible.next()?;
    let (last, closest) = visible.fold((first, first.distance_from_observer), |(_, closest), p| {
        (p, closest.min(p.distance_from_observer))
    });
    Some(VisibilityWindow {
        start_time: first.time,
        end_time: last.time,
        start_bearing: first.bearing_from_observer,
        end_bearing: last.bearing_from_observer,
        closest_approach_km: closest,
    })
}
