//! Generic two-stage ascent used when no telemetry is available.

use tracker_core::units::m_to_km;
use tracker_core::{CompassDirection, GeoPoint};
use tracker_geodesy::{destination_point, look_angles};

use super::{ProviderError, ReconstructionRequest, TrajectoryProvider};
use crate::model::{
    EngineStatus, FlightEvent, FlightEventKind, FlightStage, TrajectoryConfidence, TrajectoryData,
    TrajectoryPoint, TrajectorySource,
};

/// Altitude and speed milestones of a Falcon 9-class ascent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AscentProfile {
    pub meco_s: f64,
    pub meco_altitude_km: f64,
    pub meco_speed_m_s: f64,
    pub first_stage_exponent: f64,
    /// End of the coast between MECO and second-stage ignition.
    pub separation_end_s: f64,
    pub seco_s: f64,
    pub seco_altitude_km: f64,
    pub seco_speed_m_s: f64,
    pub second_stage_exponent: f64,
    pub step_s: f64,
    pub duration_s: f64,
}

impl Default for AscentProfile {
    fn default() -> Self {
        Self {
            meco_s: 162.0,
            meco_altitude_km: 80.0,
            meco_speed_m_s: 2_400.0,
            first_stage_exponent: 1.8,
            separation_end_s: 165.0,
            seco_s: 540.0,
            seco_altitude_km: 200.0,
            seco_speed_m_s: 7_800.0,
            second_stage_exponent: 1.2,
            step_s: 30.0,
            duration_s: 600.0,
        }
    }
}

/// Visibility rule for modelled points: only the second stage above the
/// booster's ceiling, not too far below the horizon, within 1500 km.
pub const MIN_VISIBLE_ELEVATION_DEG: f64 = -2.0;
pub const MAX_VISIBLE_DISTANCE_KM: f64 = 1_500.0;

impl AscentProfile {
    pub fn altitude_km(&self, t: f64) -> f64 {
        if t <= self.meco_s {
            self.meco_altitude_km * (t.max(0.0) / self.meco_s).powf(self.first_stage_exponent)
        } else if t <= self.separation_end_s {
            self.meco_altitude_km
        } else if t <= self.seco_s {
            let f = (t - self.separation_end_s) / (self.seco_s - self.separation_end_s);
            self.meco_altitude_km
                + (self.seco_altitude_km - self.meco_altitude_km)
                    * f.powf(self.second_stage_exponent)
        } else {
            self.seco_altitude_km
        }
    }

    pub fn speed_m_s(&self, t: f64) -> f64 {
        if t <= self.meco_s {
            self.meco_speed_m_s * t.max(0.0) / self.meco_s
        } else if t <= self.separation_end_s {
            self.meco_speed_m_s
        } else if t <= self.seco_s {
            let f = (t - self.separation_end_s) / (self.seco_s - self.separation_end_s);
            self.meco_speed_m_s + (self.seco_speed_m_s - self.meco_speed_m_s) * f
        } else {
            self.seco_speed_m_s
        }
    }

    /// Share of the velocity that is horizontal; the first stage pitches over linearly.
    fn horizontal_fraction(&self, t: f64) -> f64 {
        if t <= self.meco_s {
            (t / self.meco_s).clamp(0.0, 1.0)
        } else {
            1.0
        }
    }

    /// Ground distance flown by `t`, integrated in 1 s steps.
    pub fn downrange_km(&self, t: f64) -> f64 {
        let mut distance_m = 0.0;
        let mut s = 0.0;
        while s < t {
            let dt = (t - s).min(1.0);
            let mid = s + dt / 2.0;
            distance_m += self.speed_m_s(mid) * self.horizontal_fraction(mid) * dt;
            s += dt;
        }
        m_to_km(distance_m)
    }

    pub fn stage_at(&self, t: f64) -> (FlightStage, EngineStatus) {
        if t <= self.meco_s {
            (FlightStage::First, EngineStatus::Burning)
        } else if t <= self.separation_end_s {
            (FlightStage::Separation, EngineStatus::Separation)
        } else if t <= self.seco_s {
            (FlightStage::SecondBurn, EngineStatus::Burning)
        } else {
            (FlightStage::SecondCoast, EngineStatus::Shutdown)
        }
    }

    pub fn events(&self) -> Vec<FlightEvent> {
        vec![
            FlightEvent {
                kind: FlightEventKind::Meco,
                time: self.meco_s,
            },
            FlightEvent {
                kind: FlightEventKind::StageSeparation,
                time: self.separation_end_s,
            },
            FlightEvent {
                kind: FlightEventKind::Seco,
                time: self.seco_s,
            },
        ]
    }

    /// Sample the ascent every `step_s` along the great circle leaving `pad`
    /// on `azimuth_deg`, annotated relative to `observer`.
    pub fn sample(
        &self,
        pad: GeoPoint,
        azimuth_deg: f64,
        observer: GeoPoint,
    ) -> Vec<TrajectoryPoint> {
        let steps = (self.duration_s / self.step_s).floor() as usize;
        (0..=steps)
            .map(|i| {
                let t = i as f64 * self.step_s;
                let altitude_km = self.altitude_km(t);
                let ground = destination_point(pad, azimuth_deg, self.downrange_km(t));
                let look = look_angles(observer, ground, altitude_km * 1_000.0);
                let (stage, engine_status) = self.stage_at(t);
                let above_horizon = t > self.separation_end_s
                    && altitude_km > self.meco_altitude_km
                    && look.elevation_deg > MIN_VISIBLE_ELEVATION_DEG
                    && look.distance_km < MAX_VISIBLE_DISTANCE_KM;
                TrajectoryPoint {
                    time: t,
                    latitude: ground.latitude,
                    longitude: ground.longitude,
                    altitude: altitude_km * 1_000.0,
                    distance_from_observer: look.distance_km,
                    bearing_from_observer: look.bearing_deg,
                    elevation_angle: look.elevation_deg,
                    above_horizon,
                    stage,
                    engine_status,
                }
            })
            .collect()
    }

    /// Modelled trajectory along `azimuth_deg`, labelled with its octant.
    pub fn trajectory(
        &self,
        pad: GeoPoint,
        azimuth_deg: f64,
        observer: GeoPoint,
        source: TrajectorySource,
        confidence: TrajectoryConfidence,
    ) -> TrajectoryData {
        let points = self.sample(pad, azimuth_deg, observer);
        TrajectoryData::new(
            points,
            source,
            confidence,
            CompassDirection::from_azimuth(azimuth_deg),
        )
        .with_events(self.events())
    }
}

/// Last tier: the generic ascent flown along the mapped azimuth. Never declines.
#[derive(Debug, Clone, Default)]
pub struct SynthesizedProvider {
    pub profile: AscentProfile,
}

impl SynthesizedProvider {
    pub fn new(profile: AscentProfile) -> Self {
        Self { profile }
    }
}

impl TrajectoryProvider for SynthesizedProvider {
    fn name(&self) -> &'static str {
        "synthesized"
    }

    fn provide(
        &self,
        request: &ReconstructionRequest<'_>,
    ) -> Result<Option<TrajectoryData>, ProviderError> {
        let mut data = self.profile.trajectory(
            request.pad,
            request.mapping.azimuth,
            request.observer.location,
            TrajectorySource::Synthesized,
            TrajectoryConfidence::Estimated,
        );
        // The octant from the mapping may be pinned independently of its azimuth.
        data.trajectory_direction = request.mapping.direction;
        Ok(Some(data))
    }
}
