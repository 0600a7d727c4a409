//! Exhaust-plume illumination for twilight launches.
//!
//! A plume lights up when the vehicle climbs out of Earth's shadow while the
//! ground below is already dark. The ascent is modelled on an altitude-only
//! power-law profile and the plume expands with an exponential atmosphere.

use chrono::{DateTime, Duration, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use tracker_config::{PlumeAscent, PlumeParams};
use tracker_core::Observer;
use tracker_solar::{SolarDataSource, TwilightWindows, is_rocket_sunlit, solar_position};

/// Twilight window a launch falls in, as far as plume viewing is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlumeTwilight {
    Civil,
    Nautical,
}

impl PlumeTwilight {
    fn score(self) -> f64 {
        match self {
            Self::Civil => 0.7,
            Self::Nautical => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intensity {
    Faint,
    Moderate,
    Bright,
    Brilliant,
}

impl Intensity {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.75 {
            Self::Brilliant
        } else if score >= 0.5 {
            Self::Bright
        } else if score >= 0.25 {
            Self::Moderate
        } else {
            Self::Faint
        }
    }

    fn score(self) -> f64 {
        match self {
            Self::Faint => 0.25,
            Self::Moderate => 0.5,
            Self::Bright => 0.75,
            Self::Brilliant => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlumeQuality {
    None,
    Poor,
    Fair,
    Good,
    Excellent,
    Spectacular,
}

impl PlumeQuality {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            Self::Spectacular
        } else if score >= 0.6 {
            Self::Excellent
        } else if score >= 0.4 {
            Self::Good
        } else if score >= 0.2 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

/// Contiguous stretch of flight during which the plume is sunlit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IlluminationPeriod {
    /// Seconds after liftoff.
    pub start_time: f64,
    pub end_time: f64,
    /// Kilometres.
    pub altitude_range: Range,
    /// Solar elevation in degrees (negative below the horizon).
    pub sun_angle_range: Range,
    pub intensity: Intensity,
    pub plume_size_km: f64,
}

impl IlluminationPeriod {
    pub fn duration_s(&self) -> f64 {
        self.end_time - self.start_time
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlumeIlluminationPrediction {
    pub has_plume_illumination: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twilight_type: Option<PlumeTwilight>,
    pub illumination_periods: Vec<IlluminationPeriod>,
    pub overall_quality: PlumeQuality,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl PlumeIlluminationPrediction {
    fn dark(warnings: Vec<String>) -> Self {
        Self {
            has_plume_illumination: false,
            twilight_type: None,
            illumination_periods: Vec::new(),
            overall_quality: PlumeQuality::None,
            warnings,
        }
    }
}

/// One step of the ascent walk.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AscentSample {
    pub time: f64,
    pub altitude_m: f64,
    pub sun_elevation_deg: f64,
}

/// Fixed local windows used when no solar data can be had: 05–07 and 18–20.
const FALLBACK_WINDOWS: [(u32, u32); 2] = [(5, 7), (18, 20)];

#[derive(Debug, Clone)]
pub struct PlumePredictor {
    observer: Observer,
    params: PlumeParams,
}

impl PlumePredictor {
    pub fn new(observer: Observer, params: PlumeParams) -> Self {
        Self { observer, params }
    }

    pub fn params(&self) -> &PlumeParams {
        &self.params
    }

    /// Predict plume illumination for a liftoff at `launch_time`.
    pub fn predict(
        &self,
        launch_time: DateTime<Utc>,
        source: &dyn SolarDataSource,
    ) -> PlumeIlluminationPrediction {
        let local = self.observer.local_time.to_local(launch_time);
        let windows = source
            .solar_data(local.date_naive(), &self.observer)
            .and_then(|data| TwilightWindows::from_solar_data(&data));

        let windows = match windows {
            Ok(windows) => windows,
            Err(err) => {
                warn!(error = %err, "solar data unavailable; using fixed twilight windows");
                return self.fallback(local.time(), err.to_string());
            }
        };

        let Some(window) = windows.classify(local.time()) else {
            debug!(local = %local.time(), "launch outside twilight; no plume illumination");
            return PlumeIlluminationPrediction::dark(Vec::new());
        };
        let twilight = if window.is_civil() {
            PlumeTwilight::Civil
        } else {
            PlumeTwilight::Nautical
        };

        let samples = self.walk_ascent(launch_time);
        let periods = illumination_periods(&samples, &self.params);
        if periods.is_empty() {
            return PlumeIlluminationPrediction {
                twilight_type: Some(twilight),
                ..PlumeIlluminationPrediction::dark(Vec::new())
            };
        }
        let overall_quality = overall_quality(&periods, twilight, &self.params);
        PlumeIlluminationPrediction {
            has_plume_illumination: true,
            twilight_type: Some(twilight),
            illumination_periods: periods,
            overall_quality,
            warnings: Vec::new(),
        }
    }

    /// Altitude and sun angle at each step of the ascent.
    pub fn walk_ascent(&self, launch_time: DateTime<Utc>) -> Vec<AscentSample> {
        let steps = (self.params.duration_s / self.params.step_s).floor() as i64;
        (0..=steps)
            .map(|i| {
                let time = i as f64 * self.params.step_s;
                let instant = launch_time + Duration::milliseconds((time * 1_000.0) as i64);
                AscentSample {
                    time,
                    altitude_m: ascent_altitude_km(&self.params.ascent, time) * 1_000.0,
                    sun_elevation_deg: solar_position(instant, &self.observer).elevation,
                }
            })
            .collect()
    }

    fn fallback(&self, local: NaiveTime, reason: String) -> PlumeIlluminationPrediction {
        let warning = format!("Solar data unavailable ({reason}); using fixed twilight windows");
        let hour = local.hour();
        let in_window = FALLBACK_WINDOWS
            .iter()
            .any(|&(start, end)| hour >= start && hour < end);
        if !in_window {
            return PlumeIlluminationPrediction::dark(vec![warning]);
        }

        let period = IlluminationPeriod {
            start_time: 180.0,
            end_time: 360.0,
            altitude_range: Range {
                min: 80.0,
                max: 180.0,
            },
            sun_angle_range: Range {
                min: -6.0,
                max: -3.0,
            },
            intensity: Intensity::Moderate,
            plume_size_km: 10.0,
        };
        let overall_quality =
            overall_quality(std::slice::from_ref(&period), PlumeTwilight::Civil, &self.params);
        PlumeIlluminationPrediction {
            has_plume_illumination: true,
            twilight_type: Some(PlumeTwilight::Civil),
            illumination_periods: vec![period],
            overall_quality,
            warnings: vec![warning],
        }
    }
}

/// Altitude (km) of the plume model's ascent at `t` seconds.
pub fn ascent_altitude_km(ascent: &PlumeAscent, t: f64) -> f64 {
    if t <= ascent.meco_s {
        ascent.meco_altitude_km * (t.max(0.0) / ascent.meco_s).powf(ascent.first_stage_exponent)
    } else if t <= ascent.seco_s {
        let f = (t - ascent.meco_s) / (ascent.seco_s - ascent.meco_s);
        ascent.meco_altitude_km
            + (ascent.seco_altitude_km - ascent.meco_altitude_km)
                * f.powf(ascent.second_stage_exponent)
    } else {
        ascent.seco_altitude_km
    }
}

/// Plume diameter from the ambient-to-sea-level pressure ratio.
pub fn plume_size_km(altitude_km: f64, params: &PlumeParams) -> f64 {
    let pressure_ratio = (-altitude_km / params.scale_height_km).exp();
    params.base_plume_size_km / (pressure_ratio + 0.1).sqrt()
}

/// 0 at 50 km, 1 from 200 km up.
fn altitude_score(altitude_km: f64) -> f64 {
    ((altitude_km - 50.0) / 150.0).clamp(0.0, 1.0)
}

/// Best contrast with the sun 6° below the horizon, none at 0° or 12°.
fn sun_score(sun_elevation_deg: f64) -> f64 {
    let depression = -sun_elevation_deg;
    (1.0 - (depression - 6.0).abs() / 6.0).clamp(0.0, 1.0)
}

/// Group sunlit samples into contiguous periods.
pub fn illumination_periods(samples: &[AscentSample], params: &PlumeParams) -> Vec<IlluminationPeriod> {
    samples
        .chunk_by(|a, b| lit(a) == lit(b))
        .filter(|run| run.first().is_some_and(lit))
        .map(|run| summarise(run, params))
        .collect()
}

fn lit(sample: &AscentSample) -> bool {
    is_rocket_sunlit(sample.altitude_m, sample.sun_elevation_deg)
}

fn summarise(run: &[AscentSample], params: &PlumeParams) -> IlluminationPeriod {
    let altitudes = run.iter().map(|s| s.altitude_m / 1_000.0);
    let altitude_range = span(altitudes.clone());
    let sun_angle_range = span(run.iter().map(|s| s.sun_elevation_deg));

    let best = run
        .iter()
        .map(|s| 0.6 * altitude_score(s.altitude_m / 1_000.0) + 0.4 * sun_score(s.sun_elevation_deg))
        .fold(0.0, f64::max);
    let mean_size =
        altitudes.map(|alt| plume_size_km(alt, params)).sum::<f64>() / run.len() as f64;

    IlluminationPeriod {
        start_time: run[0].time,
        end_time: run[run.len() - 1].time,
        altitude_range,
        sun_angle_range,
        intensity: Intensity::from_score(best),
        plume_size_km: mean_size,
    }
}

fn span(values: impl Iterator<Item = f64>) -> Range {
    values.fold(
        Range {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        },
        |r, v| Range {
            min: r.min.min(v),
            max: r.max.max(v),
        },
    )
}

/// Weighted blend of best intensity, illuminated time, twilight type and plume size.
pub fn overall_quality(
    periods: &[IlluminationPeriod],
    twilight: PlumeTwilight,
    params: &PlumeParams,
) -> PlumeQuality {
    if periods.is_empty() {
        return PlumeQuality::None;
    }
    let best = periods
        .iter()
        .map(|p| p.intensity)
        .max()
        .unwrap_or(Intensity::Faint);
    let total: f64 = periods.iter().map(IlluminationPeriod::duration_s).sum();
    let mean_size = periods.iter().map(|p| p.plume_size_km).sum::<f64>() / periods.len() as f64;

    let w = &params.weights;
    let score = w.intensity * best.score()
        + w.duration * (total / params.full_duration_s).min(1.0)
        + w.twilight * twilight.score()
        + w.size * (mean_size / params.full_size_km).min(1.0);
    PlumeQuality::from_score(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(time: f64, altitude_km: f64, sun: f64) -> AscentSample {
        AscentSample {
            time,
            altitude_m: altitude_km * 1_000.0,
            sun_elevation_deg: sun,
        }
    }

    #[test]
    fn periods_follow_the_shadow_line() {
        // At -1° the shadow sits near 111 km.
        let samples = [
            sample(0.0, 0.0, -1.0),
            sample(100.0, 60.0, -1.0),
            sample(200.0, 130.0, -1.0),
            sample(300.0, 170.0, -1.0),
        ];
        let periods = illumination_periods(&samples, &PlumeParams::default());
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].start_time, 200.0);
        assert_eq!(periods[0].end_time, 300.0);
        assert_eq!(periods[0].altitude_range.min, 130.0);
    }

    #[test]
    fn plume_grows_with_altitude() {
        let params = PlumeParams::default();
        assert!(plume_size_km(100.0, &params) > plume_size_km(10.0, &params));
        assert!(plume_size_km(500.0, &params) < params.base_plume_size_km / 0.1f64.sqrt() + 1e-9);
    }

    #[test]
    fn ascent_is_continuous() {
        let ascent = PlumeAscent::default();
        assert!((ascent_altitude_km(&ascent, ascent.meco_s) - ascent.meco_altitude_km).abs() < 1e-9);
        assert_eq!(ascent_altitude_km(&ascent, 600.0), ascent.seco_altitude_km);
    }
}
