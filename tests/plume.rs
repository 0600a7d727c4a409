use bermuda_rocket_tracker::config::PlumeParams;
use bermuda_rocket_tracker::core::Observer;
use bermuda_rocket_tracker::plume::{
    AscentSample, Intensity, PlumePredictor, PlumeQuality, PlumeTwilight, illumination_periods,
    plume_size_km,
};
use bermuda_rocket_tracker::solar::{CalculatedSolarData, SolarData, SolarDataSource, SolarError};
use chrono::{NaiveDate, TimeZone, Utc};

struct Unreachable;

impl SolarDataSource for Unreachable {
    fn solar_data(&self, _date: NaiveDate, _observer: &Observer) -> Result<SolarData, SolarError> {
        Err(SolarError::Unavailable("service down".into()))
    }
}

struct EveningStub;

impl SolarDataSource for EveningStub {
    fn solar_data(&self, _date: NaiveDate, _observer: &Observer) -> Result<SolarData, SolarError> {
        Ok(SolarData {
            sunrise: "07:00".into(),
            sunset: "18:00".into(),
            civil_twilight_start: "06:35".into(),
            civil_twilight_end: "18:25".into(),
            nautical_twilight_start: "06:05".into(),
            nautical_twilight_end: "18:55".into(),
        })
    }
}

fn predictor() -> PlumePredictor {
    PlumePredictor::new(Observer::bermuda(), PlumeParams::default())
}

#[test]
fn fallback_window_evening_predicts_a_plume() {
    // 19:00 Atlantic Standard Time.
    let launch = Utc.with_ymd_and_hms(2024, 12, 15, 23, 0, 0).unwrap();
    let prediction = predictor().predict(launch, &Unreachable);

    assert!(prediction.has_plume_illumination);
    assert_eq!(prediction.twilight_type, Some(PlumeTwilight::Civil));
    assert_eq!(prediction.illumination_periods.len(), 1);
    assert_eq!(prediction.illumination_periods[0].intensity, Intensity::Moderate);
    assert_eq!(prediction.warnings.len(), 1);
    assert!(prediction.warnings[0].contains("service down"));
}

#[test]
fn fallback_outside_windows_is_dark() {
    let noon = Utc.with_ymd_and_hms(2024, 12, 15, 16, 0, 0).unwrap();
    let prediction = predictor().predict(noon, &Unreachable);
    assert!(!prediction.has_plume_illumination);
    assert!(prediction.illumination_periods.is_empty());
    assert_eq!(prediction.overall_quality, PlumeQuality::None);
    assert_eq!(prediction.warnings.len(), 1);
}

#[test]
fn midday_launch_has_no_plume() {
    let noon = Utc.with_ymd_and_hms(2024, 12, 15, 16, 0, 0).unwrap();
    let prediction = predictor().predict(noon, &CalculatedSolarData);
    assert!(!prediction.has_plume_illumination);
    assert_eq!(prediction.twilight_type, None);
    assert_eq!(prediction.overall_quality, PlumeQuality::None);
    assert!(prediction.warnings.is_empty());
}

#[test]
fn evening_civil_twilight_is_classified() {
    // 18:10 local, ten minutes after the stubbed sunset.
    let launch = Utc.with_ymd_and_hms(2024, 12, 15, 22, 10, 0).unwrap();
    let prediction = predictor().predict(launch, &EveningStub);
    assert_eq!(prediction.twilight_type, Some(PlumeTwilight::Civil));
    assert!(prediction.warnings.is_empty());
}

#[test]
fn morning_civil_twilight_lights_the_upper_ascent() {
    // 07:00 local, just before sunrise.
    let launch = Utc.with_ymd_and_hms(2024, 12, 15, 11, 0, 0).unwrap();
    let prediction = predictor().predict(launch, &CalculatedSolarData);

    assert!(prediction.has_plume_illumination);
    assert!(!prediction.illumination_periods.is_empty());
    assert!(prediction.overall_quality >= PlumeQuality::Good);
    assert!(prediction.warnings.is_empty());
    for period in &prediction.illumination_periods {
        assert!(period.duration_s() > 0.0);
        assert!(period.altitude_range.min <= period.altitude_range.max);
    }
}

#[test]
fn lit_samples_group_into_periods() {
    let params = PlumeParams::default();
    let sample = |time: f64, altitude_km: f64| AscentSample {
        time,
        altitude_m: altitude_km * 1_000.0,
        sun_elevation_deg: -1.0,
    };
    // Shadow sits near 111 km at one degree of depression.
    let samples = vec![
        sample(0.0, 0.0),
        sample(100.0, 60.0),
        sample(200.0, 120.0),
        sample(300.0, 160.0),
        sample(400.0, 200.0),
    ];
    let periods = illumination_periods(&samples, &params);
    assert_eq!(periods.len(), 1);
    assert_eq!(periods[0].start_time, 200.0);
    assert_eq!(periods[0].end_time, 400.0);
    assert_eq!(periods[0].altitude_range.min, 120.0);
    assert_eq!(periods[0].altitude_range.max, 200.0);
}

#[test]
fn plume_grows_with_altitude() {
    let params = PlumeParams::default();
    let sea_level = plume_size_km(0.0, &params);
    let high = plume_size_km(150.0, &params);
    assert!(high > sea_level);
    assert!(high.is_finite());
}
