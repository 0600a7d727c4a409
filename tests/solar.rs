use bermuda_rocket_tracker::core::{GeoPoint, Observer};
use bermuda_rocket_tracker::solar::{
    CalculatedSolarData, SolarData, SolarDataSource, TwilightPhase, TwilightWindow,
    TwilightWindows, is_rocket_sunlit, shadow_height_m, solar_position, solar_position_at,
    twilight_phase,
};
use chrono::{NaiveDate, NaiveTime, TimeZone, Timelike, Utc};

#[test]
fn matches_nrel_reference_case() {
    let instant = Utc.with_ymd_and_hms(2003, 10, 17, 19, 30, 30).unwrap();
    let position = solar_position_at(instant, GeoPoint::new(39.742476, -105.1786), 1_830.14);
    assert!(
        (position.elevation - 39.88).abs() < 0.1,
        "elevation {}",
        position.elevation
    );
    assert!(
        (position.azimuth - 194.34).abs() < 0.2,
        "azimuth {}",
        position.azimuth
    );
}

#[test]
fn solstice_declination() {
    let instant = Utc.with_ymd_and_hms(2024, 6, 20, 20, 51, 0).unwrap();
    let position = solar_position(instant, &Observer::bermuda());
    assert!(
        (position.declination - 23.44).abs() < 0.05,
        "declination {}",
        position.declination
    );
}

#[test]
fn bermuda_solstice_noon_elevation() {
    let instant = Utc.with_ymd_and_hms(2024, 6, 21, 16, 20, 0).unwrap();
    let position = solar_position(instant, &Observer::bermuda());
    assert!(
        (position.elevation - 81.13).abs() < 0.3,
        "elevation {}",
        position.elevation
    );
    assert!((0.0..360.0).contains(&position.azimuth));
}

#[test]
fn solar_position_is_pure() {
    let instant = Utc.with_ymd_and_hms(2025, 1, 15, 1, 0, 0).unwrap();
    let observer = Observer::bermuda();
    assert_eq!(
        solar_position(instant, &observer),
        solar_position(instant, &observer)
    );
}

#[test]
fn twilight_bands_own_their_upper_bound() {
    assert_eq!(twilight_phase(10.0), TwilightPhase::Day);
    assert_eq!(twilight_phase(0.0), TwilightPhase::Day);
    assert_eq!(twilight_phase(-0.01), TwilightPhase::Civil);
    assert_eq!(twilight_phase(-6.0), TwilightPhase::Civil);
    assert_eq!(twilight_phase(-6.01), TwilightPhase::Nautical);
    assert_eq!(twilight_phase(-12.0), TwilightPhase::Nautical);
    assert_eq!(twilight_phase(-12.5), TwilightPhase::Astronomical);
    assert_eq!(twilight_phase(-18.0), TwilightPhase::Astronomical);
    assert_eq!(twilight_phase(-18.01), TwilightPhase::Night);
    assert!(!TwilightPhase::Day.is_dark());
    assert!(TwilightPhase::Civil.is_dark());
}

#[test]
fn earth_shadow_rises_with_depression() {
    assert_eq!(shadow_height_m(0.0), 0.0);
    let shallow = shadow_height_m(-1.0);
    let deep = shadow_height_m(-6.0);
    assert!(shallow > 100_000.0 && shallow < 115_000.0, "shadow {shallow}");
    assert!(deep > shallow);

    assert!(is_rocket_sunlit(0.0, 5.0));
    assert!(is_rocket_sunlit(150_000.0, -1.0));
    assert!(!is_rocket_sunlit(50_000.0, -1.0));
    assert!(!is_rocket_sunlit(150_000.0, -6.0));
}

#[test]
fn calculated_solar_data_for_bermuda_winter() {
    let date = NaiveDate::from_ymd_opt(2024, 12, 15).unwrap();
    let data = CalculatedSolarData
        .solar_data(date, &Observer::bermuda())
        .expect("sun rises and sets in Bermuda");
    let windows = TwilightWindows::from_solar_data(&data).unwrap();

    assert!(windows.nautical_start < windows.civil_start);
    assert!(windows.civil_start < windows.sunrise);
    assert!(windows.sunrise < windows.sunset);
    assert!(windows.sunset < windows.civil_end);
    assert!(windows.civil_end < windows.nautical_end);
    assert!(matches!(windows.sunrise.hour(), 6 | 7), "sunrise {}", data.sunrise);
    assert_eq!(windows.sunset.hour(), 17, "sunset {}", data.sunset);
}

fn evening_stub() -> SolarData {
    SolarData {
        sunrise: "07:00".into(),
        sunset: "18:00".into(),
        civil_twilight_start: "06:35".into(),
        civil_twilight_end: "18:25".into(),
        nautical_twilight_start: "06:05".into(),
        nautical_twilight_end: "18:55".into(),
    }
}

#[test]
fn classifies_twilight_windows() {
    let windows = TwilightWindows::from_solar_data(&evening_stub()).unwrap();
    let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
    assert_eq!(windows.classify(at(6, 10)), Some(TwilightWindow::MorningNautical));
    assert_eq!(windows.classify(at(6, 45)), Some(TwilightWindow::MorningCivil));
    assert_eq!(windows.classify(at(12, 0)), None);
    assert_eq!(windows.classify(at(18, 10)), Some(TwilightWindow::EveningCivil));
    assert_eq!(windows.classify(at(18, 40)), Some(TwilightWindow::EveningNautical));
    assert_eq!(windows.classify(at(21, 0)), None);
}

#[test]
fn rejects_malformed_clock_times() {
    let mut data = evening_stub();
    data.sunset = "six pm".into();
    let err = TwilightWindows::from_solar_data(&data).unwrap_err();
    assert!(err.to_string().contains("sunset"));
}
