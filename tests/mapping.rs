use bermuda_rocket_tracker::core::{CompassDirection, GeoPoint, LaunchRecord};
use bermuda_rocket_tracker::trajectory::{
    MappingConfidence, MappingSource, MissionDirective, OrbitFamily, azimuth_to_direction,
    classify_orbit, get_trajectory_mapping, launch_azimuth, resolve_directive,
};
use chrono::{TimeZone, Utc};

fn launch(name: &str, mission: &str, orbit: Option<&str>) -> LaunchRecord {
    LaunchRecord::new(
        "test-launch",
        name,
        Utc.with_ymd_and_hms(2025, 1, 15, 1, 0, 0).unwrap(),
    )
    .with_mission(mission, orbit)
    .with_pad("SLC-40", GeoPoint::new(28.5618, -80.5772))
}

#[test]
fn special_vehicles_are_pinned_northeast() {
    for name in ["Falcon Heavy | USSF-52 (X-37B OTV-7)", "Falcon 9 | OTV-8"] {
        let mapping = get_trajectory_mapping(&launch(name, "", Some("Low Earth Orbit")));
        assert_eq!(mapping.azimuth, 40.0, "{name}");
        assert_eq!(mapping.direction, CompassDirection::Northeast);
        assert_eq!(mapping.confidence, MappingConfidence::High);
        assert_eq!(mapping.source, MappingSource::SpecialCase);
        assert!(mapping.is_high_confidence());
    }
}

#[test]
fn crew_missions_follow_the_database() {
    let mapping = get_trajectory_mapping(&launch("Falcon 9 | Crew-10", "Crew-10", None));
    assert_eq!(mapping.azimuth, 45.0);
    assert_eq!(mapping.direction, CompassDirection::Northeast);
    assert_eq!(mapping.source, MappingSource::Database);
    assert!(matches!(
        resolve_directive(&launch("Falcon 9 | Crew-10", "Crew-10", None)),
        MissionDirective::DatabaseHit(_)
    ));
}

#[test]
fn starlink_group_six_heads_southeast() {
    let mapping = get_trajectory_mapping(&launch(
        "Falcon 9 | Starlink Group 6-32",
        "Starlink Group 6-32",
        Some("Low Earth Orbit"),
    ));
    assert_eq!(mapping.azimuth, 146.0);
    assert_eq!(mapping.direction, CompassDirection::Southeast);
}

#[test]
fn sun_synchronous_missions_use_retrograde_azimuth() {
    let mapping = get_trajectory_mapping(&launch(
        "Falcon 9 | SDA Tranche 1",
        "SDA Tranche 1",
        Some("Sun-Synchronous Orbit"),
    ));
    assert_eq!(mapping.source, MappingSource::OrbitalMechanics);
    assert_eq!(mapping.azimuth, 140.0);
    assert_eq!(mapping.direction, CompassDirection::Southeast);
    assert_eq!(mapping.confidence, MappingConfidence::Medium);
}

#[test]
fn launch_azimuth_formula() {
    assert!((launch_azimuth(51.6, 28.5) - 45.03).abs() < 0.05);
    assert_eq!(launch_azimuth(28.5, 28.5), 90.0);
    assert_eq!(launch_azimuth(10.0, 28.5), 90.0);
    assert_eq!(launch_azimuth(97.5, 28.5), 140.0);
}

#[test]
fn octant_band_edges() {
    assert_eq!(azimuth_to_direction(45.0), CompassDirection::Northeast);
    assert_eq!(azimuth_to_direction(45.01), CompassDirection::EastNortheast);
    assert_eq!(azimuth_to_direction(90.0), CompassDirection::East);
    assert_eq!(azimuth_to_direction(120.0), CompassDirection::EastSoutheast);
    assert_eq!(azimuth_to_direction(165.0), CompassDirection::Southeast);
    assert_eq!(azimuth_to_direction(170.0), CompassDirection::Northeast);
    assert_eq!(azimuth_to_direction(5.0), CompassDirection::Northeast);
}

#[test]
fn orbit_classification() {
    assert_eq!(classify_orbit("geostationary transfer orbit"), OrbitFamily::Gto);
    assert_eq!(classify_orbit("sun-synchronous orbit"), OrbitFamily::Polar);
    assert_eq!(classify_orbit("crew-10 to the iss"), OrbitFamily::Iss);
    assert_eq!(classify_orbit("starlink group 10-12"), OrbitFamily::Starlink);
    assert_eq!(classify_orbit("low earth orbit"), OrbitFamily::Leo);
    assert_eq!(classify_orbit("mystery payload"), OrbitFamily::Unknown);
}

#[test]
fn mapping_is_deterministic() {
    let l = launch("Atlas V | Kuiper KA-02", "KA-02", Some("Low Earth Orbit"));
    let a = get_trajectory_mapping(&l);
    let b = get_trajectory_mapping(&l);
    assert_eq!(a.azimuth, b.azimuth);
    assert_eq!(a.direction, b.direction);
    assert_eq!(a.source, b.source);
}
