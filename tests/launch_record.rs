use bermuda_rocket_tracker::core::LaunchRecord;

fn sample_launches() -> Vec<LaunchRecord> {
    let text = std::fs::read_to_string("data/launches.json").expect("sample launches");
    serde_json::from_str(&text).expect("launch records")
}

#[test]
fn string_coordinates_are_accepted() {
    let launches = sample_launches();
    let starlink = &launches[0];
    let pad = starlink.pad_coordinates().expect("pad coordinates");
    assert!((pad.latitude - 28.5619).abs() < 1e-3);
    assert!((pad.longitude + 80.5774).abs() < 1e-3);
    assert_eq!(starlink.orbit_name(), Some("Low Earth Orbit"));
    assert!(starlink.liftoff_time().is_some());
}

#[test]
fn pad_location_is_the_fallback() {
    let launches = sample_launches();
    let pad = launches[1].pad_coordinates().expect("location coordinates");
    assert!((pad.latitude - 28.608).abs() < 1e-3);
    assert_eq!(launches[1].mission_name(), "USSF-52");
}

#[test]
fn unusable_coordinates_are_absent() {
    let record: LaunchRecord = serde_json::from_str(
        r#"{
            "id": "x",
            "name": "Mystery",
            "net": "not a date",
            "pad": { "name": "Somewhere", "latitude": "north-ish", "longitude": 200.0 }
        }"#,
    )
    .unwrap();
    assert!(record.pad_coordinates().is_none());
    assert!(record.liftoff_time().is_none());
    assert_eq!(record.mission_name(), "Mystery");
    assert_eq!(record.orbit_name(), None);
}

#[test]
fn search_text_is_lowercase() {
    let launches = sample_launches();
    let text = launches[3].search_text();
    assert!(text.contains("ses-26"));
    assert!(text.contains("geostationary transfer orbit"));
}
