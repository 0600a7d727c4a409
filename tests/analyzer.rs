use bermuda_rocket_tracker::config::{LogConfig, TrackerConfig};
use bermuda_rocket_tracker::core::{CompassDirection, LaunchRecord};
use bermuda_rocket_tracker::trajectory::{MappingSource, TrajectoryConfidence, TrajectorySource};
use bermuda_rocket_tracker::visibility::{DelayImpact, Likelihood};
use bermuda_rocket_tracker::{LaunchAnalyzer, init_logging};
use chrono::{TimeZone, Utc};

fn sample_launches() -> Vec<LaunchRecord> {
    let text = std::fs::read_to_string("data/launches.json").expect("sample launches");
    serde_json::from_str(&text).expect("launch records")
}

fn find<'a>(launches: &'a [LaunchRecord], id: &str) -> &'a LaunchRecord {
    launches.iter().find(|l| l.id == id).expect("sample launch")
}

#[test]
fn analyzes_sample_launches_offline() {
    init_logging(&LogConfig::default());
    let analyzer = LaunchAnalyzer::new(TrackerConfig::default());
    let now = Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap();
    let launches = sample_launches();

    let starlink = analyzer.analyze(find(&launches, "f9-starlink-10-12"), now);
    assert_ne!(starlink.verdict.likelihood, Likelihood::None);
    assert_eq!(starlink.trajectory.source, TrajectorySource::Synthesized);
    assert!(starlink.plume.is_some());

    let x37b = analyzer.analyze(find(&launches, "fh-ussf-52"), now);
    assert_eq!(x37b.mapping.source, MappingSource::SpecialCase);
    assert_eq!(x37b.trajectory.trajectory_direction, CompassDirection::Northeast);

    let transporter = analyzer.analyze(find(&launches, "f9-transporter-13"), now);
    assert_eq!(transporter.verdict.likelihood, Likelihood::None);

    let json = serde_json::to_value(&starlink).expect("analysis serializes");
    assert_eq!(json["verdict"]["dataSource"], "calculated");
    assert!(json["trajectory"]["points"].is_array());
}

#[test]
fn unreadable_launch_time_skips_the_plume() {
    let analyzer = LaunchAnalyzer::new(TrackerConfig::default());
    let mut launch = find(&sample_launches(), "f9-ses-26").clone();
    launch.net = "TBD".into();
    let now = Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap();

    let analysis = analyzer.analyze(&launch, now);
    assert!(analysis.plume.is_none());
    assert_eq!(analysis.verdict.likelihood, Likelihood::None);
}

#[test]
fn delay_impact_through_the_analyzer() {
    let analyzer = LaunchAnalyzer::new(TrackerConfig::default());
    let launches = sample_launches();
    let impact = analyzer.delay_impact(
        find(&launches, "f9-ses-26"),
        "2024-12-10T19:00:00Z",
        "2024-12-10T23:00:00Z",
    );
    assert_eq!(impact.impact, DelayImpact::VisibilityImproved);
}

#[test]
fn from_config_without_sources_stays_offline() {
    let analyzer = LaunchAnalyzer::from_config(TrackerConfig::default()).expect("offline analyzer");
    assert!(analyzer.config().sources.flightclub_base_url.is_none());
    let launches = sample_launches();
    let now = Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap();
    let analysis = analyzer.analyze(find(&launches, "f9-ses-26"), now);
    assert_eq!(analysis.launch_id, "f9-ses-26");
}

#[test]
fn configured_hints_feed_the_image_tier() {
    let mut config = TrackerConfig::default();
    config.sources.direction_hints_path = Some("data/direction_hints.yaml".into());
    let analyzer = LaunchAnalyzer::from_config(config).expect("hints load");
    let launches = sample_launches();
    let now = Utc.with_ymd_and_hms(2024, 12, 1, 0, 0, 0).unwrap();

    let starlink = analyzer.analyze(find(&launches, "f9-starlink-10-12"), now);
    assert_eq!(starlink.trajectory.source, TrajectorySource::ImageDerived);
    assert_eq!(starlink.trajectory.confidence, TrajectoryConfidence::Projected);
    assert!(!starlink.trajectory.points.is_empty());

    let ses = analyzer.analyze(find(&launches, "f9-ses-26"), now);
    assert_eq!(ses.trajectory.source, TrajectorySource::ImageDerived);

    let transporter = analyzer.analyze(find(&launches, "f9-transporter-13"), now);
    assert_eq!(transporter.trajectory.source, TrajectorySource::Synthesized);
}

#[test]
fn missing_hints_file_fails_setup() {
    let mut config = TrackerConfig::default();
    config.sources.direction_hints_path = Some("data/no-such-hints.yaml".into());
    assert!(LaunchAnalyzer::from_config(config).is_err());
}
