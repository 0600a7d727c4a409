use std::sync::Arc;

use bermuda_rocket_tracker::config::CachePolicy;
use bermuda_rocket_tracker::core::{CompassDirection, GeoPoint, LaunchRecord, Observer};
use bermuda_rocket_tracker::trajectory::{
    DirectionHint, FlightEventKind, ImageDerivedProvider, InMemoryTrajectoryCache, MissionMatch,
    SimulationData, SourceError, StageTelemetry, StaticDirectionHints, SynthesizedProvider,
    TelemetryFrame, TelemetryProvider, TelemetrySource, TrajectoryCache, TrajectoryConfidence,
    TrajectoryData, TrajectoryEngine, TrajectoryProvider, TrajectorySource, cache_ttl,
    get_trajectory_data, get_trajectory_mapping, is_orbital_mission, reconcile_direction,
};
use chrono::{DateTime, Duration, TimeZone, Utc};

const CAPE: GeoPoint = GeoPoint::new(28.5618, -80.5772);

fn liftoff() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 1, 0, 0).unwrap()
}

fn launch(id: &str, name: &str, orbit: Option<&str>) -> LaunchRecord {
    LaunchRecord::new(id, name, liftoff())
        .with_mission(name, orbit)
        .with_pad("SLC-40", CAPE)
}

struct FailingSource;

impl TelemetrySource for FailingSource {
    fn match_mission(&self, _launch: &LaunchRecord) -> Result<Option<MissionMatch>, SourceError> {
        Err(SourceError::Request("connection refused".into()))
    }

    fn fetch_simulation(&self, _sim_id: &str) -> Result<SimulationData, SourceError> {
        Err(SourceError::Status(500))
    }
}

struct CannedSource(SimulationData);

impl TelemetrySource for CannedSource {
    fn match_mission(&self, _launch: &LaunchRecord) -> Result<Option<MissionMatch>, SourceError> {
        Ok(Some(MissionMatch {
            flight_club_sim_id: "sim-1".into(),
        }))
    }

    fn fetch_simulation(&self, sim_id: &str) -> Result<SimulationData, SourceError> {
        assert_eq!(sim_id, "sim-1");
        Ok(self.0.clone())
    }
}

/// Two-stage flight heading northeast from the Cape.
fn northeast_simulation(peak_altitude_m: f64, peak_speed: f64) -> SimulationData {
    let frame = |t: f64, fraction: f64, altitude: f64, speed: f64| TelemetryFrame {
        time: t,
        latitude: CAPE.latitude + 6.0 * fraction,
        longitude: CAPE.longitude + 5.0 * fraction,
        altitude,
        speed,
    };
    let booster = (0..=16)
        .map(|i| {
            let t = i as f64 * 10.0;
            let f = t / 540.0;
            frame(t, f * f, 70_000.0 * (t / 160.0), 2_300.0 * (t / 160.0))
        })
        .collect();
    let upper = (0..=15)
        .map(|i| {
            let t = 165.0 + i as f64 * 25.0;
            let f = t / 540.0;
            let g = (t - 165.0) / 375.0;
            frame(
                t,
                f * f,
                70_000.0 + (peak_altitude_m - 70_000.0) * g,
                2_300.0 + (peak_speed - 2_300.0) * g,
            )
        })
        .collect();
    SimulationData {
        stages: vec![
            StageTelemetry {
                stage_number: 2,
                telemetry: upper,
            },
            StageTelemetry {
                stage_number: 1,
                telemetry: booster,
            },
        ],
    }
}

#[test]
fn failing_tiers_fall_through_to_synthesized() {
    let engine = TrajectoryEngine::new(Observer::bermuda()).with_providers(vec![
        Box::new(TelemetryProvider::new(FailingSource)) as Box<dyn TrajectoryProvider>,
        Box::new(ImageDerivedProvider::new(StaticDirectionHints::new())),
    ]);
    let data = engine.resolve(&launch("l-1", "Starlink Group 10-12", Some("Low Earth Orbit")));

    assert_eq!(data.source, TrajectorySource::Synthesized);
    assert_eq!(data.confidence, TrajectoryConfidence::Estimated);
    assert!(data.warnings.iter().any(|w| w.contains("unavailable")));
    assert!(!data.points.is_empty());
}

#[test]
fn empty_chain_still_answers() {
    let engine = TrajectoryEngine::new(Observer::bermuda()).with_providers(Vec::new());
    let data = engine.resolve(&launch("l-2", "GPS III SV08", Some("Medium Earth Orbit")));
    assert_eq!(data.source, TrajectorySource::Synthesized);
}

#[test]
fn synthesized_points_are_time_ordered() {
    let data = get_trajectory_data(
        &launch("l-3", "Crew-10", Some("Low Earth Orbit")),
        &Observer::bermuda(),
    );
    assert!(data.points.windows(2).all(|w| w[0].time < w[1].time));
    assert_eq!(data.trajectory_direction, CompassDirection::Northeast);
    for kind in [FlightEventKind::Meco, FlightEventKind::StageSeparation, FlightEventKind::Seco] {
        assert!(data.event_time(kind).is_some(), "{kind:?}");
    }
}

#[test]
fn missing_pad_assumes_the_cape() {
    let bare = LaunchRecord::new("l-4", "Starlink Group 10-12", liftoff());
    let data = get_trajectory_data(&bare, &Observer::bermuda());
    assert!(data.warnings.iter().any(|w| w.contains("Cape Canaveral")));
    let first = &data.points[0];
    assert!((first.latitude - CAPE.latitude).abs() < 0.01);
}

#[test]
fn high_confidence_mapping_overrides_image_direction() {
    let x37b = launch("otv-7", "Falcon Heavy | USSF-52 (X-37B OTV-7)", None);
    let hints = StaticDirectionHints::new().with_hint(
        "otv-7",
        DirectionHint {
            label: Some("Southeast".into()),
            image_url: None,
        },
    );
    let engine = TrajectoryEngine::new(Observer::bermuda())
        .with_providers(vec![Box::new(ImageDerivedProvider::new(hints))]);
    let data = engine.resolve(&x37b);

    assert_eq!(data.trajectory_direction, CompassDirection::Northeast);
    assert_eq!(data.source, TrajectorySource::ImageDerived);
    assert_eq!(data.confidence, TrajectoryConfidence::Projected);
    assert!(data.warnings.iter().any(|w| w.contains("overridden")));
}

#[test]
fn medium_confidence_mapping_defers_to_data() {
    let starlink = launch("l-5", "Starlink Group 10-12", Some("Low Earth Orbit"));
    let mapping = get_trajectory_mapping(&starlink);
    let data = TrajectoryData::new(
        Vec::new(),
        TrajectorySource::ImageDerived,
        TrajectoryConfidence::Projected,
        CompassDirection::Southeast,
    );
    let decision = reconcile_direction(&mapping, &data);
    assert!(!decision.needs_invalidation);
    assert_eq!(decision.direction, CompassDirection::Southeast);
}

#[test]
fn stale_cached_direction_is_invalidated() {
    let x37b = launch("otv-7", "Falcon Heavy | USSF-52 (X-37B OTV-7)", None);
    let now = liftoff() - Duration::days(3);
    let cache = Arc::new(InMemoryTrajectoryCache::new());
    cache.put(
        "otv-7",
        TrajectoryData::new(
            Vec::new(),
            TrajectorySource::Synthesized,
            TrajectoryConfidence::Estimated,
            CompassDirection::Southeast,
        ),
        now,
        Duration::hours(6),
    );

    let engine = TrajectoryEngine::new(Observer::bermuda())
        .with_cache(Box::new(Arc::clone(&cache)), CachePolicy::default());
    let data = engine.get_trajectory_data(&x37b, now);
    assert_eq!(data.trajectory_direction, CompassDirection::Northeast);

    let cached = cache.get("otv-7", now).expect("fresh entry stored");
    assert_eq!(cached.data.trajectory_direction, CompassDirection::Northeast);
    assert!(!cached.data.points.is_empty());
    // Three days out falls in the six-hour tier.
    assert_eq!(cached.expires_at - cached.stored_at, Duration::hours(6));
}

#[test]
fn cache_hit_skips_reconstruction() {
    let starlink = launch("l-6", "Starlink Group 10-12", Some("Low Earth Orbit"));
    let now = liftoff() - Duration::hours(1);
    let cache = Arc::new(InMemoryTrajectoryCache::new());
    let engine = TrajectoryEngine::new(Observer::bermuda())
        .with_cache(Box::new(Arc::clone(&cache)), CachePolicy::default());

    let first = engine.get_trajectory_data(&starlink, now);
    assert_eq!(cache.len(), 1);
    let second = engine.get_trajectory_data(&starlink, now + Duration::minutes(5));
    assert_eq!(first, second);
}

#[test]
fn ttl_tiers() {
    let policy = CachePolicy::default();
    let ttl = |d: Duration| cache_ttl(d, &policy);
    assert_eq!(ttl(Duration::days(8)), Duration::hours(24));
    assert_eq!(ttl(Duration::hours(168)), Duration::hours(6));
    assert_eq!(ttl(Duration::days(2)), Duration::hours(6));
    assert_eq!(ttl(Duration::hours(7)), Duration::hours(2));
    assert_eq!(ttl(Duration::hours(3)), Duration::hours(1));
    assert_eq!(ttl(Duration::hours(1)), Duration::minutes(30));
    assert_eq!(ttl(Duration::hours(-5)), Duration::minutes(30));
}

#[test]
fn expired_entries_are_dropped() {
    let cache = InMemoryTrajectoryCache::new();
    let now = liftoff();
    let data = get_trajectory_data(&launch("l-7", "Crew-10", None), &Observer::bermuda());
    cache.put("l-7", data, now, Duration::minutes(30));
    assert!(cache.get("l-7", now + Duration::minutes(29)).is_some());
    assert!(cache.get("l-7", now + Duration::minutes(31)).is_none());
    assert!(cache.is_empty());
    assert!(!cache.invalidate("l-7"));
}

#[test]
fn implausible_orbital_telemetry_is_rejected() {
    let engine = TrajectoryEngine::new(Observer::bermuda()).with_providers(vec![
        Box::new(TelemetryProvider::new(CannedSource(northeast_simulation(60_000.0, 3_000.0))))
            as Box<dyn TrajectoryProvider>,
        Box::new(SynthesizedProvider::default()),
    ]);
    let data = engine.resolve(&launch("l-8", "Starlink Group 10-12", Some("Low Earth Orbit")));
    assert_eq!(data.source, TrajectorySource::Synthesized);
    assert!(data.warnings.iter().any(|w| w.contains("implausible")));
}

#[test]
fn orbital_keywords_match_whole_words_only() {
    let sounding = LaunchRecord::new("l-10", "Suborbital Sounding Rocket | Commission Test", liftoff())
        .with_mission("Atmospheric Mission", Some("Suborbital"))
        .with_pad("LC-46", CAPE);
    assert!(!is_orbital_mission(&sounding));
    assert!(is_orbital_mission(&launch("l-11", "CRS-32 Dragon", None)));
    assert!(is_orbital_mission(&launch("l-12", "Crew-10 to the ISS", None)));

    let engine = TrajectoryEngine::new(Observer::bermuda()).with_providers(vec![
        Box::new(TelemetryProvider::new(CannedSource(northeast_simulation(105_000.0, 1_000.0))))
            as Box<dyn TrajectoryProvider>,
        Box::new(SynthesizedProvider::default()),
    ]);
    let data = engine.resolve(&sounding);
    assert_eq!(data.source, TrajectorySource::RealTelemetry);
    assert!(!data.warnings.iter().any(|w| w.contains("implausible")));
}

#[test]
fn real_telemetry_is_used_when_plausible() {
    let engine = TrajectoryEngine::new(Observer::bermuda()).with_providers(vec![Box::new(
        TelemetryProvider::new(CannedSource(northeast_simulation(210_000.0, 7_600.0))),
    )]);
    let data = engine.resolve(&launch("l-9", "Starlink Group 10-12", Some("Low Earth Orbit")));

    assert_eq!(data.source, TrajectorySource::RealTelemetry);
    assert_eq!(data.confidence, TrajectoryConfidence::Confirmed);
    assert_eq!(data.trajectory_direction, CompassDirection::Northeast);
    assert_eq!(data.event_time(FlightEventKind::Meco), Some(160.0));
    assert_eq!(data.event_time(FlightEventKind::StageSeparation), Some(165.0));
    assert_eq!(data.event_time(FlightEventKind::Seco), Some(540.0));
    assert!(data.points.windows(2).all(|w| w[0].time < w[1].time));
    assert!(data.warnings.is_empty());
}
