//! Trajectory reconstruction through an ordered chain of providers.
//!
//! Each [`TrajectoryProvider`] either answers, declines (`Ok(None)`), or fails.
//! Failures are logged and recorded as warnings on whatever tier answers
//! next; the synthesized ascent closes the chain so a launch always gets a
//! trajectory.

pub mod image;
pub mod profile;
pub mod telemetry;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};
use tracker_config::CachePolicy;
use tracker_core::{CompassDirection, GeoPoint, LaunchRecord, Observer};

use crate::cache::{TrajectoryCache, cache_ttl};
use crate::mapping::{TrajectoryMapping, get_trajectory_mapping};
use crate::model::{TrajectoryConfidence, TrajectoryData, TrajectorySource};

use self::profile::{AscentProfile, SynthesizedProvider};
use self::telemetry::SourceError;

/// Pad used when a launch carries no usable coordinates (SLC-40, Cape Canaveral).
pub const DEFAULT_PAD: GeoPoint = GeoPoint::new(28.5618, -80.5772);

/// Why a tier could not produce a trajectory.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(
        "telemetry implausible for an orbital mission (max altitude {max_altitude_km:.1} km, max speed {max_speed_km_s:.2} km/s)"
    )]
    ImplausibleTelemetry {
        max_altitude_km: f64,
        max_speed_km_s: f64,
    },
    #[error("telemetry contained no frames")]
    EmptyTelemetry,
}

/// Everything a provider needs to reconstruct one launch.
#[derive(Debug, Clone, Copy)]
pub struct ReconstructionRequest<'a> {
    pub launch: &'a LaunchRecord,
    pub pad: GeoPoint,
    pub observer: &'a Observer,
    pub mapping: &'a TrajectoryMapping,
}

pub trait TrajectoryProvider: Send + Sync {
    fn name(&self) -> &'static str;
    fn provide(
        &self,
        request: &ReconstructionRequest<'_>,
    ) -> Result<Option<TrajectoryData>, ProviderError>;
}

/// Outcome of checking a trajectory's direction against the mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionDecision {
    pub direction: CompassDirection,
    /// The cached trajectory disagrees with an authoritative mapping.
    pub needs_invalidation: bool,
}

/// A high-confidence mapping wins any disagreement; otherwise the data stands.
pub fn reconcile_direction(
    mapping: &TrajectoryMapping,
    data: &TrajectoryData,
) -> DirectionDecision {
    if mapping.direction != data.trajectory_direction && mapping.is_high_confidence() {
        DirectionDecision {
            direction: mapping.direction,
            needs_invalidation: true,
        }
    } else {
        DirectionDecision {
            direction: data.trajectory_direction,
            needs_invalidation: false,
        }
    }
}

pub struct TrajectoryEngine {
    observer: Observer,
    providers: Vec<Box<dyn TrajectoryProvider>>,
    cache: Option<Box<dyn TrajectoryCache>>,
    cache_policy: CachePolicy,
    profile: AscentProfile,
}

impl TrajectoryEngine {
    /// Engine with the offline chain: the synthesized ascent only.
    pub fn new(observer: Observer) -> Self {
        Self {
            observer,
            providers: vec![Box::new(SynthesizedProvider::default())],
            cache: None,
            cache_policy: CachePolicy::default(),
            profile: AscentProfile::default(),
        }
    }

    /// Replace the provider chain. Order is precedence.
    pub fn with_providers(mut self, providers: Vec<Box<dyn TrajectoryProvider>>) -> Self {
        self.providers = providers;
        self
    }

    pub fn with_cache(mut self, cache: Box<dyn TrajectoryCache>, policy: CachePolicy) -> Self {
        self.cache = Some(cache);
        self.cache_policy = policy;
        self
    }

    pub fn observer(&self) -> &Observer {
        &self.observer
    }

    /// Cached trajectory for the launch, recomputed when missing, expired, or
    /// contradicted by a high-confidence mapping.
    pub fn get_trajectory_data(&self, launch: &LaunchRecord, now: DateTime<Utc>) -> TrajectoryData {
        let mapping = get_trajectory_mapping(launch);

        if let Some(cache) = &self.cache {
            if let Some(entry) = cache.get(&launch.id, now) {
                let decision = reconcile_direction(&mapping, &entry.data);
                if !decision.needs_invalidation {
                    debug!(launch = %launch.id, "trajectory cache hit");
                    return entry.data;
                }
                warn!(
                    launch = %launch.id,
                    cached = %entry.data.trajectory_direction,
                    mapped = %mapping.direction,
                    "cached trajectory contradicts mapping; invalidating"
                );
                cache.invalidate(&launch.id);
            }
        }

        let data = self.reconstruct(launch, &mapping);

        if let Some(cache) = &self.cache {
            let time_to_launch = launch
                .liftoff_time()
                .map(|t| t - now)
                .unwrap_or_else(Duration::zero);
            let ttl = cache_ttl(time_to_launch, &self.cache_policy);
            debug!(launch = %launch.id, ttl_minutes = ttl.num_minutes(), "caching trajectory");
            cache.put(&launch.id, data.clone(), now, ttl);
        }
        data
    }

    /// Run the provider chain without touching the cache.
    pub fn resolve(&self, launch: &LaunchRecord) -> TrajectoryData {
        let mapping = get_trajectory_mapping(launch);
        self.reconstruct(launch, &mapping)
    }

    fn reconstruct(&self, launch: &LaunchRecord, mapping: &TrajectoryMapping) -> TrajectoryData {
        let mut warnings = Vec::new();
        let pad = match launch.pad_coordinates() {
            Some(pad) => pad,
            None => {
                warn!(launch = %launch.id, "launch has no pad coordinates; assuming Cape Canaveral");
                warnings.push("Pad coordinates missing; assumed Cape Canaveral".to_string());
                DEFAULT_PAD
            }
        };
        let request = ReconstructionRequest {
            launch,
            pad,
            observer: &self.observer,
            mapping,
        };

        let mut answer = None;
        for provider in &self.providers {
            match provider.provide(&request) {
                Ok(Some(data)) => {
                    info!(launch = %launch.id, tier = provider.name(), "trajectory reconstructed");
                    answer = Some(data);
                    break;
                }
                Ok(None) => debug!(launch = %launch.id, tier = provider.name(), "tier declined"),
                Err(err) => {
                    warn!(launch = %launch.id, tier = provider.name(), error = %err, "tier failed");
                    warnings.push(format!("{} unavailable: {err}", provider.name()));
                }
            }
        }

        let mut data = match answer {
            Some(data) => data,
            None => {
                debug!(launch = %launch.id, "no tier answered; using synthesized ascent");
                self.synthesize(&request, TrajectorySource::Synthesized)
            }
        };
        warnings.append(&mut data.warnings);
        data.warnings = warnings;

        let decision = reconcile_direction(mapping, &data);
        if decision.needs_invalidation {
            data = self.apply_override(data, &request);
        }
        data
    }

    /// Force the mapping's direction onto the data. Telemetry keeps its points;
    /// modelled tiers are re-flown along the mapping azimuth.
    fn apply_override(
        &self,
        data: TrajectoryData,
        request: &ReconstructionRequest<'_>,
    ) -> TrajectoryData {
        let from = data.trajectory_direction;
        let to = request.mapping.direction;
        let mut warnings = data.warnings.clone();
        warnings.push(format!(
            "Trajectory direction {from} overridden to {to} by {}",
            request.mapping.note
        ));

        let mut fixed = if data.source == TrajectorySource::RealTelemetry {
            let mut kept = data;
            kept.trajectory_direction = to;
            kept
        } else {
            let mut rebuilt = self.synthesize(request, data.source);
            rebuilt.confidence = data.confidence;
            rebuilt
        };
        fixed.warnings = warnings;
        fixed
    }

    fn synthesize(
        &self,
        request: &ReconstructionRequest<'_>,
        source: TrajectorySource,
    ) -> TrajectoryData {
        let mut data = self.profile.trajectory(
            request.pad,
            request.mapping.azimuth,
            request.observer.location,
            source,
            TrajectoryConfidence::Estimated,
        );
        data.trajectory_direction = request.mapping.direction;
        data
    }
}

/// Trajectory from the offline chain, uncached.
pub fn get_trajectory_data(launch: &LaunchRecord, observer: &Observer) -> TrajectoryData {
    TrajectoryEngine::new(observer.clone()).resolve(launch)
}
