//! End-to-end analysis of one launch: mapping, trajectory, verdict and plume.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use tracker_config::TrackerConfig;
use tracker_core::LaunchRecord;
use tracker_importer::{FlightClubClient, ImportError, SolarApiClient, direction_hints_from_config};
use tracker_plume::{PlumeIlluminationPrediction, PlumePredictor};
use tracker_solar::{CalculatedSolarData, SolarDataSource, solar_position};
use tracker_trajectory::{
    ImageDerivedProvider, InMemoryTrajectoryCache, SynthesizedProvider, TelemetryProvider,
    TrajectoryData, TrajectoryEngine, TrajectoryMapping, TrajectoryProvider,
    get_trajectory_mapping,
};
use tracker_visibility::{
    DelayImpactAnalysis, VisibilityInput, VisibilityVerdict, calculate_visibility,
    compare_scenarios,
};

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("failed to set up upstream source: {0}")]
    Import(#[from] ImportError),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchAnalysis {
    pub launch_id: String,
    pub mapping: TrajectoryMapping,
    pub trajectory: TrajectoryData,
    pub verdict: VisibilityVerdict,
    /// Absent when the launch time cannot be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plume: Option<PlumeIlluminationPrediction>,
}

pub struct LaunchAnalyzer {
    config: TrackerConfig,
    engine: TrajectoryEngine,
    solar: Box<dyn SolarDataSource>,
    plume: PlumePredictor,
}

impl LaunchAnalyzer {
    /// Offline analyzer: synthesized trajectories behind an in-memory cache and
    /// solar times computed locally.
    pub fn new(config: TrackerConfig) -> Self {
        let engine = TrajectoryEngine::new(config.observer.clone()).with_cache(
            Box::new(InMemoryTrajectoryCache::new()),
            config.cache.clone(),
        );
        let plume = PlumePredictor::new(config.observer.clone(), config.plume.clone());
        Self {
            config,
            engine,
            solar: Box::new(CalculatedSolarData),
            plume,
        }
    }

    /// Analyzer wired to the upstream services named in `config.sources`;
    /// services left unconfigured fall back to their offline counterparts.
    pub fn from_config(config: TrackerConfig) -> Result<Self, AnalyzerError> {
        let mut providers: Vec<Box<dyn TrajectoryProvider>> = Vec::new();
        if let Some(client) = FlightClubClient::from_config(&config.sources)? {
            info!("telemetry source enabled");
            providers.push(Box::new(TelemetryProvider::new(client)));
        }
        if let Some(hints) = direction_hints_from_config(&config.sources)? {
            info!(count = hints.len(), "direction hints enabled");
            providers.push(Box::new(ImageDerivedProvider::new(hints)));
        }
        providers.push(Box::new(SynthesizedProvider::default()));

        let solar: Box<dyn SolarDataSource> = match SolarApiClient::from_config(&config.sources)? {
            Some(client) => Box::new(client),
            None => Box::new(CalculatedSolarData),
        };

        let engine = TrajectoryEngine::new(config.observer.clone())
            .with_providers(providers)
            .with_cache(Box::new(InMemoryTrajectoryCache::new()), config.cache.clone());
        Ok(Self::new(config).with_engine(engine).with_solar_source(solar))
    }

    pub fn with_engine(mut self, engine: TrajectoryEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_solar_source(mut self, solar: Box<dyn SolarDataSource>) -> Self {
        self.solar = solar;
        self
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Full analysis of `launch` as of `now`. Never fails; missing inputs
    /// show up as a `none` verdict and warnings.
    pub fn analyze(&self, launch: &LaunchRecord, now: DateTime<Utc>) -> LaunchAnalysis {
        let mapping = get_trajectory_mapping(launch);
        let trajectory = self.engine.get_trajectory_data(launch, now);
        let liftoff = launch.liftoff_time();
        let sun = liftoff.map(|t| solar_position(t, &self.config.observer));

        let verdict = calculate_visibility(&VisibilityInput {
            launch,
            trajectory: Some(&trajectory),
            solar: sun.as_ref(),
            observer: &self.config.observer,
            params: &self.config.visibility,
        });
        let plume = liftoff.map(|t| self.plume.predict(t, self.solar.as_ref()));

        info!(
            launch = %launch.id,
            likelihood = %verdict.likelihood,
            source = ?trajectory.source,
            "launch analysed"
        );
        LaunchAnalysis {
            launch_id: launch.id.clone(),
            mapping,
            trajectory,
            verdict,
            plume,
        }
    }

    /// Impact of moving `launch` from `old_time` to `new_time` (ISO-8601 UTC).
    pub fn delay_impact(
        &self,
        launch: &LaunchRecord,
        old_time: &str,
        new_time: &str,
    ) -> DelayImpactAnalysis {
        let trajectory = self.engine.resolve(launch);
        compare_scenarios(
            launch,
            old_time,
            new_time,
            Some(&trajectory),
            &self.config.observer,
            &self.config.visibility,
        )
    }
}
