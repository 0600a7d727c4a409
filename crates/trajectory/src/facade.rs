//! Re-exported APIs for consumers of the trajectory crate.

pub use crate::cache::{CacheEntry, InMemoryTrajectoryCache, TrajectoryCache, cache_ttl};
pub use crate::mapping::{
    MappingConfidence, MappingSource, MissionDirective, OrbitEstimate, OrbitFamily, StarlinkGroup,
    TrajectoryMapping, azimuth_to_direction, classify_orbit, get_trajectory_mapping,
    launch_azimuth, resolve_directive,
};
pub use crate::model::{
    EngineStatus, FlightEvent, FlightEventKind, FlightStage, TrajectoryConfidence, TrajectoryData,
    TrajectoryPoint, TrajectorySource, VisibilityWindow,
};
pub use crate::reconstruction::image::{
    DirectionHint, DirectionHintSource, ImageDerivedProvider, StaticDirectionHints,
};
pub use crate::reconstruction::profile::{AscentProfile, SynthesizedProvider};
pub use crate::reconstruction::telemetry::{
    MissionMatch, SimulationData, SourceError, StageTelemetry, TelemetryFrame, TelemetryProvider,
    TelemetrySource, is_orbital_mission,
};
pub use crate::reconstruction::{
    DirectionDecision, ProviderError, ReconstructionRequest, TrajectoryEngine, TrajectoryProvider,
    get_trajectory_data, reconcile_direction,
};
