//! Bermuda rocket tracker: will a launch be visible from Bermuda, where to
//! look, and whether its plume will light up at twilight.
//!
//! The computation lives in the member crates; this façade re-exports them and
//! adds the end-to-end [`LaunchAnalyzer`] plus logging setup.

pub mod analysis;
pub mod logging;

pub use analysis::{AnalyzerError, LaunchAnalysis, LaunchAnalyzer};
pub use logging::init_logging;

pub use tracker_config as config;
pub use tracker_core as core;
pub use tracker_export as export;
pub use tracker_geodesy as geodesy;
pub use tracker_importer as importer;
pub use tracker_plume as plume;
pub use tracker_solar as solar;
pub use tracker_trajectory as trajectory;
pub use tracker_visibility as visibility;

/// Returns the version of the library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
