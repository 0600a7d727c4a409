//! Visibility verdicts for launches seen from Bermuda, and how a schedule
//! change moves them.

pub mod delay;
pub mod synthesizer;

pub use delay::{DelayImpact, DelayImpactAnalysis, Severity, compare_scenarios};
pub use synthesizer::{
    DataSource, Likelihood, VisibilityInput, VisibilityVerdict, calculate_visibility,
    likelihood_for_score,
};
