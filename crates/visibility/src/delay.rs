//! What a schedule slip does to a launch's visibility.

use serde::{Deserialize, Serialize};
use tracker_config::VisibilityParams;
use tracker_core::{LaunchRecord, Observer};
use tracker_core::time::parse_utc;
use tracker_solar::TwilightPhase;
use tracker_trajectory::TrajectoryData;

use crate::synthesizer::{Likelihood, VisibilityInput, VisibilityVerdict, calculate_visibility};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DelayImpact {
    VisibilityImproved,
    VisibilityDegraded,
    WindowGained,
    WindowLost,
    MinorChange,
    NoImpact,
    UnknownImpact,
}

impl DelayImpact {
    pub fn severity(self) -> Severity {
        match self {
            Self::WindowLost => Severity::Critical,
            Self::WindowGained | Self::VisibilityImproved | Self::VisibilityDegraded => {
                Severity::Significant
            }
            Self::MinorChange | Self::UnknownImpact => Severity::Minor,
            Self::NoImpact => Severity::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    None,
    Minor,
    Significant,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelayImpactAnalysis {
    pub impact: DelayImpact,
    pub severity: Severity,
    pub message: String,
    pub old_time: String,
    pub new_time: String,
    pub old_verdict: VisibilityVerdict,
    pub new_verdict: VisibilityVerdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_phase: Option<TwilightPhase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_phase: Option<TwilightPhase>,
    pub score_change: f64,
}

/// Compare the verdicts for `launch` at its old and new NET (ISO-8601 UTC).
pub fn compare_scenarios(
    launch: &LaunchRecord,
    old_time: &str,
    new_time: &str,
    trajectory: Option<&TrajectoryData>,
    observer: &Observer,
    params: &VisibilityParams,
) -> DelayImpactAnalysis {
    let verdict_at = |net: &str| {
        let mut moved = launch.clone();
        moved.net = net.to_string();
        calculate_visibility(&VisibilityInput {
            launch: &moved,
            trajectory,
            solar: None,
            observer,
            params,
        })
    };
    let old_verdict = verdict_at(old_time);
    let new_verdict = verdict_at(new_time);
    let old_phase = old_verdict.twilight_phase;
    let new_phase = new_verdict.twilight_phase;
    let score_change = new_verdict.score - old_verdict.score;

    let inputs_valid = launch.pad_coordinates().is_some()
        && parse_utc(old_time).is_some()
        && parse_utc(new_time).is_some();
    let impact = classify(
        inputs_valid,
        &old_verdict,
        &new_verdict,
        score_change,
        params.minor_change_threshold,
    );

    DelayImpactAnalysis {
        impact,
        severity: impact.severity(),
        message: message(impact, &old_verdict, &new_verdict),
        old_time: old_time.to_string(),
        new_time: new_time.to_string(),
        old_verdict,
        new_verdict,
        old_phase,
        new_phase,
        score_change,
    }
}

fn classify(
    inputs_valid: bool,
    old: &VisibilityVerdict,
    new: &VisibilityVerdict,
    score_change: f64,
    minor_threshold: f64,
) -> DelayImpact {
    if !inputs_valid {
        return DelayImpact::UnknownImpact;
    }
    if old.likelihood == Likelihood::None && new.likelihood == Likelihood::None {
        return DelayImpact::NoImpact;
    }
    // Crossing between day and dark outranks a window opening or closing.
    let dark = |phase: Option<TwilightPhase>| phase.map(TwilightPhase::is_dark);
    match (dark(old.twilight_phase), dark(new.twilight_phase)) {
        (Some(false), Some(true)) => return DelayImpact::VisibilityImproved,
        (Some(true), Some(false)) => return DelayImpact::VisibilityDegraded,
        _ => {}
    }
    match (old.likelihood, new.likelihood) {
        (Likelihood::None, _) => return DelayImpact::WindowGained,
        (_, Likelihood::None) => return DelayImpact::WindowLost,
        _ => {}
    }
    if new.likelihood > old.likelihood {
        DelayImpact::VisibilityImproved
    } else if new.likelihood < old.likelihood {
        DelayImpact::VisibilityDegraded
    } else if score_change.abs() >= minor_threshold {
        DelayImpact::MinorChange
    } else {
        DelayImpact::NoImpact
    }
}

fn message(impact: DelayImpact, old: &VisibilityVerdict, new: &VisibilityVerdict) -> String {
    match impact {
        DelayImpact::UnknownImpact => {
            "Visibility impact unknown: launch time or site could not be read".to_string()
        }
        DelayImpact::NoImpact => "Delay does not change visibility from Bermuda".to_string(),
        DelayImpact::WindowGained => format!(
            "New time makes the launch visible from Bermuda ({} likelihood)",
            new.likelihood
        ),
        DelayImpact::WindowLost => format!(
            "New time makes the launch invisible from Bermuda (was {} likelihood)",
            old.likelihood
        ),
        DelayImpact::VisibilityImproved => format!(
            "Visibility improves from {} to {}: {}",
            old.likelihood, new.likelihood, new.reason
        ),
        DelayImpact::VisibilityDegraded => format!(
            "Visibility worsens from {} to {}: {}",
            old.likelihood, new.likelihood, new.reason
        ),
        DelayImpact::MinorChange => format!(
            "Visibility stays {} with a small change in conditions",
            new.likelihood
        ),
    }
}
