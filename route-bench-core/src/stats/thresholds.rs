//! Threshold rules for labeling engine-vs-reference differences.
//!
//! Two rule sets coexist on purpose: the binary band rule and the graded
//! rule are used by different report tables and produce different labels for
//! the same difference. They are kept as separate named functions, and the
//! policy that produced a label is always recorded next to it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label attached to a difference between engine and reference means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Evaluation {
    Good,
    Ok,
    Acceptable,
    Bad,
}

impl fmt::Display for Evaluation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Evaluation::Good => "good",
            Evaluation::Ok => "ok",
            Evaluation::Acceptable => "acceptable",
            Evaluation::Bad => "bad",
        };
        f.write_str(label)
    }
}

/// Band rule for distance (km) and mean-speed (km/h) differences:
/// within +/-10 is "ok", anything beyond is "bad".
pub fn band_evaluation(difference: f64) -> Evaluation {
    if difference.abs() <= 10.0 {
        Evaluation::Ok
    } else {
        Evaluation::Bad
    }
}

/// Band rule for duration differences, in seconds: within +/-600 s is "ok".
pub fn duration_band_evaluation(difference_secs: f64) -> Evaluation {
    if difference_secs.abs() <= 600.0 {
        Evaluation::Ok
    } else {
        Evaluation::Bad
    }
}

/// Graded rule: an exact zero difference is "good", a magnitude above 10 is
/// "bad", everything in between is "acceptable".
pub fn graded_evaluation(difference: f64) -> Evaluation {
    if difference == 0.0 {
        Evaluation::Good
    } else if difference.abs() > 10.0 {
        Evaluation::Bad
    } else {
        Evaluation::Acceptable
    }
}

/// Which rule set the evaluator applies to grouped differences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdPolicy {
    /// Binary band rules: [`band_evaluation`] for distance and speed,
    /// [`duration_band_evaluation`] for duration.
    #[default]
    Band,
    /// [`graded_evaluation`] for all three metrics, duration included
    /// (applied to the difference in seconds).
    Graded,
}

impl ThresholdPolicy {
    /// Evaluate a distance or mean-speed difference under this policy.
    pub fn evaluate(&self, difference: f64) -> Evaluation {
        match self {
            ThresholdPolicy::Band => band_evaluation(difference),
            ThresholdPolicy::Graded => graded_evaluation(difference),
        }
    }

    /// Evaluate a duration difference (seconds) under this policy.
    pub fn evaluate_duration(&self, difference_secs: f64) -> Evaluation {
        match self {
            ThresholdPolicy::Band => duration_band_evaluation(difference_secs),
            ThresholdPolicy::Graded => graded_evaluation(difference_secs),
        }
    }
}
