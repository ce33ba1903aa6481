//! Descriptive statistics over materialized numeric samples.
//!
//! The formulas are fixed for reproducibility with previously published
//! benchmark reports: population standard deviation, excess kurtosis, and
//! nearest-rank quartiles at `floor(n/4)` / `floor(3n/4)` of the zero-indexed
//! sorted sample rather than interpolated quartiles.

use serde::Serialize;
use thiserror::Error;

/// Errors raised by the statistics functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    /// Statistics over zero observations are undefined. Callers must decide
    /// how to represent missing groups; defaulting to zero here would mask
    /// missing-data bugs.
    #[error("cannot compute statistics over an empty sample")]
    EmptySample,
}

/// Descriptive statistics of one numeric sample.
///
/// Values are stored at full precision; use [`SampleStats::rounded`] at the
/// presentation boundary. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleStats {
    pub mean: f64,
    pub median: f64,
    /// Population standard deviation (divides by n, not n-1).
    pub std_dev: f64,
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
    pub iqr: f64,
    pub skewness: f64,
    /// Excess kurtosis (normal distribution = 0).
    pub kurtosis: f64,
    pub min: f64,
    pub max: f64,
    /// Most frequent value(s), ascending. A single element when the mode is
    /// unique, all tied values otherwise.
    pub mode: Vec<f64>,
    /// Rough normality flag: |skewness| < 0.5 and |kurtosis| < 0.5.
    pub normal: bool,
    /// Sample size the statistics were computed from.
    pub count: usize,
}

impl SampleStats {
    /// A copy with every numeric field rounded to two decimals, for display
    /// and serialization. Derived quantities (differences of means) must be
    /// computed from the full-precision values, not from this.
    pub fn rounded(&self) -> SampleStats {
        SampleStats {
            mean: round2(self.mean),
            median: round2(self.median),
            std_dev: round2(self.std_dev),
            q1: round2(self.q1),
            q2: round2(self.q2),
            q3: round2(self.q3),
            iqr: round2(self.iqr),
            skewness: round2(self.skewness),
            kurtosis: round2(self.kurtosis),
            min: round2(self.min),
            max: round2(self.max),
            mode: self.mode.iter().copied().map(round2).collect(),
            normal: self.normal,
            count: self.count,
        }
    }
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute descriptive statistics for a sample.
///
/// # Errors
///
/// Returns [`StatsError::EmptySample`] for a zero-length sample.
pub fn compute(sample: &[f64]) -> Result<SampleStats, StatsError> {
    if sample.is_empty() {
        return Err(StatsError::EmptySample);
    }

    let n = sample.len();
    let nf = n as f64;
    let mean = sample.iter().sum::<f64>() / nf;

    let mut sorted = sample.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let median = if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    };

    // Nearest-rank quartiles, zero-indexed. 3n/4 < n for all n >= 1.
    let q1 = sorted[n / 4];
    let q2 = median;
    let q3 = sorted[n * 3 / 4];

    let variance = sample.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / nf;
    let std_dev = variance.sqrt();

    // Constant samples define skewness and kurtosis as 0 rather than NaN.
    let (skewness, kurtosis) = if std_dev == 0.0 {
        (0.0, 0.0)
    } else {
        let m3 = sample.iter().map(|x| (x - mean).powi(3)).sum::<f64>() / nf;
        let m4 = sample.iter().map(|x| (x - mean).powi(4)).sum::<f64>() / nf;
        (m3 / std_dev.powi(3), m4 / std_dev.powi(4) - 3.0)
    };

    let normal = skewness.abs() < 0.5 && kurtosis.abs() < 0.5;

    Ok(SampleStats {
        mean,
        median,
        std_dev,
        q1,
        q2,
        q3,
        iqr: q3 - q1,
        skewness,
        kurtosis,
        min: sorted[0],
        max: sorted[n - 1],
        mode: mode_of_sorted(&sorted),
        normal,
        count: n,
    })
}

/// Most frequent value(s) of an ascending-sorted sample, by run-length
/// counting. Ties are returned in ascending order.
fn mode_of_sorted(sorted: &[f64]) -> Vec<f64> {
    let mut modes = Vec::new();
    let mut max_run = 0usize;
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j + 1 < sorted.len() && sorted[j + 1] == sorted[i] {
            j += 1;
        }
        let run = j - i + 1;
        if run > max_run {
            max_run = run;
            modes.clear();
            modes.push(sorted[i]);
        } else if run == max_run {
            modes.push(sorted[i]);
        }
        i = j + 1;
    }
    modes
}

mod thresholds;
pub use thresholds::{
    band_evaluation, duration_band_evaluation, graded_evaluation, Evaluation, ThresholdPolicy,
};
