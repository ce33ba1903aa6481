//! Correlation between two numeric series, used diagnostically (e.g. request
//! round-trip time against route distance or duration). Not part of the
//! engine-evaluation pipeline.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors raised by the correlation functions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CorrelationError {
    #[error("cannot correlate empty series")]
    EmptySample,

    #[error("series lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },
}

/// Pearson and Spearman correlation coefficients for one pair of series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Correlation {
    pub pearson: f64,
    pub spearman: f64,
}

/// Interpretation band for a correlation coefficient's magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strength {
    Weak,
    Moderate,
    Strong,
}

impl Strength {
    /// |r| < 0.3 is weak, |r| < 0.7 moderate, anything above strong.
    pub fn of(coefficient: f64) -> Strength {
        let magnitude = coefficient.abs();
        if magnitude < 0.3 {
            Strength::Weak
        } else if magnitude < 0.7 {
            Strength::Moderate
        } else {
            Strength::Strong
        }
    }
}

impl fmt::Display for Strength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Strength::Weak => "weak",
            Strength::Moderate => "moderate",
            Strength::Strong => "strong",
        };
        f.write_str(label)
    }
}

/// Correlate two equal-length series.
///
/// Pearson is the standard product-moment coefficient; Spearman is Pearson
/// over the rank-transformed series, with ties receiving their average rank.
/// A series with zero variance yields a coefficient of 0 rather than NaN.
///
/// # Errors
///
/// [`CorrelationError::EmptySample`] on empty input,
/// [`CorrelationError::LengthMismatch`] when the lengths differ.
pub fn correlate(xs: &[f64], ys: &[f64]) -> Result<Correlation, CorrelationError> {
    if xs.len() != ys.len() {
        return Err(CorrelationError::LengthMismatch {
            left: xs.len(),
            right: ys.len(),
        });
    }
    if xs.is_empty() {
        return Err(CorrelationError::EmptySample);
    }

    Ok(Correlation {
        pearson: pearson(xs, ys),
        spearman: pearson(&average_ranks(xs), &average_ranks(ys)),
    })
}

/// Correlate a list of (x, y) pairs. Convenience over [`correlate`].
pub fn correlate_pairs(pairs: &[(f64, f64)]) -> Result<Correlation, CorrelationError> {
    let xs: Vec<f64> = pairs.iter().map(|&(x, _)| x).collect();
    let ys: Vec<f64> = pairs.iter().map(|&(_, y)| y).collect();
    correlate(&xs, &ys)
}

/// Min-max normalize a series into [0, 1]. A constant series maps to all
/// zeros rather than dividing by zero.
pub fn normalize_min_max(values: &[f64]) -> Vec<f64> {
    let Some(first) = values.first() else {
        return Vec::new();
    };
    let (min, max) = values.iter().fold((*first, *first), |(lo, hi), &v| {
        (lo.min(v), hi.max(v))
    });
    let range = max - min;
    if range == 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| (v - min) / range).collect()
}

fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        0.0
    } else {
        covariance / denominator
    }
}

/// 1-based ranks with ties assigned the average of the positions they span.
fn average_ranks(values: &[f64]) -> Vec<f64> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; values.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && values[order[j + 1]] == values[order[i]] {
            j += 1;
        }
        let rank = (i + j) as f64 / 2.0 + 1.0;
        for &index in &order[i..=j] {
            ranks[index] = rank;
        }
        i = j + 1;
    }
    ranks
}
