//! Snapshot comparison: the directional difference and better/worse verdict
//! between two independently assembled multi-dataset results.
//!
//! Verdicts always compare the absolute deviation from the reference: the
//! snapshot whose engine sits closer to the reference wins, regardless of
//! sign. Duration values are stored in seconds internally and converted to
//! minutes at this output boundary.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::evaluate::{DatasetAssembly, GroupedDifference};

/// Errors raised when two snapshots cannot be paired up.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CompareError {
    /// Positional comparison requires the same number of datasets on both
    /// sides.
    #[error("snapshots contain {left} and {right} datasets; positional comparison requires equal counts")]
    SnapshotLengthMismatch { left: usize, right: usize },

    /// A dataset's grouped lists diverge in length between the snapshots.
    #[error("dataset {name:?}: snapshots have {left} and {right} {dimension} groups")]
    GroupCountMismatch {
        name: String,
        dimension: &'static str,
        left: usize,
        right: usize,
    },

    /// Positionally paired groups carry different labels, so the snapshots do
    /// not cover the same classes in the same order.
    #[error("dataset {name:?}: group {left:?} is paired with {right:?}; snapshots do not cover the same groups")]
    GroupMismatch {
        name: String,
        left: String,
        right: String,
    },

    /// Keyed comparison found no counterpart for a dataset name.
    #[error("dataset {name:?} has no counterpart in the second snapshot")]
    MissingDataset { name: String },
}

/// Which snapshot deviates less from the reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Verdict {
    #[serde(rename = "Snapshot 1 is better")]
    Snapshot1Better,
    #[serde(rename = "Snapshot 2 is better")]
    Snapshot2Better,
    #[serde(rename = "Both snapshots are equally good")]
    Tie,
}

impl Verdict {
    /// Decide by absolute magnitude of the two deviations from reference.
    pub fn from_deviations(snapshot1: f64, snapshot2: f64) -> Verdict {
        let abs1 = snapshot1.abs();
        let abs2 = snapshot2.abs();
        if abs1 < abs2 {
            Verdict::Snapshot1Better
        } else if abs1 > abs2 {
            Verdict::Snapshot2Better
        } else {
            Verdict::Tie
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Verdict::Snapshot1Better => "Snapshot 1 is better",
            Verdict::Snapshot2Better => "Snapshot 2 is better",
            Verdict::Tie => "Both snapshots are equally good",
        };
        f.write_str(label)
    }
}

/// One metric of one group, across the two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricComparison {
    /// Dataset display name.
    pub name: String,
    /// Group label (region class or distance class).
    pub group: String,
    /// Deviation from reference in snapshot 1.
    pub snapshot1: f64,
    /// Deviation from reference in snapshot 2.
    pub snapshot2: f64,
    /// snapshot2 minus snapshot1.
    pub difference: f64,
    pub verdict: Verdict,
}

/// The three metric comparisons of one distance-class group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceClassComparison {
    pub name: String,
    pub distance_class: String,
    pub speed: MetricComparison,
    pub duration: MetricComparison,
    pub distance: MetricComparison,
}

/// Overall (ungrouped) deviations of one dataset, one value per metric.
/// Durations are in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverallMetrics {
    pub mean_speed: f64,
    pub duration: f64,
    pub distance: f64,
}

/// Per-metric verdicts for the overall comparison of one dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OverallVerdicts {
    pub mean_speed: Verdict,
    pub duration: Verdict,
    pub distance: Verdict,
}

/// Overall comparison of one dataset across the two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverallComparison {
    pub name: String,
    pub snapshot1: OverallMetrics,
    pub snapshot2: OverallMetrics,
    pub difference: OverallMetrics,
    pub verdict: OverallVerdicts,
}

/// The full differential between two snapshots.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct SnapshotComparison {
    /// Region-class distance differences, one row per dataset and group.
    pub distance_differences: Vec<MetricComparison>,
    /// Region-class duration differences, in minutes.
    pub duration_differences: Vec<MetricComparison>,
    /// Region-class mean-speed differences.
    pub speed_differences: Vec<MetricComparison>,
    pub distance_class_differences: Vec<DistanceClassComparison>,
    pub overall: Vec<OverallComparison>,
}

const SECS_PER_MINUTE: f64 = 60.0;

/// Compare two snapshots positionally: `a[i]` is paired with `b[i]`.
///
/// The correspondence is validated rather than assumed: dataset counts,
/// per-dimension group counts, and positionally paired group labels must all
/// agree, otherwise an explicit error is returned. Use
/// [`compare_snapshots_by_name`] when the snapshots may list engines in
/// different orders.
pub fn compare_snapshots(
    a: &[DatasetAssembly],
    b: &[DatasetAssembly],
) -> Result<SnapshotComparison, CompareError> {
    if a.len() != b.len() {
        return Err(CompareError::SnapshotLengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let mut comparison = SnapshotComparison::default();
    for (dataset1, dataset2) in a.iter().zip(b) {
        compare_pair(dataset1, dataset2, &mut comparison)?;
    }
    Ok(comparison)
}

/// Compare two snapshots by dataset display name instead of position.
///
/// Results follow the dataset order of `a`. Every dataset in `a` must have a
/// name counterpart in `b`, and the counts must match.
pub fn compare_snapshots_by_name(
    a: &[DatasetAssembly],
    b: &[DatasetAssembly],
) -> Result<SnapshotComparison, CompareError> {
    if a.len() != b.len() {
        return Err(CompareError::SnapshotLengthMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let by_name: HashMap<&str, &DatasetAssembly> =
        b.iter().map(|d| (d.name.as_str(), d)).collect();

    let mut comparison = SnapshotComparison::default();
    for dataset1 in a {
        let dataset2 = by_name
            .get(dataset1.name.as_str())
            .ok_or_else(|| CompareError::MissingDataset {
                name: dataset1.name.clone(),
            })?;
        compare_pair(dataset1, dataset2, &mut comparison)?;
    }
    Ok(comparison)
}

fn compare_pair(
    dataset1: &DatasetAssembly,
    dataset2: &DatasetAssembly,
    out: &mut SnapshotComparison,
) -> Result<(), CompareError> {
    let region_pairs = paired_groups(
        &dataset1.name,
        "region-class",
        &dataset1.region_class_differences,
        &dataset2.region_class_differences,
    )?;
    for (group1, group2) in region_pairs {
        out.distance_differences.push(metric_comparison(
            dataset1,
            &group1.group,
            group1.distance.difference,
            group2.distance.difference,
        ));
        out.duration_differences.push(duration_comparison(
            dataset1,
            &group1.group,
            group1.duration.difference,
            group2.duration.difference,
        ));
        out.speed_differences.push(metric_comparison(
            dataset1,
            &group1.group,
            group1.mean_speed.difference,
            group2.mean_speed.difference,
        ));
    }

    let class_pairs = paired_groups(
        &dataset1.name,
        "distance-class",
        &dataset1.distance_class_differences,
        &dataset2.distance_class_differences,
    )?;
    for (group1, group2) in class_pairs {
        out.distance_class_differences.push(DistanceClassComparison {
            name: dataset1.name.clone(),
            distance_class: group1.group.clone(),
            speed: metric_comparison(
                dataset1,
                &group1.group,
                group1.mean_speed.difference,
                group2.mean_speed.difference,
            ),
            duration: duration_comparison(
                dataset1,
                &group1.group,
                group1.duration.difference,
                group2.duration.difference,
            ),
            distance: metric_comparison(
                dataset1,
                &group1.group,
                group1.distance.difference,
                group2.distance.difference,
            ),
        });
    }

    out.overall.push(overall_comparison(dataset1, dataset2));
    Ok(())
}

fn paired_groups<'a>(
    name: &str,
    dimension: &'static str,
    left: &'a [GroupedDifference],
    right: &'a [GroupedDifference],
) -> Result<Vec<(&'a GroupedDifference, &'a GroupedDifference)>, CompareError> {
    if left.len() != right.len() {
        return Err(CompareError::GroupCountMismatch {
            name: name.to_string(),
            dimension,
            left: left.len(),
            right: right.len(),
        });
    }
    left.iter()
        .zip(right)
        .map(|(group1, group2)| {
            if group1.group != group2.group {
                return Err(CompareError::GroupMismatch {
                    name: name.to_string(),
                    left: group1.group.clone(),
                    right: group2.group.clone(),
                });
            }
            Ok((group1, group2))
        })
        .collect()
}

fn metric_comparison(
    dataset: &DatasetAssembly,
    group: &str,
    snapshot1: f64,
    snapshot2: f64,
) -> MetricComparison {
    MetricComparison {
        name: dataset.name.clone(),
        group: group.to_string(),
        snapshot1,
        snapshot2,
        difference: snapshot2 - snapshot1,
        verdict: Verdict::from_deviations(snapshot1, snapshot2),
    }
}

/// Duration deviations arrive in seconds and leave in minutes. The verdict is
/// unaffected by the conversion since scaling preserves magnitude order.
fn duration_comparison(
    dataset: &DatasetAssembly,
    group: &str,
    snapshot1_secs: f64,
    snapshot2_secs: f64,
) -> MetricComparison {
    let snapshot1 = snapshot1_secs / SECS_PER_MINUTE;
    let snapshot2 = snapshot2_secs / SECS_PER_MINUTE;
    MetricComparison {
        name: dataset.name.clone(),
        group: group.to_string(),
        snapshot1,
        snapshot2,
        difference: snapshot2 - snapshot1,
        verdict: Verdict::from_deviations(snapshot1_secs, snapshot2_secs),
    }
}

fn overall_deviations(dataset: &DatasetAssembly) -> OverallMetrics {
    OverallMetrics {
        mean_speed: dataset.overall_mean_speed.mean - dataset.overall_reference_mean_speed.mean,
        duration: (dataset.overall_duration.mean - dataset.overall_reference_duration.mean)
            / SECS_PER_MINUTE,
        distance: dataset.overall_distance.mean - dataset.overall_reference_distance.mean,
    }
}

fn overall_comparison(dataset1: &DatasetAssembly, dataset2: &DatasetAssembly) -> OverallComparison {
    let snapshot1 = overall_deviations(dataset1);
    let snapshot2 = overall_deviations(dataset2);
    OverallComparison {
        name: dataset1.name.clone(),
        snapshot1,
        snapshot2,
        difference: OverallMetrics {
            mean_speed: snapshot2.mean_speed - snapshot1.mean_speed,
            duration: snapshot2.duration - snapshot1.duration,
            distance: snapshot2.distance - snapshot1.distance,
        },
        verdict: OverallVerdicts {
            mean_speed: Verdict::from_deviations(snapshot1.mean_speed, snapshot2.mean_speed),
            duration: Verdict::from_deviations(snapshot1.duration, snapshot2.duration),
            distance: Verdict::from_deviations(snapshot1.distance, snapshot2.distance),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::assemble_datasets;
    use crate::measurement::Measurement;
    use crate::stats::ThresholdPolicy;

    fn record(
        engine: &str,
        route_id: u64,
        region: &str,
        class: &str,
        distance: f64,
        duration_min: f64,
        ref_distance: f64,
        ref_secs: f64,
    ) -> Measurement {
        Measurement {
            name: engine.to_string(),
            raw_route_id: route_id,
            distance,
            duration: duration_min,
            reference_distance: ref_distance,
            reference_duration: ref_secs,
            region_class: region.to_string(),
            distance_class: class.to_string(),
            rtt: 5.0,
        }
    }

    /// One engine, one national/short route, with a configurable distance
    /// deviation (km) and duration deviation (minutes) against reference.
    fn snapshot(distance_off: f64, duration_off_min: f64) -> Vec<DatasetAssembly> {
        let records = vec![record(
            "OSRM",
            1,
            "national",
            "short",
            10.0 + distance_off,
            10.0 + duration_off_min,
            10.0,
            600.0,
        )];
        assemble_datasets(&[records], ThresholdPolicy::Band).unwrap()
    }

    #[test]
    fn test_verdict_from_deviations() {
        assert_eq!(Verdict::from_deviations(-3.0, 8.0), Verdict::Snapshot1Better);
        assert_eq!(Verdict::from_deviations(8.0, -3.0), Verdict::Snapshot2Better);
        assert_eq!(Verdict::from_deviations(-4.0, 4.0), Verdict::Tie);
    }

    #[test]
    fn test_verdict_display_strings() {
        assert_eq!(Verdict::Snapshot1Better.to_string(), "Snapshot 1 is better");
        assert_eq!(Verdict::Snapshot2Better.to_string(), "Snapshot 2 is better");
        assert_eq!(Verdict::Tie.to_string(), "Both snapshots are equally good");
    }

    #[test]
    fn test_length_mismatch_errors() {
        let a = snapshot(0.0, 0.0);
        let result = compare_snapshots(&a, &[]);
        assert_eq!(
            result.unwrap_err(),
            CompareError::SnapshotLengthMismatch { left: 1, right: 0 }
        );
    }

    #[test]
    fn test_group_label_mismatch_errors() {
        let a = snapshot(0.0, 0.0);
        let records = vec![record("OSRM", 1, "international", "short", 10.0, 10.0, 10.0, 600.0)];
        let b = assemble_datasets(&[records], ThresholdPolicy::Band).unwrap();
        match compare_snapshots(&a, &b) {
            Err(CompareError::GroupMismatch { left, right, .. }) => {
                assert_eq!(left, "national");
                assert_eq!(right, "international");
            }
            other => panic!("expected GroupMismatch, got {:?}", other),
        }
    }

    #[test]
    fn test_distance_verdict_smaller_deviation_wins() {
        // Snapshot 1 deviates -3 km, snapshot 2 deviates +8 km.
        let a = snapshot(-3.0, 0.0);
        let b = snapshot(8.0, 0.0);
        let comparison = compare_snapshots(&a, &b).unwrap();

        let row = &comparison.distance_differences[0];
        assert_eq!(row.snapshot1, -3.0);
        assert_eq!(row.snapshot2, 8.0);
        assert_eq!(row.difference, 11.0);
        assert_eq!(row.verdict, Verdict::Snapshot1Better);
    }

    #[test]
    fn test_duration_reported_in_minutes() {
        // 2 engine minutes over reference in snapshot 1, exact in snapshot 2.
        let a = snapshot(0.0, 2.0);
        let b = snapshot(0.0, 0.0);
        let comparison = compare_snapshots(&a, &b).unwrap();

        let row = &comparison.duration_differences[0];
        assert_eq!(row.snapshot1, 2.0);
        assert_eq!(row.snapshot2, 0.0);
        assert_eq!(row.difference, -2.0);
        assert_eq!(row.verdict, Verdict::Snapshot2Better);

        // Overall durations use the same minute conversion.
        assert_eq!(comparison.overall[0].snapshot1.duration, 2.0);
        assert_eq!(comparison.overall[0].verdict.duration, Verdict::Snapshot2Better);
    }

    #[test]
    fn test_distance_class_rows() {
        let a = snapshot(1.0, 0.0);
        let b = snapshot(-2.0, 0.0);
        let comparison = compare_snapshots(&a, &b).unwrap();

        assert_eq!(comparison.distance_class_differences.len(), 1);
        let row = &comparison.distance_class_differences[0];
        assert_eq!(row.distance_class, "short");
        assert_eq!(row.distance.snapshot1, 1.0);
        assert_eq!(row.distance.snapshot2, -2.0);
        assert_eq!(row.distance.verdict, Verdict::Snapshot1Better);
    }

    #[test]
    fn test_overall_verdict_uses_deviation_not_raw_mean() {
        // Snapshot 1 engine runs 8 km long, snapshot 2 runs 3 km short.
        // Snapshot 2's raw mean is smaller AND closer to reference; make the
        // closer-to-reference side the longer one to tell the two rules apart.
        let a = snapshot(3.0, 0.0);
        let b = snapshot(-8.0, 0.0);
        let comparison = compare_snapshots(&a, &b).unwrap();
        // |3| < |-8|: snapshot 1 wins even though its raw mean is larger.
        assert_eq!(comparison.overall[0].verdict.distance, Verdict::Snapshot1Better);
    }

    #[test]
    fn test_identical_snapshots_tie_everywhere() {
        let a = snapshot(2.0, 1.0);
        let comparison = compare_snapshots(&a, &a).unwrap();
        assert!(comparison
            .distance_differences
            .iter()
            .all(|r| r.verdict == Verdict::Tie));
        assert!(comparison
            .duration_differences
            .iter()
            .all(|r| r.verdict == Verdict::Tie));
        assert_eq!(comparison.overall[0].verdict.distance, Verdict::Tie);
    }

    #[test]
    fn test_compare_by_name_reorders() {
        let records_osrm = vec![record("OSRM", 1, "national", "short", 12.0, 10.0, 10.0, 600.0)];
        let records_valhalla =
            vec![record("Valhalla", 1, "national", "short", 9.0, 10.0, 10.0, 600.0)];

        let a = assemble_datasets(
            &[records_osrm.clone(), records_valhalla.clone()],
            ThresholdPolicy::Band,
        )
        .unwrap();
        let b = assemble_datasets(
            &[records_valhalla, records_osrm],
            ThresholdPolicy::Band,
        )
        .unwrap();

        // Positional pairing would cross the engines; keyed pairing must not.
        let comparison = compare_snapshots_by_name(&a, &b).unwrap();
        assert_eq!(comparison.overall[0].name, "OSRM 1");
        assert_eq!(comparison.overall[0].verdict.distance, Verdict::Tie);
        assert_eq!(comparison.overall[1].name, "Valhalla 1");
        assert_eq!(comparison.overall[1].verdict.distance, Verdict::Tie);
    }

    #[test]
    fn test_compare_by_name_missing_dataset() {
        let a = snapshot(0.0, 0.0);
        let records = vec![record("Valhalla", 1, "national", "short", 10.0, 10.0, 10.0, 600.0)];
        let b = assemble_datasets(&[records], ThresholdPolicy::Band).unwrap();
        assert_eq!(
            compare_snapshots_by_name(&a, &b).unwrap_err(),
            CompareError::MissingDataset {
                name: "OSRM 1".to_string()
            }
        );
    }
}
