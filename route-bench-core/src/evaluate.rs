//! Per-dataset evaluation: grouped statistics and differentials against the
//! reference service for one routing engine's result set.

use serde::Serialize;

use crate::group::{group_by, Group};
use crate::measurement::{GroupKey, Measurement};
use crate::stats::{compute, Evaluation, SampleStats, StatsError, ThresholdPolicy};

/// Statistics for an engine series together with its differential against the
/// reference series. A wrapper around [`SampleStats`], never a mutation of it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluatedStats {
    #[serde(flatten)]
    pub stats: SampleStats,
    /// Engine mean minus reference mean, at full precision.
    pub difference: f64,
    pub evaluation: Evaluation,
}

/// Statistics bundle for one group of one dataset. Durations are in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedDifference {
    pub group: String,
    pub distance: EvaluatedStats,
    pub reference_distance: SampleStats,
    pub duration: EvaluatedStats,
    pub reference_duration: SampleStats,
    pub mean_speed: EvaluatedStats,
    pub reference_mean_speed: SampleStats,
    pub rtt: SampleStats,
}

/// The full evaluation of one dataset: grouped differentials along both
/// categorical dimensions plus ungrouped overall statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetAssembly {
    /// Display name, disambiguated by the assembler ("OSRM 1", "OSRM 2", ...).
    pub name: String,
    /// Which threshold rule set produced the evaluation labels below.
    pub policy: ThresholdPolicy,
    pub region_class_differences: Vec<GroupedDifference>,
    pub distance_class_differences: Vec<GroupedDifference>,
    pub overall_distance: SampleStats,
    pub overall_duration: SampleStats,
    pub overall_mean_speed: SampleStats,
    pub overall_reference_distance: SampleStats,
    pub overall_reference_duration: SampleStats,
    pub overall_reference_mean_speed: SampleStats,
    pub overall_rtt: SampleStats,
}

/// The seven numeric series extracted from a set of records, with engine
/// durations normalized from minutes to seconds at this boundary.
struct Series {
    distance: Vec<f64>,
    duration_secs: Vec<f64>,
    mean_speed: Vec<f64>,
    reference_distance: Vec<f64>,
    reference_duration_secs: Vec<f64>,
    reference_mean_speed: Vec<f64>,
    rtt: Vec<f64>,
}

impl Series {
    fn collect<'a>(records: impl Iterator<Item = &'a Measurement>) -> Series {
        let mut series = Series {
            distance: Vec::new(),
            duration_secs: Vec::new(),
            mean_speed: Vec::new(),
            reference_distance: Vec::new(),
            reference_duration_secs: Vec::new(),
            reference_mean_speed: Vec::new(),
            rtt: Vec::new(),
        };
        for r in records {
            series.distance.push(r.distance);
            series.duration_secs.push(r.duration_secs());
            series.mean_speed.push(r.mean_speed());
            series.reference_distance.push(r.reference_distance);
            series.reference_duration_secs.push(r.reference_duration);
            series.reference_mean_speed.push(r.reference_mean_speed());
            series.rtt.push(r.rtt);
        }
        series
    }
}

/// Evaluate one dataset.
///
/// Groups the records by region class and by distance class, computes the
/// statistics bundle and engine-minus-reference differential per group, and
/// computes overall statistics over the ungrouped set. Pure: identical input
/// yields an identical assembly.
///
/// # Errors
///
/// Returns [`StatsError::EmptySample`] when `records` is empty.
pub fn evaluate_dataset(
    name: impl Into<String>,
    records: &[Measurement],
    policy: ThresholdPolicy,
) -> Result<DatasetAssembly, StatsError> {
    if records.is_empty() {
        return Err(StatsError::EmptySample);
    }

    let region_class_differences = grouped_differences(records, GroupKey::RegionClass, policy)?;
    let distance_class_differences =
        grouped_differences(records, GroupKey::DistanceClass, policy)?;

    let overall = Series::collect(records.iter());

    Ok(DatasetAssembly {
        name: name.into(),
        policy,
        region_class_differences,
        distance_class_differences,
        overall_distance: compute(&overall.distance)?,
        overall_duration: compute(&overall.duration_secs)?,
        overall_mean_speed: compute(&overall.mean_speed)?,
        overall_reference_distance: compute(&overall.reference_distance)?,
        overall_reference_duration: compute(&overall.reference_duration_secs)?,
        overall_reference_mean_speed: compute(&overall.reference_mean_speed)?,
        overall_rtt: compute(&overall.rtt)?,
    })
}

fn grouped_differences(
    records: &[Measurement],
    key: GroupKey,
    policy: ThresholdPolicy,
) -> Result<Vec<GroupedDifference>, StatsError> {
    group_by(records, key)
        .into_iter()
        .map(|group| group_difference(group, policy))
        .collect()
}

fn group_difference(
    group: Group<'_>,
    policy: ThresholdPolicy,
) -> Result<GroupedDifference, StatsError> {
    let series = Series::collect(group.records.iter().copied());

    let distance = compute(&series.distance)?;
    let duration = compute(&series.duration_secs)?;
    let mean_speed = compute(&series.mean_speed)?;
    let reference_distance = compute(&series.reference_distance)?;
    let reference_duration = compute(&series.reference_duration_secs)?;
    let reference_mean_speed = compute(&series.reference_mean_speed)?;
    let rtt = compute(&series.rtt)?;

    let distance_difference = distance.mean - reference_distance.mean;
    let duration_difference = duration.mean - reference_duration.mean;
    let speed_difference = mean_speed.mean - reference_mean_speed.mean;

    Ok(GroupedDifference {
        group: group.label,
        distance: EvaluatedStats {
            stats: distance,
            difference: distance_difference,
            evaluation: policy.evaluate(distance_difference),
        },
        reference_distance,
        duration: EvaluatedStats {
            stats: duration,
            difference: duration_difference,
            evaluation: policy.evaluate_duration(duration_difference),
        },
        reference_duration,
        mean_speed: EvaluatedStats {
            stats: mean_speed,
            difference: speed_difference,
            evaluation: policy.evaluate(speed_difference),
        },
        reference_mean_speed,
        rtt,
    })
}
