//! Multi-dataset assembly: evaluate several engines' result sets into a
//! uniform structure, with disambiguated display names.

use std::collections::HashMap;

use crate::evaluate::{evaluate_dataset, DatasetAssembly};
use crate::measurement::Measurement;
use crate::stats::{StatsError, ThresholdPolicy};

/// Disambiguated display names for a list of datasets, derived from the
/// engine name on each dataset's first record.
///
/// Every dataset gets a numeric suffix, including the first occurrence of a
/// name: two "OSRM" datasets become "OSRM 1" and "OSRM 2", a lone
/// "GraphHopper" dataset becomes "GraphHopper 1".
///
/// # Errors
///
/// Returns [`StatsError::EmptySample`] when any dataset has no records, since
/// it then has neither a name nor statistics.
pub fn unique_names(datasets: &[Vec<Measurement>]) -> Result<Vec<String>, StatsError> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    datasets
        .iter()
        .map(|dataset| {
            let base = dataset.first().ok_or(StatsError::EmptySample)?.name.as_str();
            let count = counts.entry(base).or_insert(0);
            *count += 1;
            Ok(format!("{} {}", base, count))
        })
        .collect()
}

/// Evaluate every dataset and assemble the results in input order.
///
/// Each inner list is one routing engine's full result set. The caller is
/// expected to have already restricted all datasets to routes present in
/// every engine under comparison; this function does not re-verify that.
pub fn assemble_datasets(
    datasets: &[Vec<Measurement>],
    policy: ThresholdPolicy,
) -> Result<Vec<DatasetAssembly>, StatsError> {
    let names = unique_names(datasets)?;
    names
        .into_iter()
        .zip(datasets)
        .map(|(name, records)| evaluate_dataset(name, records, policy))
        .collect()
}
