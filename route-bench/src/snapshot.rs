//! Snapshot loading and dataset preparation.
//!
//! A snapshot file is a JSON array of measurement records as exported from
//! the benchmark store. Records are partitioned into one dataset per routing
//! engine and restricted to the routes present in every engine, so the core
//! evaluator only ever sees comparable result sets.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};

use route_bench_core::{class_distribution, GroupKey, Measurement};

/// Route counts and class distributions for one engine of a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSummary {
    pub name: String,
    /// Records carrying this engine's name, before intersection filtering.
    pub total_routes: usize,
    /// Records remaining after restricting to common route ids.
    pub filtered_routes: usize,
    pub region_classes: Vec<(String, usize)>,
    pub distance_classes: Vec<(String, usize)>,
}

/// One snapshot, partitioned and filtered, ready for evaluation.
#[derive(Debug, Clone)]
pub struct SnapshotData {
    /// One dataset per engine, in configured engine order, engines with no
    /// records omitted.
    pub datasets: Vec<Vec<Measurement>>,
    pub summaries: Vec<EngineSummary>,
}

/// Load a snapshot file: a JSON array of camelCase measurement records.
pub fn load_snapshot(path: &Path) -> Result<Vec<Measurement>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;
    let records: Vec<Measurement> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse snapshot file: {}", path.display()))?;
    Ok(records)
}

/// Partition records into one dataset per engine name, by substring match on
/// the record name. Record order is preserved. A record matching none of the
/// names is dropped; one matching several lands in each of them.
pub fn partition_by_engines(records: &[Measurement], names: &[String]) -> Vec<Vec<Measurement>> {
    names
        .iter()
        .map(|engine| {
            records
                .iter()
                .filter(|r| r.name.contains(engine.as_str()))
                .cloned()
                .collect()
        })
        .collect()
}

/// Restrict every dataset to the route ids present in all datasets.
pub fn filter_common_routes(datasets: Vec<Vec<Measurement>>) -> Vec<Vec<Measurement>> {
    let mut sets = datasets
        .iter()
        .map(|dataset| dataset.iter().map(|r| r.raw_route_id).collect::<HashSet<u64>>());

    let common: HashSet<u64> = match sets.next() {
        Some(first) => sets.fold(first, |acc, set| acc.intersection(&set).copied().collect()),
        None => HashSet::new(),
    };

    datasets
        .into_iter()
        .map(|dataset| {
            dataset
                .into_iter()
                .filter(|r| common.contains(&r.raw_route_id))
                .collect()
        })
        .collect()
}

/// Partition a snapshot's records by engine, intersect route ids, and build
/// per-engine summaries. Engines with no records at all are left out of the
/// datasets (and of the intersection) but still appear in the summaries.
pub fn prepare_snapshot(records: &[Measurement], engine_names: &[String]) -> SnapshotData {
    let partitions = partition_by_engines(records, engine_names);

    let present: Vec<(usize, Vec<Measurement>)> = partitions
        .iter()
        .enumerate()
        .filter(|(_, dataset)| !dataset.is_empty())
        .map(|(i, dataset)| (i, dataset.clone()))
        .collect();

    let filtered = filter_common_routes(present.iter().map(|(_, d)| d.clone()).collect());

    let mut summaries = Vec::new();
    for (slot, name) in engine_names.iter().enumerate() {
        let total_routes = partitions[slot].len();
        let filtered_dataset = present
            .iter()
            .position(|(i, _)| *i == slot)
            .map(|pos| &filtered[pos]);
        summaries.push(EngineSummary {
            name: name.clone(),
            total_routes,
            filtered_routes: filtered_dataset.map_or(0, |d| d.len()),
            region_classes: filtered_dataset
                .map_or_else(Vec::new, |d| class_distribution(d, GroupKey::RegionClass)),
            distance_classes: filtered_dataset
                .map_or_else(Vec::new, |d| class_distribution(d, GroupKey::DistanceClass)),
        });
    }

    SnapshotData {
        datasets: filtered.into_iter().filter(|d| !d.is_empty()).collect(),
        summaries,
    }
}
