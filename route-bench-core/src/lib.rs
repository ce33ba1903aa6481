//! route-bench-core: statistics and comparison engine for routing-engine
//! benchmarks.
//!
//! Takes materialized per-route measurements for several routing engines,
//! groups them by categorical class, computes descriptive statistics and
//! differentials against a reference transport-planning service, and compares
//! two assembled result sets across points in time. All computation is
//! synchronous and pure over in-memory slices; the crate performs no I/O.

pub mod assemble;
pub mod compare;
pub mod correlate;
pub mod evaluate;
pub mod group;
pub mod measurement;
pub mod stats;

// Re-export main types for convenience
pub use assemble::{assemble_datasets, unique_names};
pub use compare::{
    compare_snapshots, compare_snapshots_by_name, CompareError, DistanceClassComparison,
    MetricComparison, OverallComparison, SnapshotComparison, Verdict,
};
pub use correlate::{correlate, correlate_pairs, normalize_min_max, Correlation, CorrelationError, Strength};
pub use evaluate::{evaluate_dataset, DatasetAssembly, EvaluatedStats, GroupedDifference};
pub use group::{class_distribution, class_indices, group_by, Group};
pub use measurement::{GroupKey, Measurement};
pub use stats::{
    band_evaluation, compute, duration_band_evaluation, graded_evaluation, Evaluation, SampleStats,
    StatsError, ThresholdPolicy,
};
