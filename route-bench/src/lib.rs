//! route-bench: statistical comparison of routing-engine benchmarks
//!
//! This library wires the pure statistics engine in `route-bench-core` to
//! snapshot files on disk: loading measurement exports, partitioning them per
//! routing engine, evaluating each dataset against the reference service, and
//! rendering the results as terminal reports.

pub mod cli;
pub mod config;
pub mod report;
pub mod snapshot;

// Re-export core types for convenience
pub use route_bench_core::{
    assemble_datasets, compare_snapshots, correlate, correlate_pairs, evaluate_dataset,
    unique_names, Correlation, DatasetAssembly, Measurement, SnapshotComparison, ThresholdPolicy,
    Verdict,
};

// Re-export main types from this crate
pub use cli::Cli;
pub use config::Config;
pub use report::{CorrelationReport, ReportError, Reporter, TerminalReporter};
pub use snapshot::{load_snapshot, prepare_snapshot, EngineSummary, SnapshotData};
