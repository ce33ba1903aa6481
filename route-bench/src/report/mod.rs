use route_bench_core::{Correlation, DatasetAssembly, SnapshotComparison};
use thiserror::Error;

use crate::snapshot::EngineSummary;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// One correlation result with the label it is reported under
/// (e.g. "OSRM 1: RTT vs distance").
#[derive(Debug, Clone)]
pub struct CorrelationReport {
    pub description: String,
    pub correlation: Correlation,
}

pub trait Reporter {
    /// Report one evaluated snapshot: route counts, class distributions, and
    /// per-dataset grouped differences and overall statistics.
    fn report_snapshot(
        &self,
        summaries: &[EngineSummary],
        assemblies: &[DatasetAssembly],
    ) -> Result<(), ReportError>;

    /// Report the differential between two snapshots.
    fn report_comparison(
        &self,
        title: &str,
        comparison: &SnapshotComparison,
    ) -> Result<(), ReportError>;

    /// Report diagnostic correlations.
    fn report_correlations(&self, correlations: &[CorrelationReport]) -> Result<(), ReportError>;
}

mod terminal;
pub use terminal::TerminalReporter;
