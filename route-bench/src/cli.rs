//! Command-line interface for route-bench.

use crate::config::Config;
use clap::{Parser, ValueEnum};
use route_bench_core::ThresholdPolicy;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "route-bench")]
#[command(about = "Statistical comparison of routing-engine benchmarks against a reference service")]
#[command(version)]
pub struct Cli {
    /// Snapshot JSON file; pass twice to compare two snapshots
    #[arg(short, long, required = true)]
    pub snapshot: Vec<PathBuf>,

    /// Threshold rule set for grouped evaluations
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Engine name to extract (repeatable; replaces the configured list)
    #[arg(long)]
    pub engine: Vec<String>,

    /// Also compute RTT vs distance/duration correlations per dataset
    #[arg(long)]
    pub correlate: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Path to config file
    #[arg(long, default_value = ".route-bench.toml")]
    pub config: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// CLI spelling of [`ThresholdPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// "ok"/"bad" bands: 10 km or km/h for distance and speed, 600 s for duration
    Band,
    /// "good"/"acceptable"/"bad" grading for all metrics
    Graded,
}

impl From<PolicyArg> for ThresholdPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Band => ThresholdPolicy::Band,
            PolicyArg::Graded => ThresholdPolicy::Graded,
        }
    }
}

impl Cli {
    /// Apply CLI overrides to the configuration.
    ///
    /// CLI arguments take precedence over config file values; absent optional
    /// arguments leave the config untouched.
    pub fn apply_to_config(&self, config: &mut Config) {
        if let Some(policy) = self.policy {
            config.analysis.threshold_policy = policy.into();
        }

        if !self.engine.is_empty() {
            config.engines.names = self.engine.clone();
        }

        if self.no_color {
            config.output.color = false;
        }
    }
}
