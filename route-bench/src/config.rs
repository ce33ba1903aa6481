//! Configuration loading for route-bench.
//!
//! Supports loading configuration from TOML files, with sensible defaults
//! for all settings.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use route_bench_core::ThresholdPolicy;

/// Top-level configuration for route-bench.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Settings for the statistical evaluation.
    pub analysis: AnalysisConfig,
    /// Which routing engines to extract from snapshots.
    pub engines: EnginesConfig,
    /// Terminal output settings.
    pub output: OutputConfig,
}

/// Configuration for the statistical evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Threshold rule set applied to grouped differences ("band" or "graded").
    pub threshold_policy: ThresholdPolicy,
}

/// Which engines to recognize in snapshot records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnginesConfig {
    /// Engine names, matched as substrings of the record name.
    pub names: Vec<String>,
}

/// Terminal output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Whether to color evaluation labels and verdicts.
    pub color: bool,
}

impl Default for EnginesConfig {
    fn default() -> Self {
        Self {
            names: vec![
                "OSRM".to_string(),
                "GraphHopper".to_string(),
                "Valhalla".to_string(),
            ],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self { color: true }
    }
}

/// Default configuration file name.
const DEFAULT_CONFIG_FILE: &str = ".route-bench.toml";

impl Config {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Config> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load configuration from the default file (`.route-bench.toml`) or use
    /// defaults when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be parsed.
    pub fn load_or_default() -> Result<Config> {
        Self::load_or_default_at(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Load configuration from `path` when it exists, defaults otherwise.
    pub fn load_or_default_at(path: &Path) -> Result<Config> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Config::default())
        }
    }
}
