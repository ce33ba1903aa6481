use serde::{Deserialize, Serialize};

/// One benchmark observation: a single routing engine's result for a single
/// route, joined with the reference service's values for the same route.
///
/// Field names follow the external store's JSON shape (camelCase). Engine
/// durations arrive in minutes, reference durations in seconds; the evaluator
/// normalizes everything to seconds before computing statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Measurement {
    /// Routing engine name (e.g. "OSRM", "GraphHopper", "Valhalla").
    pub name: String,
    /// Identifier of the underlying route, shared across engines.
    pub raw_route_id: u64,
    /// Route distance reported by the engine, in kilometers.
    pub distance: f64,
    /// Route duration reported by the engine, in minutes.
    pub duration: f64,
    /// Reference distance in kilometers.
    pub reference_distance: f64,
    /// Reference duration in seconds.
    pub reference_duration: f64,
    /// Categorical region tag ("national", "international", ...).
    pub region_class: String,
    /// Categorical distance bucket ("very-short" .. "very-long", ...).
    pub distance_class: String,
    /// Round-trip time of the benchmark request.
    pub rtt: f64,
}

impl Measurement {
    /// Engine duration normalized to seconds.
    pub fn duration_secs(&self) -> f64 {
        self.duration * 60.0
    }

    /// Mean speed in km/h derived from the engine's distance and duration.
    /// Zero-duration routes yield 0 rather than infinity.
    pub fn mean_speed(&self) -> f64 {
        if self.duration > 0.0 {
            self.distance / (self.duration / 60.0)
        } else {
            0.0
        }
    }

    /// Mean speed in km/h derived from the reference distance and duration.
    pub fn reference_mean_speed(&self) -> f64 {
        if self.reference_duration > 0.0 {
            self.reference_distance / (self.reference_duration / 3600.0)
        } else {
            0.0
        }
    }
}

/// The categorical dimension a set of measurements is partitioned by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupKey {
    RegionClass,
    DistanceClass,
}

impl GroupKey {
    /// The label this key selects from a measurement. Returned verbatim, no
    /// normalization: unknown values form their own groups.
    pub fn label<'a>(&self, measurement: &'a Measurement) -> &'a str {
        match self {
            GroupKey::RegionClass => &measurement.region_class,
            GroupKey::DistanceClass => &measurement.distance_class,
        }
    }
}
