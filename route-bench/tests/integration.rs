//! Integration tests for route-bench.
//!
//! These tests drive the full pipeline over snapshot files on disk: loading
//! JSON exports, partitioning per engine, evaluating against the reference,
//! and comparing two snapshots.

use std::io::Write;

use tempfile::NamedTempFile;

use route_bench::{
    assemble_datasets, compare_snapshots, load_snapshot, prepare_snapshot, Measurement,
    ThresholdPolicy, Verdict,
};

fn engine_names() -> Vec<String> {
    vec![
        "OSRM".to_string(),
        "GraphHopper".to_string(),
        "Valhalla".to_string(),
    ]
}

fn record_json(
    name: &str,
    route_id: u64,
    region: &str,
    class: &str,
    distance: f64,
    duration_min: f64,
    ref_distance: f64,
    ref_secs: f64,
) -> String {
    format!(
        r#"{{
            "name": "{name}",
            "rawRouteId": {route_id},
            "distance": {distance},
            "duration": {duration_min},
            "referenceDistance": {ref_distance},
            "referenceDuration": {ref_secs},
            "regionClass": "{region}",
            "distanceClass": "{class}",
            "rtt": 25.0
        }}"#
    )
}

fn write_snapshot(records: &[String]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[{}]", records.join(",")).unwrap();
    file
}

/// A snapshot with two engines covering the same two routes, with the given
/// per-engine distance offsets against the reference.
fn two_engine_snapshot(osrm_off: f64, valhalla_off: f64) -> NamedTempFile {
    write_snapshot(&[
        record_json("OSRM", 1, "national", "short", 10.0 + osrm_off, 10.0, 10.0, 600.0),
        record_json("OSRM", 2, "national", "long", 120.0 + osrm_off, 90.0, 120.0, 5400.0),
        record_json("Valhalla", 1, "national", "short", 10.0 + valhalla_off, 10.0, 10.0, 600.0),
        record_json("Valhalla", 2, "national", "long", 120.0 + valhalla_off, 90.0, 120.0, 5400.0),
    ])
}

#[test]
fn test_load_and_prepare_snapshot() {
    let file = write_snapshot(&[
        record_json("OSRM v5", 1, "national", "short", 10.0, 10.0, 10.0, 600.0),
        record_json("OSRM v5", 2, "national", "long", 120.0, 90.0, 120.0, 5400.0),
        record_json("GraphHopper 8", 1, "national", "short", 10.5, 11.0, 10.0, 600.0),
        record_json("GraphHopper 8", 9, "national", "long", 50.0, 40.0, 49.0, 2400.0),
    ]);

    let records = load_snapshot(file.path()).unwrap();
    assert_eq!(records.len(), 4);

    let data = prepare_snapshot(&records, &engine_names());

    // Only route 1 is shared between OSRM and GraphHopper.
    assert_eq!(data.datasets.len(), 2);
    for dataset in &data.datasets {
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset[0].raw_route_id, 1);
    }

    assert_eq!(data.summaries.len(), 3);
    assert_eq!(data.summaries[0].name, "OSRM");
    assert_eq!(data.summaries[0].total_routes, 2);
    assert_eq!(data.summaries[0].filtered_routes, 1);
    assert_eq!(data.summaries[2].name, "Valhalla");
    assert_eq!(data.summaries[2].total_routes, 0);
}

#[test]
fn test_evaluate_prepared_snapshot() {
    let file = two_engine_snapshot(2.0, 0.0);
    let records = load_snapshot(file.path()).unwrap();
    let data = prepare_snapshot(&records, &engine_names());

    let assemblies = assemble_datasets(&data.datasets, ThresholdPolicy::Band).unwrap();

    assert_eq!(assemblies.len(), 2);
    assert_eq!(assemblies[0].name, "OSRM 1");
    assert_eq!(assemblies[1].name, "Valhalla 1");

    // Durations match the reference exactly once normalized to seconds.
    let osrm = &assemblies[0];
    let national = &osrm.region_class_differences[0];
    assert_eq!(national.group, "national");
    assert_eq!(national.duration.difference, 0.0);
    assert!((national.distance.difference - 2.0).abs() < 1e-12);

    let class_labels: Vec<&str> = osrm
        .distance_class_differences
        .iter()
        .map(|g| g.group.as_str())
        .collect();
    assert_eq!(class_labels, vec!["short", "long"]);
}

#[test]
fn test_compare_two_snapshot_files() {
    let before = two_engine_snapshot(8.0, 1.0);
    let after = two_engine_snapshot(-2.0, 4.0);

    let mut evaluated = Vec::new();
    for file in [&before, &after] {
        let records = load_snapshot(file.path()).unwrap();
        let data = prepare_snapshot(&records, &engine_names());
        evaluated.push(assemble_datasets(&data.datasets, ThresholdPolicy::Band).unwrap());
    }

    let comparison = compare_snapshots(&evaluated[0], &evaluated[1]).unwrap();

    // OSRM moved from 8 km over to 2 km short: the second snapshot wins.
    let osrm_rows: Vec<_> = comparison
        .distance_differences
        .iter()
        .filter(|r| r.name == "OSRM 1")
        .collect();
    assert!(!osrm_rows.is_empty());
    assert!(osrm_rows
        .iter()
        .all(|r| r.verdict == Verdict::Snapshot2Better));

    // Valhalla drifted from 1 km to 4 km over: the first snapshot wins.
    let overall_valhalla = comparison
        .overall
        .iter()
        .find(|o| o.name == "Valhalla 1")
        .unwrap();
    assert_eq!(overall_valhalla.verdict.distance, Verdict::Snapshot1Better);

    // Identical durations on both sides tie.
    assert!(comparison
        .duration_differences
        .iter()
        .all(|r| r.verdict == Verdict::Tie));
}

#[test]
fn test_snapshot_with_repeated_engine_gets_numbered_names() {
    let records: Vec<Measurement> = load_snapshot(
        write_snapshot(&[
            record_json("OSRM", 1, "national", "short", 10.0, 10.0, 10.0, 600.0),
            record_json("OSRM", 2, "national", "short", 10.5, 10.0, 10.0, 600.0),
        ])
        .path(),
    )
    .unwrap();

    // Listing the same engine name twice yields two identical datasets, which
    // the assembler must still give distinct display names.
    let data = prepare_snapshot(&records, &["OSRM".to_string(), "OSRM".to_string()]);
    let assemblies = assemble_datasets(&data.datasets, ThresholdPolicy::Band).unwrap();

    assert_eq!(assemblies.len(), 2);
    assert_eq!(assemblies[0].name, "OSRM 1");
    assert_eq!(assemblies[1].name, "OSRM 2");
}

#[test]
fn test_malformed_snapshot_file_errors() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(b"{ not a json array }").unwrap();
    assert!(load_snapshot(file.path()).is_err());
}
