//! Partitioning of measurements by categorical class.

use std::collections::{BTreeMap, HashMap};

use crate::measurement::{GroupKey, Measurement};

/// One partition of the input: a class label and the records carrying it, in
/// input order.
#[derive(Debug, Clone)]
pub struct Group<'a> {
    pub label: String,
    pub records: Vec<&'a Measurement>,
}

/// Partition records by the given key.
///
/// Groups are emitted in first-seen order and each input record lands in
/// exactly one group. Labels are taken verbatim; an empty or unexpected class
/// string simply forms its own group.
pub fn group_by<'a>(records: &'a [Measurement], key: GroupKey) -> Vec<Group<'a>> {
    let mut groups: Vec<Group<'a>> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for record in records {
        let label = key.label(record);
        match index.get(label) {
            Some(&i) => groups[i].records.push(record),
            None => {
                index.insert(label, groups.len());
                groups.push(Group {
                    label: label.to_string(),
                    records: vec![record],
                });
            }
        }
    }

    groups
}

/// Count records per class label, in first-seen order.
pub fn class_distribution(records: &[Measurement], key: GroupKey) -> Vec<(String, usize)> {
    group_by(records, key)
        .into_iter()
        .map(|g| (g.label, g.records.len()))
        .collect()
}

/// Map the class labels present in `records` to ascending 1-based indices,
/// assigned in sorted label order.
///
/// Built fresh on every call: the result depends only on the labels present,
/// never on call history or record order.
pub fn class_indices(records: &[Measurement], key: GroupKey) -> BTreeMap<String, usize> {
    let labels: std::collections::BTreeSet<&str> =
        records.iter().map(|r| key.label(r)).collect();
    labels
        .into_iter()
        .enumerate()
        .map(|(i, label)| (label.to_string(), i + 1))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(region: &str, distance_class: &str) -> Measurement {
        Measurement {
            name: "OSRM".to_string(),
            raw_route_id: 0,
            distance: 1.0,
            duration: 1.0,
            reference_distance: 1.0,
            reference_duration: 60.0,
            region_class: region.to_string(),
            distance_class: distance_class.to_string(),
            rtt: 1.0,
        }
    }

    #[test]
    fn test_group_by_partitions_without_loss() {
        let records = vec![
            record("national", "short"),
            record("international", "short"),
            record("national", "long"),
        ];
        let groups = group_by(&records, GroupKey::RegionClass);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label, "national");
        assert_eq!(groups[0].records.len(), 2);
        assert_eq!(groups[1].label, "international");
        assert_eq!(groups[1].records.len(), 1);

        let total: usize = groups.iter().map(|g| g.records.len()).sum();
        assert_eq!(total, records.len());
    }

    #[test]
    fn test_group_by_first_seen_order() {
        let records = vec![
            record("b", "x"),
            record("a", "x"),
            record("b", "x"),
            record("c", "x"),
        ];
        let groups = group_by(&records, GroupKey::RegionClass);
        let labels: Vec<&str> = groups
            .iter()
            .map(|g| g.label.as_str())
            .collect();
        assert_eq!(labels, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_group_by_preserves_input_order_within_group() {
        let mut records = vec![record("national", "short"); 3];
        records[0].raw_route_id = 10;
        records[1].raw_route_id = 20;
        records[2].raw_route_id = 30;

        let groups = group_by(&records, GroupKey::RegionClass);
        let ids: Vec<u64> = groups[0].records.iter().map(|r| r.raw_route_id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[test]
    fn test_group_by_unknown_labels_form_own_group() {
        let records = vec![record("national", "short"), record("", "short")];
        let groups = group_by(&records, GroupKey::RegionClass);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[1].label, "");
    }

    #[test]
    fn test_class_distribution() {
        let records = vec![
            record("national", "short"),
            record("national", "long"),
            record("international", "short"),
        ];
        assert_eq!(
            class_distribution(&records, GroupKey::DistanceClass),
            vec![("short".to_string(), 2), ("long".to_string(), 1)]
        );
    }

    #[test]
    fn test_class_indices_sorted_and_one_based() {
        let records = vec![
            record("x", "short"),
            record("x", "very-long"),
            record("x", "long"),
        ];
        let indices = class_indices(&records, GroupKey::DistanceClass);
        assert_eq!(indices["long"], 1);
        assert_eq!(indices["short"], 2);
        assert_eq!(indices["very-long"], 3);
    }

    #[test]
    fn test_class_indices_independent_of_record_order() {
        let forward = vec![record("x", "a"), record("x", "b")];
        let backward = vec![record("x", "b"), record("x", "a")];
        assert_eq!(
            class_indices(&forward, GroupKey::DistanceClass),
            class_indices(&backward, GroupKey::DistanceClass)
        );
    }
}
