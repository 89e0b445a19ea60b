//! Greedy Proximity Clustering
//!
//! Single-pass grouping over a latitude-sorted copy of the input:
//!   1. Stable sort by latitude (ties keep input order)
//!   2. Each unassigned record seeds a group
//!   3. Every later unassigned record within `t(zoom)` of the seed on both
//!      axes joins the group
//!   4. Groups of two or more become clusters, the rest singletons
//!
//! Worst case is O(n²) comparisons. `ScanStrategy::LatitudeWindow` cuts each
//! seed's scan short once the sorted latitude gap reaches the threshold,
//! which gives the same partition with far fewer comparisons on spread-out
//! data.

use crate::clustering::partition::{Cluster, ClusterPartition, Singleton};
use crate::data::GeoRecord;
use crate::utils::config::{ClusterConfig, ScanStrategy};
use crate::utils::geometry::cluster_threshold;
use smallvec::SmallVec;
use std::time::Instant;

/// Cluster `records` at `zoom` with the default parameters
pub fn cluster(records: &[GeoRecord], zoom: f64) -> ClusterPartition<'_> {
    cluster_with(records, zoom, &ClusterConfig::default())
}

/// Cluster `records` at `zoom`
///
/// Pure: the same records in the same order at the same zoom always give the
/// same partition. Coordinates are not validated; NaN positions simply never
/// group with anything.
pub fn cluster_with<'a>(
    records: &'a [GeoRecord],
    zoom: f64,
    config: &ClusterConfig,
) -> ClusterPartition<'a> {
    debug_assert!(zoom.is_finite(), "zoom must be finite, got {}", zoom);

    if zoom >= config.disable_at_zoom {
        return ClusterPartition::all_singletons(records, zoom);
    }

    let start = Instant::now();
    let threshold = cluster_threshold(zoom, config.threshold_base, config.threshold_step);
    let windowed = config.strategy == ScanStrategy::LatitudeWindow;

    // sort_by is stable; total_cmp gives NaN a fixed place instead of panicking.
    // Adding 0.0 folds -0.0 into 0.0 so the two stay a tie.
    let mut sorted: Vec<&GeoRecord> = records.iter().collect();
    sorted.sort_by(|a, b| (a.latitude + 0.0).total_cmp(&(b.latitude + 0.0)));

    // Per-call membership, indexed by sorted position
    let mut assigned = vec![false; sorted.len()];
    let mut clusters = Vec::new();
    let mut singletons = Vec::new();
    let mut comparisons = 0usize;

    for i in 0..sorted.len() {
        if assigned[i] {
            continue;
        }
        assigned[i] = true;

        let seed = sorted[i];
        let seed_pos = seed.position();
        let mut group: SmallVec<[&GeoRecord; 8]> = SmallVec::new();
        group.push(seed);

        for j in i + 1..sorted.len() {
            let other = sorted[j];
            if windowed && other.latitude - seed.latitude >= threshold {
                break;
            }
            if assigned[j] {
                continue;
            }
            comparisons += 1;
            if seed_pos.within(&other.position(), threshold) {
                group.push(other);
                assigned[j] = true;
            }
        }

        if group.len() > 1 {
            clusters.push(Cluster::from_members(group.into_vec()));
        } else {
            singletons.push(Singleton { record: seed, selected: false });
        }
    }

    tracing::debug!(
        "Clustered {} records at zoom {:.2} (t={:.4}, {:?}): {} clusters, {} singletons, {} comparisons in {:?}",
        records.len(),
        zoom,
        threshold,
        config.strategy,
        clusters.len(),
        singletons.len(),
        comparisons,
        start.elapsed()
    );

    ClusterPartition {
        zoom,
        clusters,
        singletons,
        comparisons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pair(a: (f64, f64), b: (f64, f64)) -> Vec<GeoRecord> {
        vec![
            GeoRecord::new("a", a.0, a.1, "A"),
            GeoRecord::new("b", b.0, b.1, "B"),
        ]
    }

    #[test]
    fn test_empty_input() {
        let records: Vec<GeoRecord> = Vec::new();
        let partition = cluster(&records, 10.0);
        assert!(partition.is_empty());
        assert_eq!(partition.record_count(), 0);
    }

    #[test]
    fn test_high_zoom_disables_clustering() {
        let records = pair((12.9, 77.5), (12.9, 77.5));
        for zoom in [14.0, 14.5, 18.0] {
            let partition = cluster(&records, zoom);
            assert!(partition.clusters().is_empty());
            assert_eq!(partition.singletons().len(), 2);
        }
    }

    #[test]
    fn test_pair_breaks_apart_between_zoom_12_and_13() {
        // Both axis gaps are 0.0045: inside t=0.006 at zoom 12, outside t=0.004 at zoom 13
        let records = pair((12.900, 77.500), (12.9045, 77.5045));

        assert_eq!(cluster(&records, 10.0).clusters().len(), 1);
        assert_eq!(cluster(&records, 12.0).clusters().len(), 1);

        let at_13 = cluster(&records, 13.0);
        assert!(at_13.clusters().is_empty());
        assert_eq!(at_13.singletons().len(), 2);
    }

    #[test]
    fn test_gap_of_0_0035_only_splits_at_cutoff() {
        // 0.0035 < t(13) = 0.004, so this pair holds together until zoom 14
        let records = pair((12.900, 77.500), (12.9035, 77.5035));

        assert_eq!(cluster(&records, 13.0).clusters().len(), 1);
        assert!(cluster(&records, 14.0).clusters().is_empty());
    }

    #[test]
    fn test_centroid_and_cluster_id() {
        let records = pair((12.0, 77.0), (12.0, 77.002));
        let partition = cluster(&records, 10.0);

        let c = &partition.clusters()[0];
        assert_eq!(c.count(), 2);
        assert_eq!(c.id.to_string(), "cluster-a");
        assert_relative_eq!(c.centroid.lat, 12.0, epsilon = 1e-12);
        assert_relative_eq!(c.centroid.lon, 77.001, epsilon = 1e-12);
    }

    #[test]
    fn test_seed_is_lowest_latitude_and_ties_keep_input_order() {
        let records = vec![
            GeoRecord::new("north", 12.905, 77.5, "N"),
            GeoRecord::new("tie-1", 12.900, 77.5, "T1"),
            GeoRecord::new("tie-2", 12.900, 77.501, "T2"),
        ];
        let partition = cluster(&records, 10.0);

        let c = &partition.clusters()[0];
        let ids: Vec<&str> = c.members.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["tie-1", "tie-2", "north"]);
        assert_eq!(c.id.seed().as_str(), "tie-1");
    }

    #[test]
    fn test_signed_zero_latitudes_are_a_tie() {
        let records = vec![
            GeoRecord::new("first", 0.0, 0.0, "F"),
            GeoRecord::new("second", -0.0, 0.001, "S"),
        ];
        let partition = cluster(&records, 10.0);

        assert_eq!(partition.clusters().len(), 1);
        assert_eq!(partition.clusters()[0].id.to_string(), "cluster-first");
    }

    #[test]
    fn test_cluster_of_finds_merged_records_only() {
        let records = vec![
            GeoRecord::new("a", 12.900, 77.500, "A"),
            GeoRecord::new("b", 12.901, 77.501, "B"),
            GeoRecord::new("far", 13.500, 78.000, "Far"),
        ];
        let partition = cluster(&records, 10.0);

        let c = partition.cluster_of("b").unwrap();
        assert_eq!(c.id.to_string(), "cluster-a");
        assert!(c.contains("a"));
        assert!(!c.contains("far"));
        assert!(partition.cluster_of("far").is_none());
        assert!(partition.cluster_of("missing").is_none());
    }

    #[test]
    fn test_candidates_compare_against_seed_only() {
        // b is within t of a, c is within t of b but not of a
        let records = vec![
            GeoRecord::new("a", 0.000, 0.0, "A"),
            GeoRecord::new("b", 0.006, 0.0, "B"),
            GeoRecord::new("c", 0.012, 0.0, "C"),
        ];
        let partition = cluster(&records, 10.0);

        assert_eq!(partition.clusters().len(), 1);
        assert_eq!(partition.clusters()[0].count(), 2);
        assert_eq!(partition.singletons().len(), 1);
        assert_eq!(partition.singletons()[0].record.id.as_str(), "c");
    }

    #[test]
    fn test_nan_coordinates_do_not_panic_or_group() {
        let records = vec![
            GeoRecord::new("ok-1", 12.0, 77.0, "ok"),
            GeoRecord::new("nan", f64::NAN, 77.0, "bad"),
            GeoRecord::new("ok-2", 12.0, 77.0005, "ok"),
        ];
        let partition = cluster(&records, 10.0);

        assert_eq!(partition.record_count(), 3);
        assert_eq!(partition.clusters().len(), 1);
        assert_eq!(partition.singletons()[0].record.id.as_str(), "nan");
    }

    #[test]
    fn test_window_skips_far_latitudes() {
        let records: Vec<GeoRecord> = (0..50)
            .map(|i| GeoRecord::new(i.to_string(), i as f64, 0.0, "r"))
            .collect();

        let exhaustive = cluster(&records, 10.0);
        let windowed = cluster_with(
            &records,
            10.0,
            &ClusterConfig { strategy: ScanStrategy::LatitudeWindow, ..Default::default() },
        );

        assert_eq!(exhaustive.singletons().len(), 50);
        assert_eq!(windowed.singletons().len(), 50);
        assert_eq!(exhaustive.comparisons(), 50 * 49 / 2);
        assert_eq!(windowed.comparisons(), 0);
    }
}
