//! Partition types produced by one clustering pass
//!
//! A partition borrows from the record slice it was computed over and is
//! dropped once its markers have been built.

use crate::data::{GeoRecord, RecordId};
use crate::utils::geometry::{centroid, LatLon};
use serde::Serialize;
use std::fmt;

/// Identifier of a cluster, derived from its seed record
///
/// Displays as `cluster-<seed id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ClusterId(RecordId);

impl ClusterId {
    pub fn from_seed(seed: &RecordId) -> Self {
        Self(seed.clone())
    }

    pub fn seed(&self) -> &RecordId {
        &self.0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cluster-{}", self.0)
    }
}

/// Several nearby records merged into one aggregate marker
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster<'a> {
    pub id: ClusterId,
    /// Mean of member latitudes and longitudes
    pub centroid: LatLon,
    /// In the order the scan absorbed them; the seed comes first
    pub members: Vec<&'a GeoRecord>,
}

impl<'a> Cluster<'a> {
    /// Build from at least two members; `members[0]` is the seed
    pub(crate) fn from_members(members: Vec<&'a GeoRecord>) -> Self {
        debug_assert!(members.len() > 1, "a cluster needs more than one member");
        let id = ClusterId::from_seed(&members[0].id);
        let centroid = centroid(members.iter().map(|r| r.position())).unwrap_or_default();
        Self { id, centroid, members }
    }

    pub fn count(&self) -> usize {
        self.members.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.members.iter().any(|r| r.id.as_str() == id)
    }
}

/// A record rendered on its own
#[derive(Debug, Clone, PartialEq)]
pub struct Singleton<'a> {
    pub record: &'a GeoRecord,
    pub selected: bool,
}

/// Output of one clustering pass: every input record appears exactly once,
/// either as a cluster member or as a singleton
#[derive(Debug, Clone)]
pub struct ClusterPartition<'a> {
    pub(crate) zoom: f64,
    pub(crate) clusters: Vec<Cluster<'a>>,
    pub(crate) singletons: Vec<Singleton<'a>>,
    pub(crate) comparisons: usize,
}

impl<'a> ClusterPartition<'a> {
    /// Every record as its own singleton, in input order
    pub(crate) fn all_singletons(records: &'a [GeoRecord], zoom: f64) -> Self {
        Self {
            zoom,
            clusters: Vec::new(),
            singletons: records
                .iter()
                .map(|record| Singleton { record, selected: false })
                .collect(),
            comparisons: 0,
        }
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn clusters(&self) -> &[Cluster<'a>] {
        &self.clusters
    }

    pub fn singletons(&self) -> &[Singleton<'a>] {
        &self.singletons
    }

    /// Pairwise distance checks performed by the scan
    pub fn comparisons(&self) -> usize {
        self.comparisons
    }

    /// Number of markers (clusters + singletons)
    pub fn len(&self) -> usize {
        self.clusters.len() + self.singletons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty() && self.singletons.is_empty()
    }

    /// Number of input records covered
    pub fn record_count(&self) -> usize {
        self.clusters.iter().map(Cluster::count).sum::<usize>() + self.singletons.len()
    }

    /// Cluster holding `id`, if it was merged
    pub fn cluster_of(&self, id: &str) -> Option<&Cluster<'a>> {
        self.clusters.iter().find(|c| c.contains(id))
    }

    /// Set the selection flag on singletons; clears any previous flag
    ///
    /// Returns true when `id` is rendered as a singleton.
    pub fn mark_selected(&mut self, id: Option<&str>) -> bool {
        let mut found = false;
        for single in &mut self.singletons {
            single.selected = Some(single.record.id.as_str()) == id;
            found |= single.selected;
        }
        found
    }

    /// All covered records, clusters first
    pub fn records(&self) -> impl Iterator<Item = &'a GeoRecord> + '_ {
        self.clusters
            .iter()
            .flat_map(|c| c.members.iter().copied())
            .chain(self.singletons.iter().map(|s| s.record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_id_display() {
        let id = ClusterId::from_seed(&RecordId::new("42"));
        assert_eq!(id.to_string(), "cluster-42");
    }

    #[test]
    fn test_mark_selected_is_exclusive() {
        let records = vec![
            GeoRecord::new("a", 0.0, 0.0, "A"),
            GeoRecord::new("b", 1.0, 1.0, "B"),
        ];
        let mut partition = ClusterPartition::all_singletons(&records, 15.0);

        assert!(partition.mark_selected(Some("b")));
        assert!(!partition.singletons()[0].selected);
        assert!(partition.singletons()[1].selected);

        assert!(!partition.mark_selected(Some("zzz")));
        assert!(partition.singletons().iter().all(|s| !s.selected));
    }
}
