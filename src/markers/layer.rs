//! Render markers and frame-to-frame diffing
//!
//! A partition is turned into `RenderMarker`s (clusters first, then records,
//! each in partition order). `MarkerLayer` remembers what the host currently
//! shows and reports only the markers that appeared, disappeared or changed.

use crate::clustering::{ClusterId, ClusterPartition};
use crate::data::RecordId;
use crate::markers::icons::{cluster_icon, record_icon, ClusterIcon, RecordIcon};
use crate::markers::popup::ClusterPopup;
use crate::utils::config::MapConfig;
use crate::utils::geometry::LatLon;
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;

/// Key of a marker on the host
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum MarkerId {
    Cluster(ClusterId),
    Record(RecordId),
}

impl fmt::Display for MarkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerId::Cluster(id) => write!(f, "{}", id),
            MarkerId::Record(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MarkerKind {
    Cluster {
        count: usize,
        icon: ClusterIcon,
        popup: ClusterPopup,
    },
    Record {
        selected: bool,
        icon: RecordIcon,
    },
}

/// One map primitive ready to hand to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderMarker {
    pub id: MarkerId,
    pub position: LatLon,
    pub kind: MarkerKind,
}

impl RenderMarker {
    pub fn is_cluster(&self) -> bool {
        matches!(self.kind, MarkerKind::Cluster { .. })
    }
}

/// Build markers for a partition; singleton selection flags decide icon size
pub fn build_markers(partition: &ClusterPartition<'_>, config: &MapConfig) -> Vec<RenderMarker> {
    let mut markers = Vec::with_capacity(partition.len());

    for cluster in partition.clusters() {
        markers.push(RenderMarker {
            id: MarkerId::Cluster(cluster.id.clone()),
            position: cluster.centroid,
            kind: MarkerKind::Cluster {
                count: cluster.count(),
                icon: cluster_icon(cluster.count(), &config.icons),
                popup: ClusterPopup::for_cluster(cluster, &config.popup),
            },
        });
    }

    for single in partition.singletons() {
        markers.push(RenderMarker {
            id: MarkerId::Record(single.record.id.clone()),
            position: single.record.position(),
            kind: MarkerKind::Record {
                selected: single.selected,
                icon: record_icon(&single.record.name, single.selected, &config.icons),
            },
        });
    }

    markers
}

/// Changes needed to bring the host from the previous frame to the next
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerDiff {
    pub removed: Vec<MarkerId>,
    pub added: Vec<RenderMarker>,
    pub updated: Vec<RenderMarker>,
}

impl MarkerDiff {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty() && self.added.is_empty() && self.updated.is_empty()
    }
}

/// Markers currently shown on the host
#[derive(Debug, Default)]
pub struct MarkerLayer {
    rendered: FxHashMap<MarkerId, RenderMarker>,
    order: Vec<MarkerId>,
}

impl MarkerLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current frame with `next` and return what changed
    pub fn apply(&mut self, next: Vec<RenderMarker>) -> MarkerDiff {
        let mut diff = MarkerDiff::default();
        let mut next_rendered: FxHashMap<MarkerId, RenderMarker> = FxHashMap::default();
        next_rendered.reserve(next.len());
        let mut next_order = Vec::with_capacity(next.len());

        for marker in next {
            match self.rendered.get(&marker.id) {
                None => diff.added.push(marker.clone()),
                Some(prev) if *prev != marker => diff.updated.push(marker.clone()),
                Some(_) => {}
            }
            next_order.push(marker.id.clone());
            next_rendered.insert(marker.id.clone(), marker);
        }

        diff.removed = self
            .order
            .iter()
            .filter(|id| !next_rendered.contains_key(*id))
            .cloned()
            .collect();

        self.rendered = next_rendered;
        self.order = next_order;
        diff
    }

    pub fn get(&self, id: &MarkerId) -> Option<&RenderMarker> {
        self.rendered.get(id)
    }

    /// Markers in render order
    pub fn markers(&self) -> impl Iterator<Item = &RenderMarker> + '_ {
        self.order.iter().filter_map(|id| self.rendered.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Forget everything; the host is assumed to be torn down too
    pub fn clear(&mut self) {
        self.rendered.clear();
        self.order.clear();
    }
}
