//! Popup content for cluster and selected-record markers

use crate::clustering::Cluster;
use crate::data::{GeoRecord, RecordId};
use crate::utils::config::PopupConfig;
use crate::utils::geometry::LatLon;
use serde::Serialize;

/// One row in a cluster popup; clicking it selects the record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopupEntry {
    pub record_id: RecordId,
    pub name: String,
    pub subtitle: Option<String>,
}

/// Member list shown when a cluster marker's popup opens
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterPopup {
    pub title: String,
    pub entries: Vec<PopupEntry>,
}

impl ClusterPopup {
    pub fn for_cluster(cluster: &Cluster<'_>, config: &PopupConfig) -> Self {
        let entries = cluster
            .members
            .iter()
            .map(|record| PopupEntry {
                record_id: record.id.clone(),
                name: record.name.clone(),
                subtitle: config
                    .subtitle_field
                    .as_deref()
                    .and_then(|field| record.payload_str(field))
                    .map(str::to_string),
            })
            .collect();

        Self {
            title: format!("{} Properties in this area", cluster.count()),
            entries,
        }
    }
}

/// Detail popup pinned to the selected record
///
/// Stays open across map clicks on markers; clicking it navigates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailPopup {
    pub record_id: RecordId,
    pub title: String,
    pub position: LatLon,
    pub offset: (f64, f64),
    pub min_width: f64,
    pub auto_close: bool,
    pub close_on_escape: bool,
}

impl DetailPopup {
    pub fn for_record(record: &GeoRecord, config: &PopupConfig) -> Self {
        Self {
            record_id: record.id.clone(),
            title: record.name.clone(),
            position: record.position(),
            offset: config.offset,
            min_width: config.min_width,
            auto_close: false,
            close_on_escape: true,
        }
    }
}
