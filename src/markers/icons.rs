//! Marker icon geometry
//!
//! Sizes and anchors only; the host decides how to draw them.

use crate::utils::config::IconConfig;
use serde::Serialize;

/// Stacking order: clusters under records, the selected record on top
pub const CLUSTER_Z_INDEX: i32 = 999;
pub const MARKER_Z_INDEX: i32 = 1000;
pub const SELECTED_Z_INDEX: i32 = 1001;

/// Aggregate marker drawn as a circle with the member count
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterIcon {
    pub size: f64,
    pub font_size: f64,
    /// Centre of the circle
    pub anchor: (f64, f64),
    pub label: String,
    pub class_name: &'static str,
    pub z_index: i32,
}

/// Single-record marker drawn as a name badge
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordIcon {
    pub size: f64,
    /// Bottom centre of the badge
    pub anchor: (f64, f64),
    pub label_offset: (f64, f64),
    pub popup_anchor: (f64, f64),
    pub label: String,
    pub class_name: &'static str,
    pub z_index: i32,
}

/// Diameter and font grow with the count and stop at their caps
pub fn cluster_icon(count: usize, config: &IconConfig) -> ClusterIcon {
    let n = count as f64;
    let size = (config.cluster_base_size + n * config.cluster_size_per_member).min(config.cluster_max_size);
    let font_size = (config.cluster_base_font + n / config.cluster_members_per_font_px).min(config.cluster_max_font);

    ClusterIcon {
        size,
        font_size,
        anchor: (size / 2.0, size / 2.0),
        label: count.to_string(),
        class_name: "cluster-marker",
        z_index: CLUSTER_Z_INDEX,
    }
}

pub fn record_icon(label: &str, selected: bool, config: &IconConfig) -> RecordIcon {
    let size = if selected { config.selected_marker_size } else { config.marker_size };

    RecordIcon {
        size,
        anchor: (size / 2.0, size),
        label_offset: if selected { (-10.0, -20.0) } else { (-15.0, -20.0) },
        popup_anchor: (0.0, -30.0),
        label: label.to_string(),
        class_name: if selected { "selected-marker" } else { "normal-marker" },
        z_index: if selected { SELECTED_Z_INDEX } else { MARKER_Z_INDEX },
    }
}
