//! Map Configuration
//!
//! Tunables for clustering, icon sizing and viewport animation. Every field
//! has a default, so a partial JSON file only overrides what it names.

use crate::utils::geometry::LatLon;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level configuration for a map session
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub clustering: ClusterConfig,
    pub icons: IconConfig,
    pub animation: AnimationConfig,
    pub viewport: ViewportConfig,
    pub popup: PopupConfig,
}

/// How the greedy scan looks for neighbours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStrategy {
    /// Compare every seed against every later record
    #[default]
    Exhaustive,
    /// Stop a seed's scan once the latitude gap reaches the threshold
    LatitudeWindow,
}

/// Clustering parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// At or above this zoom every record is rendered on its own
    pub disable_at_zoom: f64,
    /// `base` in `(base - zoom) * step`
    pub threshold_base: f64,
    /// `step` in `(base - zoom) * step`, degrees per zoom level
    pub threshold_step: f64,
    pub strategy: ScanStrategy,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            disable_at_zoom: 14.0,
            threshold_base: 15.0,
            threshold_step: 0.002,
            strategy: ScanStrategy::Exhaustive,
        }
    }
}

/// Icon sizing, in pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IconConfig {
    pub cluster_base_size: f64,
    pub cluster_size_per_member: f64,
    pub cluster_max_size: f64,
    pub cluster_base_font: f64,
    pub cluster_members_per_font_px: f64,
    pub cluster_max_font: f64,
    pub marker_size: f64,
    pub selected_marker_size: f64,
}

impl Default for IconConfig {
    fn default() -> Self {
        Self {
            cluster_base_size: 40.0,
            cluster_size_per_member: 2.0,
            cluster_max_size: 60.0,
            cluster_base_font: 14.0,
            cluster_members_per_font_px: 5.0,
            cluster_max_font: 16.0,
            marker_size: 30.0,
            selected_marker_size: 40.0,
        }
    }
}

/// Programmatic camera movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Zoom levels added when a cluster marker is clicked
    pub cluster_zoom_step: f64,
    pub fly_duration_secs: f64,
    pub pan_duration_secs: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            cluster_zoom_step: 2.0,
            fly_duration_secs: 1.0,
            pan_duration_secs: 1.5,
        }
    }
}

/// Starting camera and event handling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub initial_center: LatLon,
    pub initial_zoom: f64,
    /// Collapse queued zoom-end events to the last one before recomputing
    pub coalesce_zoom: bool,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            initial_center: LatLon::new(12.97, 77.59),
            initial_zoom: 12.0,
            coalesce_zoom: true,
        }
    }
}

/// Popup content options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupConfig {
    /// Payload field shown under each member name in a cluster popup
    pub subtitle_field: Option<String>,
    pub offset: (f64, f64),
    pub min_width: f64,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            subtitle_field: Some("micromarket".to_string()),
            offset: (0.0, -20.0),
            min_width: 400.0,
        }
    }
}

impl MapConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read map config file: {:?}", path))?;

        let config: MapConfig = serde_json::from_str(&contents)
            .with_context(|| "Failed to parse map config JSON")?;

        if !config.viewport.initial_zoom.is_finite() {
            anyhow::bail!("initial_zoom must be finite, got {}", config.viewport.initial_zoom);
        }

        tracing::info!("Loaded map config from {:?}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let json = r#"{ "clustering": { "strategy": "latitude_window" }, "animation": { "cluster_zoom_step": 3 } }"#;
        let config: MapConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.clustering.strategy, ScanStrategy::LatitudeWindow);
        assert_eq!(config.clustering.disable_at_zoom, 14.0);
        assert_eq!(config.animation.cluster_zoom_step, 3.0);
        assert_eq!(config.animation.pan_duration_secs, 1.5);
        assert_eq!(config.viewport.initial_zoom, 12.0);
        assert_eq!(config.popup.subtitle_field.as_deref(), Some("micromarket"));
    }

    #[test]
    fn test_load_missing_file_has_context() {
        let err = MapConfig::load(Path::new("/nonexistent/map_config.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read map config file"));
    }
}
