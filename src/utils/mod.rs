//! Utility modules for the marker engine
//!
//! Contains shared functionality used across clustering and presentation:
//! - Geometry: Planar lat/lon helpers, centroid, zoom threshold
//! - Config: Serde-backed tunables with defaults

pub mod geometry;
pub mod config;

// Re-export commonly used types
pub use geometry::{LatLon, centroid, cluster_threshold};
pub use config::{MapConfig, ClusterConfig, IconConfig, AnimationConfig, ViewportConfig, PopupConfig, ScanStrategy};
