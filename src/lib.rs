//! Marker Cluster Engine
//!
//! Zoom-reactive clustering of geolocated listings for an interactive map.
//!
//! Module layout:
//! - `data`: Listing records and the id-indexed record set
//! - `utils/`: Geometry helpers and configuration
//! - `clustering/`: Greedy proximity clustering (records, zoom) -> partition
//! - `markers/`: Icons, popups and frame diffing for the host map
//! - `viewport`: Selection/pan state machine and recompute ordering
//! - `session`: Event queue, host and navigation seams
//!
//! Everything runs synchronously on the caller's thread; the clustering
//! function is pure and can be used on its own.

pub mod error;
pub mod utils;
pub mod data;
pub mod clustering;
pub mod markers;
pub mod viewport;
pub mod session;

// Re-export commonly used types
pub use error::MapError;
pub use utils::{LatLon, MapConfig, ClusterConfig, ScanStrategy};
pub use data::{GeoRecord, RecordId, RecordSet};
pub use clustering::{cluster, cluster_with, Cluster, ClusterId, ClusterPartition, Singleton};
pub use markers::{build_markers, MarkerId, MarkerKind, MarkerLayer, RenderMarker};
pub use viewport::{HostCommand, PanTarget, RecomputeTicket, ViewPhase, ViewportController, ViewportState};
pub use session::{dispatch, MapEvent, MapHost, MapSession, NavigationBridge};
