//! Marker presentation layer
//!
//! Turns a clustering partition into host-renderable markers:
//! - `icons`: size and anchor rules for cluster and record markers
//! - `popup`: cluster member lists and the selected-record popup
//! - `layer`: marker building and diffing against the previous frame

pub mod icons;
pub mod popup;
pub mod layer;

pub use icons::{cluster_icon, record_icon, ClusterIcon, RecordIcon};
pub use popup::{ClusterPopup, DetailPopup, PopupEntry};
pub use layer::{build_markers, MarkerDiff, MarkerId, MarkerKind, MarkerLayer, RenderMarker};
