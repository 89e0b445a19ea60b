//! Error types for the marker engine
//!
//! The clustering pass itself never fails; these variants cover contract
//! violations at the controller boundary and malformed input at load time.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MapError {
    /// Zoom levels drive both the threshold and the clustering cut-off,
    /// so NaN or infinite values are rejected before any state changes.
    #[error("zoom level must be finite, got {0}")]
    NonFiniteZoom(f64),

    #[error("duplicate record id '{0}' in input set")]
    DuplicateRecordId(String),
}
