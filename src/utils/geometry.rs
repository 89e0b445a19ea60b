//! Planar Geometry Helpers
//!
//! Coordinates are treated as plain (latitude, longitude) pairs in degrees.
//! No projection is applied: distances are compared per-axis, which is good
//! enough for deciding what overlaps on screen at a given zoom.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True when both axis gaps to `other` are strictly below `threshold`
    ///
    /// NaN on either side never matches.
    pub fn within(&self, other: &LatLon, threshold: f64) -> bool {
        (self.lat - other.lat).abs() < threshold && (self.lon - other.lon).abs() < threshold
    }
}

impl From<(f64, f64)> for LatLon {
    fn from((lat, lon): (f64, f64)) -> Self {
        Self { lat, lon }
    }
}

/// Arithmetic mean of a set of positions
///
/// Returns `None` for an empty iterator.
pub fn centroid<I>(points: I) -> Option<LatLon>
where
    I: IntoIterator<Item = LatLon>,
{
    let mut n = 0usize;
    let mut lat_sum = 0.0;
    let mut lon_sum = 0.0;
    for p in points {
        lat_sum += p.lat;
        lon_sum += p.lon;
        n += 1;
    }
    if n == 0 {
        return None;
    }
    Some(LatLon::new(lat_sum / n as f64, lon_sum / n as f64))
}

/// Zoom-dependent grouping threshold in degrees: `(base - zoom) * step`
///
/// With the default base of 15 and step of 0.002 this gives 0.01 at zoom 10
/// and 0.004 at zoom 13. The value is not corrected for longitude shrinking
/// with latitude.
pub fn cluster_threshold(zoom: f64, base: f64, step: f64) -> f64 {
    (base - zoom) * step
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_centroid_is_mean() {
        let c = centroid([LatLon::new(12.0, 77.0), LatLon::new(12.0, 77.002)]).unwrap();
        assert_relative_eq!(c.lat, 12.0, epsilon = 1e-12);
        assert_relative_eq!(c.lon, 77.001, epsilon = 1e-12);
    }

    #[test]
    fn test_centroid_empty() {
        assert!(centroid(std::iter::empty()).is_none());
    }

    #[test]
    fn test_threshold_values() {
        assert_relative_eq!(cluster_threshold(10.0, 15.0, 0.002), 0.01, epsilon = 1e-12);
        assert_relative_eq!(cluster_threshold(12.0, 15.0, 0.002), 0.006, epsilon = 1e-12);
        assert_relative_eq!(cluster_threshold(13.0, 15.0, 0.002), 0.004, epsilon = 1e-12);
    }

    #[test]
    fn test_within_is_strict_and_rejects_nan() {
        let a = LatLon::new(0.0, 0.0);
        assert!(a.within(&LatLon::new(0.001, 0.001), 0.002));
        assert!(!a.within(&LatLon::new(0.002, 0.0), 0.002));
        assert!(!a.within(&LatLon::new(f64::NAN, 0.0), 0.002));
    }
}
