//! Listing Records
//!
//! Geolocated property records as handed over by the listing store. Only the
//! identifier, coordinates and display name matter to the marker engine;
//! every other field rides along untouched in `payload`.

use crate::error::MapError;
use crate::utils::geometry::LatLon;
use anyhow::{Context, Result};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::borrow::Borrow;
use std::fmt;
use std::fs;
use std::path::Path;

/// Stable record identifier
///
/// Listing ids arrive as either JSON strings or integers; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(s) => RecordId(s),
            RawId::Signed(n) => RecordId(n.to_string()),
            RawId::Unsigned(n) => RecordId(n.to_string()),
        })
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for RecordId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A single listing reduced to what the map needs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoRecord {
    pub id: RecordId,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(alias = "displayName")]
    pub name: String,
    /// Price, area, status, slug, ... passed through unchanged
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl GeoRecord {
    pub fn new(id: impl Into<RecordId>, latitude: f64, longitude: f64, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            latitude,
            longitude,
            name: name.into(),
            payload: Map::new(),
        }
    }

    /// Builder-style payload field
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.payload.insert(key.to_string(), value.into());
        self
    }

    pub fn position(&self) -> LatLon {
        LatLon::new(self.latitude, self.longitude)
    }

    /// String-valued payload field, if present
    pub fn payload_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }
}

/// Accepted file shapes: a bare array, or the listing response object
#[derive(Deserialize)]
#[serde(untagged)]
enum ListingFile {
    Bare(Vec<GeoRecord>),
    Wrapped { projects: Vec<GeoRecord> },
}

/// Ordered, id-indexed collection of records
///
/// Input order is preserved; it decides tie-breaking inside the clustering sort.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    records: Vec<GeoRecord>,
    index: FxHashMap<RecordId, usize>,
}

impl RecordSet {
    /// Build from records, rejecting duplicate ids
    pub fn new(records: Vec<GeoRecord>) -> std::result::Result<Self, MapError> {
        let mut index = FxHashMap::default();
        index.reserve(records.len());
        for (pos, record) in records.iter().enumerate() {
            if index.insert(record.id.clone(), pos).is_some() {
                return Err(MapError::DuplicateRecordId(record.id.to_string()));
            }
        }
        Ok(Self { records, index })
    }

    /// Parse records from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: ListingFile = serde_json::from_str(json)
            .with_context(|| "Failed to parse listing JSON")?;

        let records = match file {
            ListingFile::Bare(records) => records,
            ListingFile::Wrapped { projects } => projects,
        };

        Ok(Self::new(records)?)
    }

    /// Load records from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read listing file: {:?}", path))?;

        let set = Self::from_json_str(&contents)
            .with_context(|| format!("Invalid listing file: {:?}", path))?;

        tracing::info!("Loaded {} records from {:?}", set.len(), path);
        Ok(set)
    }

    pub fn records(&self) -> &[GeoRecord] {
        &self.records
    }

    pub fn get(&self, id: &str) -> Option<&GeoRecord> {
        self.index.get(id).map(|&pos| &self.records[pos])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeoRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a RecordSet {
    type Item = &'a GeoRecord;
    type IntoIter = std::slice::Iter<'a, GeoRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_is_read_as_name() {
        let json = r#"[{ "id": 1, "latitude": 12.9, "longitude": 77.5, "displayName": "Palm Grove", "micromarket": "Whitefield" }]"#;
        let set = RecordSet::from_json_str(json).unwrap();

        let record = set.get("1").unwrap();
        assert_eq!(record.name, "Palm Grove");
        assert!(!record.payload.contains_key("displayName"));
        assert_eq!(record.payload_str("micromarket"), Some("Whitefield"));
    }

    #[test]
    fn test_parse_wrapped_listing_with_mixed_ids() {
        let json = r#"{
            "projects": [
                { "id": 101, "latitude": 12.9, "longitude": 77.5, "name": "Palm Grove", "micromarket": "Whitefield", "minPrice": 9500000 },
                { "id": "p-2", "latitude": 12.95, "longitude": 77.6, "name": "Lake View" }
            ],
            "total": 2
        }"#;

        let set = RecordSet::from_json_str(json).unwrap();
        assert_eq!(set.len(), 2);

        let first = set.get("101").unwrap();
        assert_eq!(first.name, "Palm Grove");
        assert_eq!(first.payload_str("micromarket"), Some("Whitefield"));
        assert_eq!(first.payload.get("minPrice").and_then(Value::as_u64), Some(9_500_000));
        assert!(set.contains("p-2"));
        assert!(!set.contains("p-3"));
    }

    #[test]
    fn test_parse_bare_array_preserves_order() {
        let json = r#"[
            { "id": "b", "latitude": 1.0, "longitude": 1.0, "name": "B" },
            { "id": "a", "latitude": 0.0, "longitude": 0.0, "name": "A" }
        ]"#;
        let set = RecordSet::from_json_str(json).unwrap();
        let ids: Vec<&str> = set.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let records = vec![
            GeoRecord::new("x", 0.0, 0.0, "one"),
            GeoRecord::new("x", 1.0, 1.0, "two"),
        ];
        assert_eq!(
            RecordSet::new(records).unwrap_err(),
            MapError::DuplicateRecordId("x".to_string())
        );
    }

    #[test]
    fn test_payload_round_trips_through_serialize() {
        let record = GeoRecord::new("7", 12.0, 77.0, "Seven").with_field("status", "soldOut");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["status"], "soldOut");
        assert_eq!(value["id"], "7");
    }
}
