//! JSON snapshot of a loaded schema, for rendering without a live server.

use crate::model::{ForeignKeyEdge, Schema, Table};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Failed to read snapshot: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    pub tables: Vec<Table>,
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyEdge>,
}

impl Snapshot {
    pub fn new(database: Option<&str>, schema: &Schema, edges: &[ForeignKeyEdge]) -> Self {
        Self {
            database: database.map(str::to_string),
            tables: schema.tables().to_vec(),
            foreign_keys: edges.to_vec(),
        }
    }

    pub fn into_parts(self) -> (Schema, Vec<ForeignKeyEdge>) {
        (self.tables.into_iter().collect(), self.foreign_keys)
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn read_file(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::hotel_booking_schema;
    use crate::model::KeyKind;

    #[test]
    fn test_round_trip_keeps_order() {
        let (schema, edges) = hotel_booking_schema();
        let json = Snapshot::new(Some("hotel"), &schema, &edges).to_json().unwrap();
        let (back, back_edges) = Snapshot::from_json(&json).unwrap().into_parts();

        assert_eq!(back, schema);
        assert_eq!(back_edges, edges);
    }

    #[test]
    fn test_minimal_json() {
        let json = r#"{
            "tables": [
                { "name": "Guests", "columns": [
                    { "name": "guest_id", "type": "int", "key": "primary" },
                    { "name": "email", "type": "varchar", "length": 100, "key": "unique" }
                ]}
            ]
        }"#;
        let snapshot = Snapshot::from_json(json).unwrap();
        assert!(snapshot.database.is_none());
        assert!(snapshot.foreign_keys.is_empty());

        let (schema, _) = snapshot.into_parts();
        let cols = schema.get("Guests").unwrap();
        assert_eq!(cols[0].key, KeyKind::Primary);
        assert_eq!(cols[1].length, Some(100));
        assert_eq!(cols[1].extra, "");
    }

    #[test]
    fn test_invalid_json() {
        let err = Snapshot::from_json("{ nope").unwrap_err();
        assert!(matches!(err, SnapshotError::Json(_)));
    }

    #[test]
    fn test_read_file() {
        let (schema, edges) = hotel_booking_schema();
        let path = std::env::temp_dir().join(format!("schemaviz-snapshot-{}.json", std::process::id()));
        fs::write(&path, Snapshot::new(None, &schema, &edges).to_json().unwrap()).unwrap();

        let snapshot = Snapshot::read_file(&path);
        fs::remove_file(&path).unwrap();

        let (back, back_edges) = snapshot.unwrap().into_parts();
        assert_eq!(back, schema);
        assert_eq!(back_edges.len(), 3);
    }

    #[test]
    fn test_read_missing_file() {
        let err = Snapshot::read_file("/nonexistent/schemaviz/snapshot.json").unwrap_err();
        assert!(matches!(err, SnapshotError::Io(_)));
        assert!(err.to_string().starts_with("Failed to read snapshot"));
    }
}
