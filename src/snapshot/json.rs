//! File-backed snapshot source
//!
//! Reads collections from a JSON file shaped as
//! `{"collection": [record, …], …}`. The file is re-read on every load so
//! each pipeline run sees its own point-in-time view; there is no caching
//! between calls.

use std::fs;
use std::path::PathBuf;

use serde_json::Value;

use crate::record::Record;

use super::errors::{SnapshotError, SnapshotResult};
use super::source::SnapshotSource;

/// Snapshot source backed by a JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonSnapshot {
    path: PathBuf,
}

impl JsonSnapshot {
    /// Points the source at a snapshot file. The file is not opened until
    /// the first load.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_collections(&self) -> SnapshotResult<Value> {
        let raw = fs::read_to_string(&self.path).map_err(|source| SnapshotError::ReadFailed {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_str(&raw)
            .map_err(|e| SnapshotError::InvalidFormat(format!("not valid JSON: {e}")))
    }
}

impl SnapshotSource for JsonSnapshot {
    fn load_all(&self, collection: &str) -> SnapshotResult<Vec<Record>> {
        let root = self.read_collections()?;
        let collections = root.as_object().ok_or_else(|| {
            SnapshotError::InvalidFormat("top level must be an object of collections".to_string())
        })?;

        let entries = collections
            .get(collection)
            .ok_or_else(|| SnapshotError::CollectionNotFound(collection.to_string()))?
            .as_array()
            .ok_or_else(|| {
                SnapshotError::InvalidFormat(format!("collection '{collection}' is not an array"))
            })?;

        entries
            .iter()
            .map(|entry| {
                Record::from_value(entry.clone()).ok_or_else(|| {
                    SnapshotError::InvalidFormat(format!(
                        "collection '{collection}' contains a non-object record"
                    ))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn snapshot_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_collection() {
        let file = snapshot_file(r#"{"records": [{"domainId": "a"}, {"domainId": "b"}]}"#);
        let source = JsonSnapshot::new(file.path());

        let records = source.load_all("records").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].get("domainId"), Some(&serde_json::json!("a")));
    }

    #[test]
    fn test_missing_file() {
        let source = JsonSnapshot::new("/nonexistent/snapshot.json");
        assert!(matches!(
            source.load_all("records").unwrap_err(),
            SnapshotError::ReadFailed { .. }
        ));
    }

    #[test]
    fn test_unknown_collection() {
        let file = snapshot_file(r#"{"records": []}"#);
        let source = JsonSnapshot::new(file.path());
        assert!(matches!(
            source.load_all("events").unwrap_err(),
            SnapshotError::CollectionNotFound(_)
        ));
    }

    #[test]
    fn test_malformed_contents() {
        let file = snapshot_file(r#"{"records": [42]}"#);
        let source = JsonSnapshot::new(file.path());
        assert!(matches!(
            source.load_all("records").unwrap_err(),
            SnapshotError::InvalidFormat(_)
        ));

        let file = snapshot_file("not json");
        let source = JsonSnapshot::new(file.path());
        assert!(matches!(
            source.load_all("records").unwrap_err(),
            SnapshotError::InvalidFormat(_)
        ));
    }

    #[test]
    fn test_reread_on_every_load() {
        let file = snapshot_file(r#"{"records": []}"#);
        let source = JsonSnapshot::new(file.path());
        assert_eq!(source.load_all("records").unwrap().len(), 0);

        std::fs::write(file.path(), r#"{"records": [{"id": 1}]}"#).unwrap();
        assert_eq!(source.load_all("records").unwrap().len(), 1);
    }
}
