//! Snapshot source trait and in-memory implementation

use std::collections::HashMap;

use crate::record::Record;

use super::errors::{SnapshotError, SnapshotResult};

/// The boundary to the backing store.
///
/// One call materializes every record of a collection with all fields, as a
/// single consistent point-in-time view sufficient for one pipeline run.
/// The engine never mutates the source; implementations must be safe for
/// concurrent reads.
pub trait SnapshotSource {
    /// Loads the entire collection.
    fn load_all(&self, collection: &str) -> SnapshotResult<Vec<Record>>;
}

/// Collections held in memory. Used for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySnapshot {
    collections: HashMap<String, Vec<Record>>,
}

impl MemorySnapshot {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a collection.
    pub fn with_collection(
        mut self,
        name: impl Into<String>,
        records: Vec<Record>,
    ) -> Self {
        self.collections.insert(name.into(), records);
        self
    }

    /// Adds a record to a collection, creating it if needed.
    pub fn insert(&mut self, collection: impl Into<String>, record: Record) {
        self.collections
            .entry(collection.into())
            .or_default()
            .push(record);
    }
}

impl SnapshotSource for MemorySnapshot {
    fn load_all(&self, collection: &str) -> SnapshotResult<Vec<Record>> {
        self.collections
            .get(collection)
            .cloned()
            .ok_or_else(|| SnapshotError::CollectionNotFound(collection.to_string()))
    }
}
