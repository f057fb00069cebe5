//! Result types for pipeline execution

use serde_json::{Number, Value};

use super::errors::Diagnostic;
use crate::record::Record;

/// Result of one pipeline invocation: best-effort rows plus any recoverable
/// diagnostics gathered along the way.
#[derive(Debug, Clone, Default)]
pub struct AggregationResult {
    /// Result rows (records, partition rows, or a single count row)
    pub rows: Vec<Record>,
    /// Recoverable problems encountered while parsing or executing
    pub diagnostics: Vec<Diagnostic>,
    /// Number of snapshot records scanned
    pub scanned_count: usize,
}

impl AggregationResult {
    /// Number of result rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if no rows were produced.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over the rows.
    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.rows.iter()
    }

    /// Reads the count from a short-circuited `$count` result.
    pub fn count(&self) -> Option<u64> {
        match self.rows.as_slice() {
            [row] => row.get("count").and_then(Value::as_u64),
            _ => None,
        }
    }

    /// Diagnostics rendered as strings, for callers that just log them.
    pub fn diagnostic_messages(&self) -> Vec<String> {
        self.diagnostics.iter().map(|d| d.to_string()).collect()
    }
}

/// Builds the single `{count: N}` row a `$count` stage produces.
pub(crate) fn count_row(count: usize) -> Record {
    let mut row = Record::new();
    row.set("count", Value::Number(Number::from(count)));
    row
}
