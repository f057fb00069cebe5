//! Sort stage evaluation
//!
//! Orders rows by numeric difference on a field. Numbers sort by value,
//! temporal strings by their instant. Non-numeric, non-temporal values have
//! no defined relative order (known limitation; the domain only sorts
//! counts and timestamps).
//!
//! A multi-field sort spec performs one full re-sort per field, so the last
//! field listed decides the final order. Faithful to the source system;
//! covered by a regression test rather than "fixed".

use std::cmp::Ordering;

use crate::pipeline::{SortDirection, SortSpec};
use crate::record::Record;

/// Sorts result rows
pub struct ResultSorter;

impl ResultSorter {
    /// Applies the sort spec. Each sort pass is stable.
    pub fn sort(rows: &mut [Record], spec: &SortSpec) {
        for (field, direction) in &spec.fields {
            rows.sort_by(|a, b| {
                let ordering = Self::compare(a, b, field);
                match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }
    }

    fn compare(a: &Record, b: &Record, field: &str) -> Ordering {
        match (Self::sort_key(a, field), Self::sort_key(b, field)) {
            (Some(a), Some(b)) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }

    /// Numeric sort key: plain numbers as-is, temporal values as epoch
    /// milliseconds.
    fn sort_key(record: &Record, field: &str) -> Option<f64> {
        record
            .number(field)
            .or_else(|| record.timestamp(field).map(|ts| ts.timestamp_millis() as f64))
    }
}
