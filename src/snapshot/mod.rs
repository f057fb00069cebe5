//! Snapshot loader boundary for statpipe
//!
//! The backing store offers full-collection scans only; the engine asks for
//! one snapshot per pipeline run and works on it in memory.

mod errors;
mod json;
mod source;

pub use errors::{SnapshotError, SnapshotResult};
pub use json::JsonSnapshot;
pub use source::{MemorySnapshot, SnapshotSource};
