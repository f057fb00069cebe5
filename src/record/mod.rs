//! Record data model for statpipe
//!
//! A record is a flat mapping from field name to JSON value. Records are the
//! unit the pipeline operates on: snapshots yield them, stages transform
//! working copies of them, and result rows are records again.

mod record;
mod timestamp;

pub use record::Record;
pub use timestamp::parse_timestamp;
