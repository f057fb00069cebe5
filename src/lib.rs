//! statpipe - an in-process aggregation pipeline engine for flat analytics
//! records
//!
//! Re-implements pipeline-style aggregation (match, group, project, sort,
//! limit, count) in application code, over collections held in a backing
//! store that offers only full-collection scans and key lookups.

pub mod cli;
pub mod engine;
pub mod executor;
pub mod observability;
pub mod pipeline;
pub mod record;
pub mod snapshot;

pub use engine::{AggregationEngine, EngineError, EngineResult};
pub use executor::{AggregationResult, Diagnostic, PipelineError};
pub use pipeline::{Pipeline, Stage};
pub use record::Record;
