//! Pipeline interpreter for statpipe
//!
//! Re-implements pipeline-style aggregation in application code, over
//! snapshots from a store that only offers full-collection scans.
//!
//! # Execution flow (strict order)
//!
//! 1. Validate the pipeline shape; structural problems are fatal and reject
//!    the pipeline before any work runs
//! 2. Fold the snapshot through each stage left to right, replacing the
//!    working set after each stage
//! 3. `$count` short-circuits: it replaces the result with one row and
//!    trailing stages never execute
//!
//! Recoverable problems (unsupported vocabulary, malformed stages) become
//! [`Diagnostic`] values carried alongside the best-effort result; they
//! never abort the aggregation.

mod errors;
mod executor;
mod grouper;
mod matcher;
mod projector;
mod result;
mod sorter;

pub use errors::{Diagnostic, PipelineError, PipelineResult};
pub use executor::PipelineExecutor;
pub use grouper::GroupAggregator;
pub use matcher::MatchFilter;
pub use projector::Projector;
pub use result::AggregationResult;
pub use sorter::ResultSorter;
