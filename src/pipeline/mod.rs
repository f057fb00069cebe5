//! Aggregation pipeline vocabulary for statpipe
//!
//! A pipeline is an ordered list of typed stages applied strictly left to
//! right. The stage and operator vocabulary is closed (sum types, not string
//! dispatch) so the executor gets exhaustiveness checking.
//!
//! The `parser` submodule accepts the Mongo-style JSON array the surrounding
//! API layer produces and lowers it into typed stages, reporting anything
//! outside the supported vocabulary as a diagnostic instead of failing.

mod group;
mod parser;
mod predicate;
mod project;
mod sort;
mod stage;

pub use group::{Accumulator, AccumulatorKind, GroupKey, GroupSpec};
pub use parser::parse_pipeline;
pub use predicate::{Clause, MatchOp, MatchSpec};
pub use project::{ProjectField, ProjectOp, ProjectSpec, BOUNCE_DURATION_MS};
pub use sort::{SortDirection, SortSpec};
pub use stage::{Pipeline, Stage};
