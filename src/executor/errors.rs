//! Executor error types
//!
//! Two severities, modeled as two types:
//!
//! - [`PipelineError`]: structural problems that reject the pipeline before
//!   any work runs. Never produces partial results.
//! - [`Diagnostic`]: recoverable problems (unsupported vocabulary, malformed
//!   stages). The offending part becomes a no-op and execution continues;
//!   diagnostics travel with the result so callers and tests can assert on
//!   them deterministically instead of scraping logs.

use thiserror::Error;

/// Result type for pipeline execution
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Fatal pipeline shape errors, raised before execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PipelineError {
    #[error("$group key references zero fields")]
    EmptyGroupKey,

    #[error("pipeline contains more than one $group stage")]
    MultipleGroupStages,

    #[error("$group stage appears after {0}")]
    GroupAfterFinalizer(&'static str),

    #[error("conflicting accumulators for output field '{0}'")]
    ConflictingAccumulators(String),
}

/// Recoverable problems surfaced alongside a best-effort result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
    #[error("unsupported operator {operator} on field '{field}' in {stage}; clause skipped")]
    UnsupportedOperator {
        stage: &'static str,
        field: String,
        operator: String,
    },

    #[error("unsupported stage '{name}'; skipped")]
    UnsupportedStage { name: String },

    #[error("unsupported $project target '{field}'; only duration and created are projectable")]
    UnsupportedProjection { field: String },

    #[error("malformed {stage} stage: {detail}; stage has no effect")]
    MalformedStage {
        stage: &'static str,
        detail: String,
    },
}
