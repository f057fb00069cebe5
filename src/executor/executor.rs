//! Pipeline executor
//!
//! Threads a snapshot through the pipeline's stages in order:
//!
//! 1. Validate the pipeline shape (fatal errors reject it before any work)
//! 2. Fold the working set through each stage left to right
//! 3. Stop immediately when a `$count` stage fires
//!
//! Execution is deterministic: same snapshot + same pipeline = same rows.

use std::collections::HashMap;

use crate::pipeline::{AccumulatorKind, GroupSpec, Pipeline, Stage};
use crate::record::Record;

use super::errors::{PipelineError, PipelineResult};
use super::grouper::GroupAggregator;
use super::matcher::MatchFilter;
use super::projector::Projector;
use super::result::{count_row, AggregationResult};
use super::sorter::ResultSorter;

/// Executes pipelines over in-memory snapshots
pub struct PipelineExecutor;

impl PipelineExecutor {
    /// Runs the pipeline over the snapshot.
    ///
    /// The snapshot is consumed; stages work on this owned copy and the
    /// backing store is never touched.
    pub fn execute(snapshot: Vec<Record>, pipeline: &Pipeline) -> PipelineResult<AggregationResult> {
        Self::validate(pipeline)?;

        let scanned_count = snapshot.len();
        let mut rows = snapshot;

        for stage in pipeline.stages() {
            match stage {
                Stage::Match(spec) => rows = MatchFilter::apply(rows, spec),
                Stage::Group(spec) => rows = GroupAggregator::apply(&rows, spec),
                Stage::Project(spec) => Projector::apply(&mut rows, spec),
                Stage::Sort(spec) => ResultSorter::sort(&mut rows, spec),
                Stage::Limit(n) => {
                    if rows.len() > *n {
                        rows.truncate(*n);
                    }
                }
                // $count replaces the result and short-circuits; trailing
                // stages never run.
                Stage::Count => {
                    rows = vec![count_row(rows.len())];
                    break;
                }
            }
        }

        Ok(AggregationResult {
            rows,
            diagnostics: Vec::new(),
            scanned_count,
        })
    }

    /// Structural validation, run before any stage executes.
    ///
    /// Stages after the first `$count` are unreachable and deliberately not
    /// validated.
    fn validate(pipeline: &Pipeline) -> PipelineResult<()> {
        let mut group_seen = false;
        let mut finalizer: Option<&'static str> = None;

        for stage in pipeline.stages() {
            match stage {
                Stage::Group(spec) => {
                    if group_seen {
                        return Err(PipelineError::MultipleGroupStages);
                    }
                    if let Some(name) = finalizer {
                        return Err(PipelineError::GroupAfterFinalizer(name));
                    }
                    if spec.keys.is_empty() {
                        return Err(PipelineError::EmptyGroupKey);
                    }
                    Self::validate_accumulators(spec)?;
                    group_seen = true;
                }
                Stage::Sort(_) | Stage::Limit(_) => {
                    finalizer.get_or_insert(stage.name());
                }
                Stage::Count => break,
                Stage::Match(_) | Stage::Project(_) => {}
            }
        }
        Ok(())
    }

    /// One accumulator kind per output field.
    fn validate_accumulators(spec: &GroupSpec) -> PipelineResult<()> {
        let mut kinds: HashMap<&str, AccumulatorKind> = HashMap::new();
        for accumulator in &spec.accumulators {
            match kinds.insert(&accumulator.output, accumulator.kind) {
                Some(previous) if previous != accumulator.kind => {
                    return Err(PipelineError::ConflictingAccumulators(
                        accumulator.output.clone(),
                    ));
                }
                _ => {}
            }
        }
        Ok(())
    }
}
