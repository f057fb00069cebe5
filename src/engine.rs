//! Caller-facing aggregation engine
//!
//! Ties a snapshot source to the pipeline executor: one call loads one
//! snapshot, folds it through the pipeline, and returns rows plus
//! diagnostics. Calls are synchronous and share no mutable state, so
//! concurrent invocations only need the snapshot source to be safe for
//! concurrent reads. Callers wanting bounded latency wrap the whole call in
//! their own deadline; nothing suspends mid-stage.

use serde_json::Value;
use thiserror::Error;

use crate::executor::{AggregationResult, PipelineError, PipelineExecutor};
use crate::observability::Logger;
use crate::pipeline::{parse_pipeline, Pipeline};
use crate::snapshot::{SnapshotError, SnapshotSource};

/// Result type for engine calls
pub type EngineResult<T> = Result<T, EngineError>;

/// Fatal engine errors
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    #[error("invalid pipeline: {0}")]
    Pipeline(#[from] PipelineError),
}

/// Aggregation engine over a snapshot source.
pub struct AggregationEngine<S: SnapshotSource> {
    source: S,
}

impl<S: SnapshotSource> AggregationEngine<S> {
    /// Creates an engine over the given source.
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Runs a typed pipeline against a collection.
    ///
    /// Recoverable diagnostics are logged at WARN and returned on the
    /// result; structural problems reject the pipeline with no partial work.
    pub fn aggregate(&self, collection: &str, pipeline: &Pipeline) -> EngineResult<AggregationResult> {
        let snapshot = self.source.load_all(collection)?;
        let result = PipelineExecutor::execute(snapshot, pipeline)?;
        Self::log_diagnostics(collection, &result);
        Ok(result)
    }

    /// Runs a Mongo-style JSON pipeline against a collection.
    ///
    /// Parse-time diagnostics (unsupported operators, malformed stages) are
    /// merged into the result; the understood part of the pipeline still
    /// runs.
    pub fn aggregate_json(&self, collection: &str, pipeline: &Value) -> EngineResult<AggregationResult> {
        let (parsed, diagnostics) = parse_pipeline(pipeline);
        let snapshot = self.source.load_all(collection)?;
        let mut result = PipelineExecutor::execute(snapshot, &parsed)?;
        result.diagnostics.splice(0..0, diagnostics);
        Self::log_diagnostics(collection, &result);
        Ok(result)
    }

    fn log_diagnostics(collection: &str, result: &AggregationResult) {
        for diagnostic in &result.diagnostics {
            Logger::warn(
                "pipeline_diagnostic",
                &[
                    ("collection", collection),
                    ("detail", &diagnostic.to_string()),
                ],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::Diagnostic;
    use crate::record::Record;
    use crate::snapshot::MemorySnapshot;
    use serde_json::json;

    fn engine_with_records(values: Vec<serde_json::Value>) -> AggregationEngine<MemorySnapshot> {
        let records = values
            .into_iter()
            .map(|v| Record::from_value(v).unwrap())
            .collect();
        AggregationEngine::new(MemorySnapshot::new().with_collection("records", records))
    }

    #[test]
    fn test_aggregate_json_end_to_end() {
        let engine = engine_with_records(vec![
            json!({"domainId": "a"}),
            json!({"domainId": "a"}),
            json!({"domainId": "b"}),
            json!({"domainId": "a"}),
            json!({"domainId": "b"}),
        ]);

        let result = engine
            .aggregate_json(
                "records",
                &json!([
                    {"$match": {"domainId": {"$in": ["a", "b"]}}},
                    {"$group": {"_id": {"domainId": "$domainId"}, "count": {"$sum": 1}}}
                ]),
            )
            .unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result.rows[0].get("_id").unwrap()["domainId"], json!("a"));
        assert_eq!(result.rows[0].get("count"), Some(&json!(3)));
        assert_eq!(result.rows[1].get("count"), Some(&json!(2)));
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn test_parse_diagnostics_surface_on_result() {
        let engine = engine_with_records(vec![json!({"domainId": "a"})]);

        let result = engine
            .aggregate_json(
                "records",
                &json!([
                    {"$match": {"domainId": {"$regex": "^a"}}},
                    {"$count": "count"}
                ]),
            )
            .unwrap();

        // The unsupported clause is a no-op: the record survives the match.
        assert_eq!(result.count(), Some(1));
        assert_eq!(
            result.diagnostics,
            vec![Diagnostic::UnsupportedOperator {
                stage: "$match",
                field: "domainId".into(),
                operator: "$regex".into(),
            }]
        );
    }

    #[test]
    fn test_unknown_collection_is_fatal() {
        let engine = AggregationEngine::new(MemorySnapshot::new());
        let err = engine
            .aggregate("events", &Pipeline::new())
            .unwrap_err();
        assert!(matches!(err, EngineError::Snapshot(_)));
    }

    #[test]
    fn test_invalid_shape_is_fatal() {
        let engine = engine_with_records(vec![json!({"domainId": "a"})]);
        let err = engine
            .aggregate_json("records", &json!([{"$group": {"_id": {}}}]))
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::Pipeline(PipelineError::EmptyGroupKey)
        ));
    }
}
