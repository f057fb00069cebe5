//! Project stage evaluation
//!
//! Derives the `duration` field on each working record. Records whose
//! timestamps cannot be interpreted get a null duration; the group stage's
//! average then ignores them.

use serde_json::{Number, Value};

use crate::pipeline::{ProjectOp, ProjectSpec, BOUNCE_DURATION_MS};
use crate::record::Record;

/// Evaluates project stages
pub struct Projector;

impl Projector {
    /// Applies every projected field, in spec order, to every record.
    pub fn apply(records: &mut [Record], spec: &ProjectSpec) {
        for projected in &spec.fields {
            for record in records.iter_mut() {
                Self::apply_op(record, &projected.field, &projected.op);
            }
        }
    }

    fn apply_op(record: &mut Record, field: &str, op: &ProjectOp) {
        match op {
            ProjectOp::Subtract {
                minuend,
                subtrahend,
            } => {
                let value = match (record.timestamp(minuend), record.timestamp(subtrahend)) {
                    (Some(later), Some(earlier)) => {
                        Value::Number(Number::from((later - earlier).num_milliseconds()))
                    }
                    _ => Value::Null,
                };
                record.set(field, value);
            }
            ProjectOp::ConditionalFloor { upper, .. } => {
                // Only the upper bound participates; sessions under it are
                // flattened to the bounce sentinel.
                if let Some(duration) = record.number(field) {
                    if duration < *upper as f64 {
                        record.set(field, Value::Number(Number::from(BOUNCE_DURATION_MS)));
                    }
                }
            }
            ProjectOp::Keep => {}
        }
    }
}
