//! Match stage evaluation
//!
//! Filters records against a predicate, preserving relative order. The
//! effective predicate is the conjunction of all per-field clauses AND the
//! `$or` disjunction when one is present.

use crate::pipeline::{Clause, MatchOp, MatchSpec};
use crate::record::{parse_timestamp, Record};

/// Evaluates match predicates against records
pub struct MatchFilter;

impl MatchFilter {
    /// Keeps the records satisfying the spec, in their original order.
    pub fn apply(records: Vec<Record>, spec: &MatchSpec) -> Vec<Record> {
        records
            .into_iter()
            .filter(|record| Self::matches(record, spec))
            .collect()
    }

    /// Checks a single record against the whole spec.
    pub fn matches(record: &Record, spec: &MatchSpec) -> bool {
        let conjunction = spec
            .clauses
            .iter()
            .all(|clause| Self::clause_matches(record, clause));
        let disjunction = spec.any_of.is_empty()
            || spec
                .any_of
                .iter()
                .any(|clause| Self::clause_matches(record, clause));
        conjunction && disjunction
    }

    /// Checks a single clause.
    fn clause_matches(record: &Record, clause: &Clause) -> bool {
        match &clause.op {
            MatchOp::In(set) => record
                .get(&clause.field)
                .is_some_and(|value| set.contains(value)),
            // Absent, null or otherwise falsy fields never satisfy $ne.
            MatchOp::NotEqual(expected) => {
                record.is_truthy(&clause.field)
                    && record.get(&clause.field) != Some(expected)
            }
            MatchOp::GreaterOrEqual(bound) => {
                match (record.timestamp(&clause.field), parse_timestamp(bound)) {
                    (Some(actual), Some(bound)) => actual >= bound,
                    _ => false,
                }
            }
            MatchOp::LessThan(bound) => {
                match (record.timestamp(&clause.field), parse_timestamp(bound)) {
                    (Some(actual), Some(bound)) => actual < bound,
                    _ => false,
                }
            }
            MatchOp::Exists => record.is_truthy(&clause.field),
        }
    }
}
