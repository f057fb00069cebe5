//! Match predicate vocabulary
//!
//! A match stage is a conjunction of per-field clauses plus an optional
//! disjunction (`$or`) of single-field clauses. Each clause names exactly
//! one field and one operator.

use serde_json::Value;

/// Supported match operators.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOp {
    /// Field value is a member of the set (value equality).
    In(Vec<Value>),
    /// Field is present (truthy) and differs from the value.
    ///
    /// An absent or null field never satisfies this; the asymmetry is
    /// relied on to express "referrer set and different from X".
    NotEqual(Value),
    /// Chronologically at or after the value (both sides temporal).
    GreaterOrEqual(Value),
    /// Chronologically before the value (both sides temporal).
    LessThan(Value),
    /// Field is present and truthy.
    Exists,
}

impl MatchOp {
    /// Operator name in the wire vocabulary.
    pub fn op_name(&self) -> &'static str {
        match self {
            MatchOp::In(_) => "$in",
            MatchOp::NotEqual(_) => "$ne",
            MatchOp::GreaterOrEqual(_) => "$gte",
            MatchOp::LessThan(_) => "$lt",
            MatchOp::Exists => "$exists",
        }
    }
}

/// A single predicate clause: one field, one operator.
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    /// Field name
    pub field: String,
    /// Match operator
    pub op: MatchOp,
}

impl Clause {
    /// Membership clause
    pub fn is_in(field: impl Into<String>, set: Vec<Value>) -> Self {
        Self {
            field: field.into(),
            op: MatchOp::In(set),
        }
    }

    /// Inequality clause
    pub fn ne(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: MatchOp::NotEqual(value),
        }
    }

    /// Temporal lower-bound clause
    pub fn gte(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: MatchOp::GreaterOrEqual(value),
        }
    }

    /// Temporal upper-bound clause
    pub fn lt(field: impl Into<String>, value: Value) -> Self {
        Self {
            field: field.into(),
            op: MatchOp::LessThan(value),
        }
    }

    /// Presence clause
    pub fn exists(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op: MatchOp::Exists,
        }
    }
}

/// Match stage specification.
///
/// The effective predicate is the conjunction of all `clauses` AND the
/// disjunction of `any_of` (when non-empty).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchSpec {
    /// Per-field clauses, all of which must hold
    pub clauses: Vec<Clause>,
    /// `$or` block: at least one of these must hold, if any are given
    pub any_of: Vec<Clause>,
}

impl MatchSpec {
    /// Creates an empty match spec (matches everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a conjunction clause.
    pub fn with_clause(mut self, clause: Clause) -> Self {
        self.clauses.push(clause);
        self
    }

    /// Adds a clause to the `$or` disjunction.
    pub fn with_any_of(mut self, clause: Clause) -> Self {
        self.any_of.push(clause);
        self
    }

    /// Returns true if the spec has no clauses at all.
    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty() && self.any_of.is_empty()
    }
}
