//! Project stage vocabulary
//!
//! Projection derives the `duration` field on each working record. The
//! backing store is never touched; only the pipeline's working copy changes.

/// Sentinel written over short sessions by the conditional floor rule.
///
/// Sessions shorter than the configured upper bound are flattened to this
/// fixed value, marking them as bounced rather than keeping the raw span.
pub const BOUNCE_DURATION_MS: i64 = 7500;

/// Supported projection operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectOp {
    /// `target = minuend − subtrahend` in milliseconds (both temporal).
    Subtract {
        /// Field holding the later timestamp
        minuend: String,
        /// Field holding the earlier timestamp
        subtrahend: String,
    },
    /// If `target < upper`, overwrite `target` with [`BOUNCE_DURATION_MS`].
    ///
    /// Bounds come as a positional `[lower, upper]` pair; only the upper
    /// bound is consulted. A domain-specific floor rule, not a clamp.
    ConditionalFloor {
        /// Unused lower bound, kept for wire fidelity
        lower: i64,
        /// Threshold below which the sentinel applies
        upper: i64,
    },
    /// Identity passthrough (`field: 1` in the wire form).
    Keep,
}

/// One projected field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectField {
    /// Target field name
    pub field: String,
    /// Operation applied to it
    pub op: ProjectOp,
}

/// Project stage specification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectSpec {
    /// Projected fields, applied in order
    pub fields: Vec<ProjectField>,
}

impl ProjectSpec {
    /// Creates an empty project spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives `field` as the difference of two timestamp fields.
    pub fn subtract(
        mut self,
        field: impl Into<String>,
        minuend: impl Into<String>,
        subtrahend: impl Into<String>,
    ) -> Self {
        self.fields.push(ProjectField {
            field: field.into(),
            op: ProjectOp::Subtract {
                minuend: minuend.into(),
                subtrahend: subtrahend.into(),
            },
        });
        self
    }

    /// Applies the bounce floor to `field` with the given bounds.
    pub fn conditional_floor(mut self, field: impl Into<String>, lower: i64, upper: i64) -> Self {
        self.fields.push(ProjectField {
            field: field.into(),
            op: ProjectOp::ConditionalFloor { lower, upper },
        });
        self
    }

    /// Passes `field` through unchanged.
    pub fn keep(mut self, field: impl Into<String>) -> Self {
        self.fields.push(ProjectField {
            field: field.into(),
            op: ProjectOp::Keep,
        });
        self
    }
}
