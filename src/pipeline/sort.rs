//! Sort stage vocabulary
//!
//! A sort stage can name several fields. Each named field triggers a full
//! re-sort of the working set, so only the last field determines the final
//! order. This mirrors the source system exactly; see the executor's sorter
//! for the caveat.

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Wire encoding: `1` ascending, `-1` descending.
    pub fn from_signum(n: i64) -> Option<Self> {
        match n {
            1 => Some(SortDirection::Asc),
            -1 => Some(SortDirection::Desc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Sort stage specification: ordered (field, direction) pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    /// Fields in wire order; each one re-sorts the whole working set
    pub fields: Vec<(String, SortDirection)>,
}

impl SortSpec {
    /// Creates an empty sort spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Single-field ascending sort.
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new().with(field, SortDirection::Asc)
    }

    /// Single-field descending sort.
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new().with(field, SortDirection::Desc)
    }

    /// Appends a field to the spec.
    pub fn with(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.fields.push((field.into(), direction));
        self
    }
}
