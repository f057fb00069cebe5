//! Group stage vocabulary
//!
//! A group stage partitions records by an ordered key tuple and computes
//! accumulated columns per partition. Partition order is first-seen order.

/// One component of a group key.
///
/// `day`, `month` and `year` are synthetic keys recognized in place of a raw
/// field name; each is derived from the record's `created` timestamp (UTC
/// calendar terms).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupKey {
    /// Raw record field, matched by value equality
    Field(String),
    /// Day of month (1-31) of `created`
    Day,
    /// Month (1-12) of `created`
    Month,
    /// Four-digit year of `created`
    Year,
}

impl GroupKey {
    /// Recognizes the synthetic key names, falling back to a raw field.
    pub fn from_name(name: &str) -> Self {
        match name {
            "day" => GroupKey::Day,
            "month" => GroupKey::Month,
            "year" => GroupKey::Year,
            other => GroupKey::Field(other.to_string()),
        }
    }

    /// Name of this key component inside the `_id` output object.
    pub fn output_name(&self) -> &str {
        match self {
            GroupKey::Field(name) => name,
            GroupKey::Day => "day",
            GroupKey::Month => "month",
            GroupKey::Year => "year",
        }
    }
}

/// Accumulator kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccumulatorKind {
    /// Cardinality count: +1 per record in the partition.
    ///
    /// Strictly a count regardless of the output field name, never a sum of
    /// a field. Legacy behavior, preserved exactly.
    Sum,
    /// Arithmetic mean of the `duration` field over the partition.
    Avg,
}

impl AccumulatorKind {
    /// Operator name in the wire vocabulary.
    pub fn op_name(&self) -> &'static str {
        match self {
            AccumulatorKind::Sum => "$sum",
            AccumulatorKind::Avg => "$avg",
        }
    }
}

/// A named accumulated output column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accumulator {
    /// Output field name on the partition row
    pub output: String,
    /// Accumulator kind
    pub kind: AccumulatorKind,
}

impl Accumulator {
    /// Count accumulator
    pub fn sum(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            kind: AccumulatorKind::Sum,
        }
    }

    /// Duration-mean accumulator
    pub fn avg(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            kind: AccumulatorKind::Avg,
        }
    }
}

/// Group stage specification.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupSpec {
    /// Ordered key components forming the partition `_id`
    pub keys: Vec<GroupKey>,
    /// Accumulated output columns
    pub accumulators: Vec<Accumulator>,
}

impl GroupSpec {
    /// Creates an empty group spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a key component by name (synthetic names recognized).
    pub fn with_key(mut self, name: &str) -> Self {
        self.keys.push(GroupKey::from_name(name));
        self
    }

    /// Adds an accumulator.
    pub fn with_accumulator(mut self, accumulator: Accumulator) -> Self {
        self.accumulators.push(accumulator);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_key_names() {
        assert_eq!(GroupKey::from_name("day"), GroupKey::Day);
        assert_eq!(GroupKey::from_name("month"), GroupKey::Month);
        assert_eq!(GroupKey::from_name("year"), GroupKey::Year);
        assert_eq!(
            GroupKey::from_name("domainId"),
            GroupKey::Field("domainId".to_string())
        );
    }

    #[test]
    fn test_output_names() {
        assert_eq!(GroupKey::Day.output_name(), "day");
        assert_eq!(GroupKey::Field("source".into()).output_name(), "source");
    }

    #[test]
    fn test_spec_builder() {
        let spec = GroupSpec::new()
            .with_key("domainId")
            .with_key("day")
            .with_accumulator(Accumulator::sum("count"))
            .with_accumulator(Accumulator::avg("average"));

        assert_eq!(spec.keys.len(), 2);
        assert_eq!(spec.accumulators[0].kind, AccumulatorKind::Sum);
        assert_eq!(spec.accumulators[1].output, "average");
    }
}
