//! Group stage evaluation
//!
//! Partitions records by their key tuple in first-seen order and computes
//! accumulated columns. Accumulation is integrated into the scan: one pass
//! over the filtered records produces both the partitions and their sums.

use std::collections::HashMap;

use chrono::Datelike;
use serde_json::{Map, Number, Value};

use crate::pipeline::{AccumulatorKind, GroupKey, GroupSpec};
use crate::record::Record;

/// Running state for one partition.
struct PartitionState {
    /// `_id` object: key component name → value
    id: Map<String, Value>,
    /// Record cardinality
    count: u64,
    /// Sum of numeric durations seen
    duration_sum: f64,
    /// How many records contributed a numeric duration
    duration_samples: u64,
}

/// Evaluates group stages
pub struct GroupAggregator;

impl GroupAggregator {
    /// Partitions the records and returns one row per partition, in
    /// first-seen order. Each row carries `_id` plus one column per
    /// accumulator.
    pub fn apply(records: &[Record], spec: &GroupSpec) -> Vec<Record> {
        let mut partitions: Vec<PartitionState> = Vec::new();
        let mut by_key: HashMap<String, usize> = HashMap::new();

        for record in records {
            let key_values: Vec<Value> = spec
                .keys
                .iter()
                .map(|key| Self::key_value(record, key))
                .collect();
            // Canonical form of the key tuple; value equality, not identity.
            let canonical = Value::Array(key_values.clone()).to_string();

            let index = *by_key.entry(canonical).or_insert_with(|| {
                let mut id = Map::new();
                for (key, value) in spec.keys.iter().zip(key_values) {
                    id.insert(key.output_name().to_string(), value);
                }
                partitions.push(PartitionState {
                    id,
                    count: 0,
                    duration_sum: 0.0,
                    duration_samples: 0,
                });
                partitions.len() - 1
            });

            let partition = &mut partitions[index];
            partition.count += 1;
            if let Some(duration) = record.number("duration") {
                partition.duration_sum += duration;
                partition.duration_samples += 1;
            }
        }

        partitions
            .into_iter()
            .map(|partition| Self::partition_row(partition, spec))
            .collect()
    }

    /// Computes one key component for a record.
    ///
    /// Synthetic keys derive from `created` in UTC calendar terms; records
    /// without a parseable `created` fall into a shared null partition.
    fn key_value(record: &Record, key: &GroupKey) -> Value {
        match key {
            GroupKey::Field(name) => record.get(name).cloned().unwrap_or(Value::Null),
            GroupKey::Day => Self::created_part(record, |ts| ts.day()),
            GroupKey::Month => Self::created_part(record, |ts| ts.month()),
            GroupKey::Year => Self::created_part(record, |ts| ts.year() as u32),
        }
    }

    fn created_part(record: &Record, part: impl Fn(chrono::DateTime<chrono::Utc>) -> u32) -> Value {
        match record.timestamp("created") {
            Some(ts) => Value::Number(Number::from(part(ts))),
            None => Value::Null,
        }
    }

    fn partition_row(partition: PartitionState, spec: &GroupSpec) -> Record {
        let mut row = Record::new();
        row.set("_id", Value::Object(partition.id));
        for accumulator in &spec.accumulators {
            let value = match accumulator.kind {
                AccumulatorKind::Sum => Value::Number(Number::from(partition.count)),
                // Empty sample set yields null, never a division by zero.
                AccumulatorKind::Avg => {
                    if partition.duration_samples == 0 {
                        Value::Null
                    } else {
                        let mean = partition.duration_sum / partition.duration_samples as f64;
                        Number::from_f64(mean).map(Value::Number).unwrap_or(Value::Null)
                    }
                }
            };
            row.set(accumulator.output.clone(), value);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Accumulator;
    use serde_json::json;

    fn record(value: Value) -> Record {
        Record::from_value(value).unwrap()
    }

    fn records(values: Vec<Value>) -> Vec<Record> {
        values.into_iter().map(record).collect()
    }

    #[test]
    fn test_first_seen_partition_order() {
        let input = records(vec![
            json!({"domainId": "b"}),
            json!({"domainId": "a"}),
            json!({"domainId": "b"}),
            json!({"domainId": "c"}),
        ]);
        let spec = GroupSpec::new()
            .with_key("domainId")
            .with_accumulator(Accumulator::sum("count"));

        let rows = GroupAggregator::apply(&input, &spec);
        let ids: Vec<_> = rows
            .iter()
            .map(|r| r.get("_id").unwrap()["domainId"].clone())
            .collect();
        assert_eq!(ids, vec![json!("b"), json!("a"), json!("c")]);
    }

    #[test]
    fn test_sum_is_a_cardinality_count() {
        let input = records(vec![
            json!({"domainId": "a", "duration": 100}),
            json!({"domainId": "a", "duration": 900}),
            json!({"domainId": "b"}),
        ]);
        // Output field named "duration" still counts records, never sums.
        let spec = GroupSpec::new()
            .with_key("domainId")
            .with_accumulator(Accumulator::sum("duration"));

        let rows = GroupAggregator::apply(&input, &spec);
        assert_eq!(rows[0].get("duration"), Some(&json!(2)));
        assert_eq!(rows[1].get("duration"), Some(&json!(1)));
    }

    #[test]
    fn test_avg_of_duration() {
        let input = records(vec![
            json!({"domainId": "a", "duration": 100}),
            json!({"domainId": "a", "duration": 200}),
            json!({"domainId": "a", "duration": 300}),
        ]);
        let spec = GroupSpec::new()
            .with_key("domainId")
            .with_accumulator(Accumulator::avg("average"));

        let rows = GroupAggregator::apply(&input, &spec);
        assert_eq!(rows[0].number("average"), Some(200.0));
    }

    #[test]
    fn test_avg_skips_non_numeric_durations() {
        let input = records(vec![
            json!({"domainId": "a", "duration": 100}),
            json!({"domainId": "a"}),
            json!({"domainId": "a", "duration": "broken"}),
            json!({"domainId": "a", "duration": 300}),
        ]);
        let spec = GroupSpec::new()
            .with_key("domainId")
            .with_accumulator(Accumulator::avg("average"))
            .with_accumulator(Accumulator::sum("count"));

        let rows = GroupAggregator::apply(&input, &spec);
        assert_eq!(rows[0].number("average"), Some(200.0));
        // The count still sees all four records.
        assert_eq!(rows[0].get("count"), Some(&json!(4)));
    }

    #[test]
    fn test_avg_with_no_samples_is_null() {
        let input = records(vec![json!({"domainId": "a"})]);
        let spec = GroupSpec::new()
            .with_key("domainId")
            .with_accumulator(Accumulator::avg("average"));

        let rows = GroupAggregator::apply(&input, &spec);
        assert_eq!(rows[0].get("average"), Some(&Value::Null));
    }

    #[test]
    fn test_composite_key_with_synthetic_parts() {
        // 2024-03-05 and 2024-03-06 (UTC), two domains.
        let march_5 = "2024-03-05T10:00:00Z";
        let march_6 = "2024-03-06T10:00:00Z";
        let input = records(vec![
            json!({"domainId": "a", "created": march_5}),
            json!({"domainId": "a", "created": march_6}),
            json!({"domainId": "a", "created": march_5}),
            json!({"domainId": "b", "created": march_5}),
        ]);
        let spec = GroupSpec::new()
            .with_key("domainId")
            .with_key("day")
            .with_key("month")
            .with_key("year")
            .with_accumulator(Accumulator::sum("count"));

        let rows = GroupAggregator::apply(&input, &spec);
        assert_eq!(rows.len(), 3);

        let first = rows[0].get("_id").unwrap();
        assert_eq!(first["domainId"], json!("a"));
        assert_eq!(first["day"], json!(5));
        assert_eq!(first["month"], json!(3));
        assert_eq!(first["year"], json!(2024));
        assert_eq!(rows[0].get("count"), Some(&json!(2)));
    }

    #[test]
    fn test_missing_key_field_groups_under_null() {
        let input = records(vec![
            json!({"domainId": "a"}),
            json!({}),
            json!({"domainId": null}),
        ]);
        let spec = GroupSpec::new()
            .with_key("domainId")
            .with_accumulator(Accumulator::sum("count"));

        let rows = GroupAggregator::apply(&input, &spec);
        // Absent and explicit null share the null partition.
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].get("_id").unwrap()["domainId"], Value::Null);
        assert_eq!(rows[1].get("count"), Some(&json!(2)));
    }

    #[test]
    fn test_partition_completeness() {
        let input = records(
            (0..20)
                .map(|i| json!({"domainId": format!("d{}", i % 3)}))
                .collect(),
        );
        let spec = GroupSpec::new()
            .with_key("domainId")
            .with_accumulator(Accumulator::sum("count"));

        let rows = GroupAggregator::apply(&input, &spec);
        let total: u64 = rows
            .iter()
            .map(|r| r.get("count").and_then(Value::as_u64).unwrap())
            .sum();
        // Every record lands in exactly one partition.
        assert_eq!(total, 20);
    }
}
