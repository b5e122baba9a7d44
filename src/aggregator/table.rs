//! Group-by / reduce over flat benchmark records.
//!
//! This is the small tabular engine the hit rate and timing tables are
//! built on: de-duplicate by configuration key, partition by a key tuple,
//! reduce each partition with sums and means.

use crate::parser::schema::{KeyValue, Record};
use crate::utils::config::MAX_GROUP_KEY_FIELDS;
use crate::utils::error::SchemaError;
use log::debug;
use std::collections::{BTreeMap, HashMap};

/// Reduction applied to one field of every record in a group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregation<'a> {
    Sum(&'a str),
    Mean(&'a str),
}

impl Aggregation<'_> {
    pub fn field(&self) -> &str {
        match self {
            Aggregation::Sum(field) | Aggregation::Mean(field) => field,
        }
    }
}

/// One output row of `group_by`
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Key tuple, in the order of the requested key fields
    pub key: Vec<KeyValue>,

    /// One reduced value per requested aggregation, in request order
    pub values: Vec<f64>,

    /// Number of records in the group
    pub count: usize,
}

/// Keep only the last record of every configuration key
///
/// **Public** - used for cache statistics where a configuration may have
/// been re-run
///
/// Surviving records keep their relative input order.
///
/// # Errors
/// * `SchemaError` - a key field is absent or not scalar in some record
pub fn dedup_keep_last(records: Vec<Record>, key_fields: &[&str]) -> Result<Vec<Record>, SchemaError> {
    let keys = records
        .iter()
        .map(|record| record.key(key_fields))
        .collect::<Result<Vec<_>, _>>()?;

    let mut last_seen: HashMap<&[KeyValue], usize> = HashMap::new();
    for (position, key) in keys.iter().enumerate() {
        last_seen.insert(key.as_slice(), position);
    }

    let total = records.len();
    let kept: Vec<Record> = records
        .into_iter()
        .enumerate()
        .filter(|(position, _)| last_seen.get(keys[*position].as_slice()) == Some(position))
        .map(|(_, record)| record)
        .collect();

    debug!("De-duplicated {} records down to {}", total, kept.len());

    Ok(kept)
}

/// Partition records by a key tuple and reduce every partition
///
/// **Public** - main entry point for aggregation
///
/// # Arguments
/// * `records` - Input rows
/// * `key_fields` - Between 1 and 5 field names forming the group key
/// * `aggregations` - Reductions to compute per group
///
/// # Returns
/// One `Group` per distinct key, in ascending key order
///
/// # Errors
/// * `SchemaError::InvalidKey` - key tuple is empty or too long
/// * `SchemaError::MissingField` / `NotNumeric` / `NotScalar` - a record
///   lacks a key or aggregated field
pub fn group_by(
    records: &[Record],
    key_fields: &[&str],
    aggregations: &[Aggregation<'_>],
) -> Result<Vec<Group>, SchemaError> {
    if key_fields.is_empty() || key_fields.len() > MAX_GROUP_KEY_FIELDS {
        return Err(SchemaError::InvalidKey {
            got: key_fields.len(),
            max: MAX_GROUP_KEY_FIELDS,
        });
    }

    let mut partitions: BTreeMap<Vec<KeyValue>, (Vec<f64>, usize)> = BTreeMap::new();

    for record in records {
        let key = record.key(key_fields)?;
        let values = aggregations
            .iter()
            .map(|agg| record.number(agg.field()))
            .collect::<Result<Vec<_>, _>>()?;

        let (sums, count) = partitions
            .entry(key)
            .or_insert_with(|| (vec![0.0; aggregations.len()], 0));
        for (sum, value) in sums.iter_mut().zip(values) {
            *sum += value;
        }
        *count += 1;
    }

    let groups: Vec<Group> = partitions
        .into_iter()
        .map(|(key, (sums, count))| {
            let values = sums
                .into_iter()
                .zip(aggregations)
                .map(|(sum, agg)| match agg {
                    Aggregation::Sum(_) => sum,
                    Aggregation::Mean(_) => sum / count as f64,
                })
                .collect();
            Group { key, values, count }
        })
        .collect();

    debug!(
        "Grouped {} records by {:?} into {} groups",
        records.len(),
        key_fields,
        groups.len()
    );

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_records;
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<Record> {
        match value {
            serde_json::Value::Array(items) => parse_records(items).unwrap(),
            _ => panic!("expected a list"),
        }
    }

    #[test]
    fn test_dedup_keeps_last_in_input_order() {
        let input = records(json!([
            {"k": 1, "v": 10},
            {"k": 2, "v": 20},
            {"k": 1, "v": 11},
            {"k": 3, "v": 30},
        ]));

        let kept = dedup_keep_last(input, &["k"]).unwrap();
        let values: Vec<f64> = kept.iter().map(|r| r.number("v").unwrap()).collect();

        assert_eq!(values, vec![20.0, 11.0, 30.0]);
    }

    #[test]
    fn test_dedup_missing_key_field() {
        let input = records(json!([{"k": 1}, {"v": 2}]));
        let err = dedup_keep_last(input, &["k"]).unwrap_err();
        assert_eq!(err, SchemaError::MissingField { record: 1, field: "k".to_string() });
    }

    #[test]
    fn test_group_by_sum_and_mean() {
        let input = records(json!([
            {"a": 2, "x": 1.0},
            {"a": 1, "x": 4.0},
            {"a": 2, "x": 3.0},
        ]));

        let groups = group_by(&input, &["a"], &[Aggregation::Sum("x"), Aggregation::Mean("x")]).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].key, vec![KeyValue::Int(1)]);
        assert_eq!(groups[0].values, vec![4.0, 4.0]);
        assert_eq!(groups[1].key, vec![KeyValue::Int(2)]);
        assert_eq!(groups[1].values, vec![4.0, 2.0]);
        assert_eq!(groups[1].count, 2);
    }

    #[test]
    fn test_group_by_rejects_empty_key() {
        let input = records(json!([{"a": 1}]));
        assert!(matches!(
            group_by(&input, &[], &[]),
            Err(SchemaError::InvalidKey { got: 0, .. })
        ));
    }

    #[test]
    fn test_group_by_rejects_long_key() {
        let input = records(json!([{"a": 1}]));
        let key = ["a", "b", "c", "d", "e", "f"];
        assert!(matches!(
            group_by(&input, &key, &[]),
            Err(SchemaError::InvalidKey { got: 6, .. })
        ));
    }

    #[test]
    fn test_group_by_missing_aggregated_field() {
        let input = records(json!([{"a": 1, "x": 1}, {"a": 1}]));
        let err = group_by(&input, &["a"], &[Aggregation::Sum("x")]).unwrap_err();
        assert_eq!(err, SchemaError::MissingField { record: 1, field: "x".to_string() });
    }

    #[test]
    fn test_group_by_empty_input() {
        let groups = group_by(&[], &["a"], &[Aggregation::Mean("x")]).unwrap();
        assert!(groups.is_empty());
    }
}
