//! Cache hit rate table.
//!
//! Cache statistics are grouped per (cache size, prefetch flag, edge count)
//! and reduced to summed counters plus the resulting hit rate.

use super::table::{dedup_keep_last, group_by, Aggregation};
use crate::parser::load_records;
use crate::parser::schema::{KeyValue, Record};
use crate::utils::config::{
    CACHE_DEDUP_FIELDS, HIT_FIELD, HIT_RATE_FIELD, HIT_RATE_GROUP_FIELDS, TOTAL_ACCESS_FIELD,
};
use crate::utils::error::{AggregateError, SchemaError};
use log::{debug, info};
use std::path::Path;

/// One row of the aggregated hit rate table
#[derive(Debug, Clone, PartialEq)]
pub struct HitRateRow {
    pub cache_size: KeyValue,
    pub prefetch: KeyValue,
    pub edge_count: KeyValue,

    /// Summed cache hits
    pub hit: f64,

    /// Summed cache accesses
    pub total_acc: f64,

    /// `hit / total_acc`, zero when there were no accesses
    pub hit_rate: f64,
}

impl HitRateRow {
    pub fn prefetch_enabled(&self) -> bool {
        self.prefetch.is_truthy()
    }
}

/// Hit ratio with the zero-denominator policy applied
///
/// A configuration that never touched the cache reports a rate of zero.
pub fn hit_ratio(hits: f64, attempts: f64) -> f64 {
    if attempts == 0.0 {
        0.0
    } else {
        hits / attempts
    }
}

/// De-duplicate configurations and append the per-record `hit_rate` column
///
/// # Errors
/// * `SchemaError` - a configuration or counter field is missing
pub fn prepare_cache_stats(records: Vec<Record>) -> Result<Vec<Record>, SchemaError> {
    let mut records = dedup_keep_last(records, CACHE_DEDUP_FIELDS)?;

    for record in &mut records {
        let rate = hit_ratio(record.number(HIT_FIELD)?, record.number(TOTAL_ACCESS_FIELD)?);
        record.set_number(HIT_RATE_FIELD, rate);
    }

    Ok(records)
}

/// Load a cache statistics file
///
/// **Public** - first step of both hit rate charts
///
/// # Errors
/// * `AggregateError::Load` - file missing or not a JSON list of objects
/// * `AggregateError::Schema` - required fields missing
pub fn load_cache_stats(path: impl AsRef<Path>) -> Result<Vec<Record>, AggregateError> {
    let path = path.as_ref();
    info!("Loading cache statistics from: {}", path.display());

    let records = load_records(path)?;
    let loaded = records.len();
    let records = prepare_cache_stats(records)?;

    debug!("Kept {} of {} cache records after de-duplication", records.len(), loaded);

    Ok(records)
}

/// Aggregate hit rates per edge count for each cache/prefetch setting
///
/// **Public** - main entry point for the hit rate table
///
/// # Returns
/// One row per (cache_size, jac_prefetch, JAC_EDGE_NUM), sorted by edge
/// count; rows with equal edge count stay in key order
pub fn aggregate_hit_rates(records: &[Record]) -> Result<Vec<HitRateRow>, SchemaError> {
    let groups = group_by(
        records,
        HIT_RATE_GROUP_FIELDS,
        &[Aggregation::Sum(HIT_FIELD), Aggregation::Sum(TOTAL_ACCESS_FIELD)],
    )?;

    let mut rows = groups
        .into_iter()
        .map(|group| {
            let [cache_size, prefetch, edge_count]: [KeyValue; 3] =
                group.key.try_into().map_err(|key: Vec<KeyValue>| SchemaError::InvalidKey {
                    got: key.len(),
                    max: HIT_RATE_GROUP_FIELDS.len(),
                })?;
            let (hit, total_acc) = (group.values[0], group.values[1]);
            Ok(HitRateRow {
                cache_size,
                prefetch,
                edge_count,
                hit,
                total_acc,
                hit_rate: hit_ratio(hit, total_acc),
            })
        })
        .collect::<Result<Vec<_>, SchemaError>>()?;

    rows.sort_by(|a, b| a.edge_count.cmp(&b.edge_count));

    Ok(rows)
}
