//! Timing table for TTG generation versus walker traversal.
//!
//! Each timer record carries phase start/end timestamps and visited-node
//! counts. Durations are derived per record, then averaged per edge count.

use super::table::{group_by, Aggregation};
use crate::parser::load_records;
use crate::parser::schema::{KeyValue, Record};
use crate::utils::config::{
    TIMING_GROUP_FIELDS, TOTAL_TIME_FIELD, TRAVERSAL_END_FIELD, TRAVERSAL_START_FIELD,
    TRAVERSAL_TIME_FIELD, TRAVERSAL_VISITED_FIELD, TTG_END_FIELD, TTG_START_FIELD,
    TTG_TIME_FIELD, TTG_VISITED_FIELD,
};
use crate::utils::error::{AggregateError, SchemaError};
use log::info;
use std::path::Path;

/// Averages for one edge count
#[derive(Debug, Clone, PartialEq)]
pub struct TimingRow {
    pub edge_count: KeyValue,
    pub avg_ttg_time: f64,
    pub avg_traversal_time: f64,
    pub avg_ttg_visited: f64,
    pub avg_traversal_visited: f64,

    /// Number of runs averaged into this row
    pub runs: usize,
}

/// Append `ttg_time`, `traversal_time` and `total_time` to every record
pub fn add_durations(records: &mut [Record]) -> Result<(), SchemaError> {
    for record in records.iter_mut() {
        let ttg_start = record.number(TTG_START_FIELD)?;
        let ttg_end = record.number(TTG_END_FIELD)?;
        let traversal_start = record.number(TRAVERSAL_START_FIELD)?;
        let traversal_end = record.number(TRAVERSAL_END_FIELD)?;

        record.set_number(TTG_TIME_FIELD, ttg_end - ttg_start);
        record.set_number(TRAVERSAL_TIME_FIELD, traversal_end - traversal_start);
        record.set_number(TOTAL_TIME_FIELD, traversal_end - ttg_start);
    }

    Ok(())
}

/// Load a timer file and derive the duration columns
pub fn load_timer_records(path: impl AsRef<Path>) -> Result<Vec<Record>, AggregateError> {
    let path = path.as_ref();
    info!("Loading timer records from: {}", path.display());

    let mut records = load_records(path)?;
    add_durations(&mut records)?;

    Ok(records)
}

/// Average TTG/traversal time and visited counts per edge count
///
/// **Public** - main entry point for the timing table
///
/// # Returns
/// One row per distinct `JAC_EDGE_NUM`, ascending
pub fn compute_avg_times(records: &[Record]) -> Result<Vec<TimingRow>, SchemaError> {
    let groups = group_by(
        records,
        TIMING_GROUP_FIELDS,
        &[
            Aggregation::Mean(TTG_TIME_FIELD),
            Aggregation::Mean(TRAVERSAL_TIME_FIELD),
            Aggregation::Mean(TTG_VISITED_FIELD),
            Aggregation::Mean(TRAVERSAL_VISITED_FIELD),
        ],
    )?;

    groups
        .into_iter()
        .map(|group| {
            let [edge_count]: [KeyValue; 1] =
                group.key.try_into().map_err(|key: Vec<KeyValue>| SchemaError::InvalidKey {
                    got: key.len(),
                    max: TIMING_GROUP_FIELDS.len(),
                })?;
            Ok(TimingRow {
                edge_count,
                avg_ttg_time: group.values[0],
                avg_traversal_time: group.values[1],
                avg_ttg_visited: group.values[2],
                avg_traversal_visited: group.values[3],
                runs: group.count,
            })
        })
        .collect()
}
