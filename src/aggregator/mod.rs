//! Aggregation of benchmark records into summary tables.
//!
//! This module transforms flat benchmark records into:
//! - Cache hit rate rows per (cache size, prefetch, edge count)
//! - Average TTG/traversal timings per edge count

pub mod hit_rate;
pub mod table;
pub mod timing;

// Re-export main types and functions
pub use hit_rate::{aggregate_hit_rates, hit_ratio, load_cache_stats, prepare_cache_stats, HitRateRow};
pub use table::{dedup_keep_last, group_by, Aggregation, Group};
pub use timing::{add_durations, compute_avg_times, load_timer_records, TimingRow};
