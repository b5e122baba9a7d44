//! Plain-text rendering of aggregated tables for `--summary`.

use crate::aggregator::{HitRateRow, TimingRow};

/// Render the hit rate table as fixed-width text
pub fn format_hit_rate_table(rows: &[HitRateRow]) -> String {
    let mut out = format!(
        "{:>12} {:>10} {:>12} {:>12} {:>12} {:>9}\n",
        "cache_size", "prefetch", "edges", "hit", "total_acc", "hit_rate"
    );
    out.push_str(&"-".repeat(72));
    out.push('\n');

    for row in rows {
        out.push_str(&format!(
            "{:>12} {:>10} {:>12} {:>12.0} {:>12.0} {:>8.2}%\n",
            row.cache_size.to_string(),
            row.prefetch.to_string(),
            row.edge_count.to_string(),
            row.hit,
            row.total_acc,
            row.hit_rate * 100.0
        ));
    }

    out
}

/// Render the timing table as fixed-width text
pub fn format_timing_table(rows: &[TimingRow]) -> String {
    let mut out = format!(
        "{:>12} {:>6} {:>14} {:>14} {:>12} {:>12}\n",
        "edges", "runs", "ttg_time", "traversal", "ttg_nodes", "walk_nodes"
    );
    out.push_str(&"-".repeat(75));
    out.push('\n');

    for row in rows {
        out.push_str(&format!(
            "{:>12} {:>6} {:>14.6} {:>14.6} {:>12.1} {:>12.1}\n",
            row.edge_count.to_string(),
            row.runs,
            row.avg_ttg_time,
            row.avg_traversal_time,
            row.avg_ttg_visited,
            row.avg_traversal_visited
        ));
    }

    out
}
