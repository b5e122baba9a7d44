//! Output writers.
//!
//! This module handles writing data to disk and to the terminal:
//! - Output path validation for charts
//! - Atomic append to JSON list files
//! - Text summaries of aggregated tables

pub mod json;
pub mod path;
pub mod table;

// Re-export main functions
pub use json::append_to_json_list;
pub use path::{check_extension, prepare_output_path, validate_path};
pub use table::{format_hit_rate_table, format_timing_table};
