//! Input parsing and schema definitions.
//!
//! This module handles:
//! - Loading JSON lists of benchmark records
//! - Deserializing walker traversal trees
//! - Typed access to record fields for aggregation

pub mod loader;
pub mod schema;

// Re-export main types
pub use loader::{
    load_records, load_walker_trees, parse_records, parse_walker_trees, read_json_list,
};
pub use schema::{KeyValue, Record, WalkerNode, WalkerTreeNode};
