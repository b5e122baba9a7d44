//! Walker traversal graphs.

pub mod walker;

pub use walker::{trees_to_multigraphs, tree_to_multigraph, walkers_to_multigraphs, WalkerGraph};
