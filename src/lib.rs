//! Bench Viz
//!
//! Post-processing of graph-database benchmark output: cache hit rate
//! charts, TTG vs traversal timing charts, and walker traversal graph
//! drawings.
//!
//! This crate provides the core implementation for the
//! `bench-viz` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! bench-viz hit-rate cache_stats.json --summary
//! bench-viz timer --before old/timer.json --after new/timer.json
//! bench-viz ttg walkers.json --layout dot --output-dir plots
//! bench-viz --help
//! ```

pub mod aggregator;
pub mod chart;
pub mod commands;
pub mod graph;
pub mod output;
pub mod parser;
pub mod utils;
