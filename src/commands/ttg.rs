//! TTG command implementation.
//!
//! The ttg command:
//! 1. Parses the layout name
//! 2. Loads the walker trees
//! 3. Converts every tree to a multigraph
//! 4. Draws one PNG per graph

use super::models::TtgArgs;
use crate::chart::{graph_title, plot_walker_graph, GraphPlotConfig, Layout};
use crate::graph::trees_to_multigraphs;
use crate::parser::load_walker_trees;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;
use std::time::Instant;

/// Execute the ttg command
///
/// **Public** - main entry point called from main.rs
///
/// # Returns
/// Paths of the written images, in tree order
///
/// # Errors
/// * Unknown layout name
/// * Input missing, not a list, or holding a malformed tree
/// * Chart drawing or file write errors
pub fn execute_ttg(args: TtgArgs) -> Result<Vec<PathBuf>> {
    let start_time = Instant::now();

    info!("Step 1/4: Resolving layout '{}'...", args.layout);
    let layout: Layout = args.layout.parse().context("Invalid layout")?;

    info!("Step 2/4: Loading walker trees...");
    let trees = load_walker_trees(&args.input)
        .with_context(|| format!("Failed to load walker trees from {}", args.input.display()))?;

    info!("Step 3/4: Converting {} trees to graphs...", trees.len());
    let graphs = trees_to_multigraphs(&trees);

    info!("Step 4/4: Drawing graphs...");
    let config = GraphPlotConfig::default().with_title(graph_title(&args.layout));
    let mut written = Vec::with_capacity(graphs.len());
    for (index, graph) in graphs.iter().enumerate() {
        let path = args.output_path(index);
        let computed = plot_walker_graph(graph, layout, &path, Some(&config))
            .with_context(|| format!("Failed to draw walker graph {}", index))?;
        debug!("Graph {} drawn with {} layout", index, computed.applied);
        written.push(path);
    }

    info!(
        "✓ {} graphs written to {} in {:.2}s",
        written.len(),
        args.output_dir.display(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(written)
}

/// Validate ttg arguments
///
/// **Public** - can be called before execute_ttg for early validation
pub fn validate_ttg_args(args: &TtgArgs) -> Result<()> {
    if !args.input.exists() {
        anyhow::bail!("Could not find {}", args.input.display());
    }

    args.layout
        .parse::<Layout>()
        .with_context(|| format!("Unsupported layout '{}'", args.layout))?;

    if args.prefix.is_empty() {
        anyhow::bail!("Prefix cannot be empty");
    }

    Ok(())
}
