//! Walker graph drawing.
//!
//! Vertices are light-blue discs labelled with their node id; edges are
//! straight arrows. Parallel edges are drawn once.

use super::drawing_error;
use super::layout::{compute_layout, ComputedLayout, Layout};
use crate::graph::WalkerGraph;
use crate::output::{check_extension, prepare_output_path};
use crate::utils::config::GRAPH_CHART_SIZE;
use crate::utils::error::RenderError;
use log::{debug, info};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

const NODE_COLOR: RGBColor = RGBColor(173, 216, 230);

/// Pixel geometry of a walker graph picture
#[derive(Debug, Clone, PartialEq)]
pub struct GraphPlotConfig {
    pub size: (u32, u32),
    pub node_radius: i32,
    pub font_size: f64,
    pub arrow_size: i32,

    /// Blank border kept around the layout, in pixels
    pub margin: i32,

    /// Image title; defaults to `graph_title` of the requested layout
    pub title: Option<String>,
}

impl Default for GraphPlotConfig {
    fn default() -> Self {
        Self {
            size: GRAPH_CHART_SIZE,
            node_radius: 18,
            font_size: 14.0,
            arrow_size: 10,
            margin: 40,
            title: None,
        }
    }
}

impl GraphPlotConfig {
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    pub fn with_node_radius(mut self, radius: i32) -> Self {
        self.node_radius = radius;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

/// `Walker Graph (layout='<name>')`
pub fn graph_title(layout_name: &str) -> String {
    format!("Walker Graph (layout='{}')", layout_name)
}

/// Map a layout coordinate in `[-1, 1]` onto the pixel area, y pointing up
pub fn project(point: (f64, f64), area: (u32, u32), margin: i32) -> (i32, i32) {
    let width = (area.0 as f64 - 2.0 * margin as f64).max(1.0);
    let height = (area.1 as f64 - 2.0 * margin as f64).max(1.0);
    let x = margin as f64 + (point.0 + 1.0) / 2.0 * width;
    let y = margin as f64 + (1.0 - point.1) / 2.0 * height;
    (x.round() as i32, y.round() as i32)
}

/// Edge segment between two vertex discs plus its arrowhead triangle
///
/// Returns `None` when the discs overlap and there is nothing to draw.
pub fn arrow_head(
    from: (i32, i32),
    to: (i32, i32),
    node_radius: i32,
    arrow_size: i32,
) -> Option<((i32, i32), [(i32, i32); 3])> {
    let (dx, dy) = ((to.0 - from.0) as f64, (to.1 - from.1) as f64);
    let len = (dx * dx + dy * dy).sqrt();
    if len <= 2.0 * node_radius as f64 {
        return None;
    }
    let (ux, uy) = (dx / len, dy / len);
    let r = node_radius as f64;
    let a = arrow_size as f64;

    let start = (from.0 as f64 + ux * r, from.1 as f64 + uy * r);
    let tip = (to.0 as f64 - ux * r, to.1 as f64 - uy * r);
    let base = (tip.0 - ux * a, tip.1 - uy * a);
    let (px, py) = (-uy * a / 2.0, ux * a / 2.0);

    let round = |p: (f64, f64)| (p.0.round() as i32, p.1.round() as i32);
    Some((
        round(start),
        [
            round(tip),
            round((base.0 + px, base.1 + py)),
            round((base.0 - px, base.1 - py)),
        ],
    ))
}

/// Draw one walker graph to a PNG file
///
/// **Public** - used by the `ttg` command for every tree
///
/// # Arguments
/// * `graph` - Walker multigraph to draw
/// * `layout` - Requested layout strategy
/// * `output_path` - PNG file to write
/// * `config` - Pixel geometry, defaults when `None`
///
/// # Returns
/// The computed layout, so callers can report a fallback
///
/// # Errors
/// * `RenderError::EmptyData` - graph has no vertices
/// * `RenderError::Drawing` - plotters failed to draw or save
pub fn plot_walker_graph(
    graph: &WalkerGraph,
    layout: Layout,
    output_path: impl AsRef<Path>,
    config: Option<&GraphPlotConfig>,
) -> Result<ComputedLayout, RenderError> {
    let output_path = output_path.as_ref();
    if graph.node_count() == 0 {
        return Err(RenderError::EmptyData("walker graph has no nodes".to_string()));
    }
    let config = config.cloned().unwrap_or_default();

    let computed = compute_layout(graph, layout);

    prepare_output_path(output_path)?;
    check_extension(output_path, "png");

    let root = BitMapBackend::new(output_path, config.size).into_drawing_area();
    root.fill(&WHITE).map_err(drawing_error)?;

    if computed.fell_back() {
        info!(
            "Requested {} layout, drew with {} layout",
            computed.requested, computed.applied
        );
    }
    let title = config
        .title
        .clone()
        .unwrap_or_else(|| graph_title(computed.requested.name()));
    let area = root
        .titled(&title, ("sans-serif", 24.0))
        .map_err(drawing_error)?;
    let dim = area.dim_in_pixel();

    let pixel = |id: i64| {
        computed
            .positions
            .get(&id)
            .map(|&p| project(p, dim, config.margin))
            .unwrap_or((config.margin, config.margin))
    };

    let edges = graph.simplified_edges();
    debug!(
        "Drawing {} vertices, {} distinct edges ({} total)",
        graph.node_count(),
        edges.len(),
        graph.edge_count()
    );

    for (from, to) in edges {
        let (a, b) = (pixel(from), pixel(to));
        if from == to {
            let loop_center = (a.0, a.1 - config.node_radius);
            area.draw(&Circle::new(
                loop_center,
                config.node_radius / 2,
                BLACK.stroke_width(1),
            ))
            .map_err(drawing_error)?;
            continue;
        }
        if let Some((start, head)) = arrow_head(a, b, config.node_radius, config.arrow_size) {
            area.draw(&PathElement::new(vec![start, head[0]], BLACK.stroke_width(1)))
                .map_err(drawing_error)?;
            area.draw(&Polygon::new(head.to_vec(), BLACK.filled()))
                .map_err(drawing_error)?;
        }
    }

    let label_style = ("sans-serif", config.font_size)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));

    for id in graph.node_ids() {
        let center = pixel(id);
        area.draw(&Circle::new(center, config.node_radius, NODE_COLOR.filled()))
            .map_err(drawing_error)?;
        area.draw(&Circle::new(center, config.node_radius, BLACK.stroke_width(1)))
            .map_err(drawing_error)?;
        area.draw(&Text::new(id.to_string(), center, label_style.clone()))
            .map_err(drawing_error)?;
    }

    root.present().map_err(drawing_error)?;

    info!("Saved walker graph to {}", output_path.display());
    Ok(computed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_corners() {
        assert_eq!(project((-1.0, 1.0), (100, 100), 10), (10, 10));
        assert_eq!(project((1.0, -1.0), (100, 100), 10), (90, 90));
        assert_eq!(project((0.0, 0.0), (100, 100), 10), (50, 50));
    }

    #[test]
    fn test_arrow_head_horizontal() {
        let (start, head) = arrow_head((0, 0), (100, 0), 10, 8).unwrap();
        assert_eq!(start, (10, 0));
        assert_eq!(head, [(90, 0), (82, 4), (82, -4)]);
    }

    #[test]
    fn test_arrow_head_overlapping_discs() {
        assert!(arrow_head((0, 0), (15, 0), 10, 8).is_none());
    }

    #[test]
    fn test_empty_graph_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = plot_walker_graph(
            &WalkerGraph::new(),
            Layout::Circular,
            dir.path().join("empty.png"),
            None,
        );
        assert!(matches!(result, Err(RenderError::EmptyData(_))));
    }

    #[test]
    fn test_graph_title_names_layout() {
        assert_eq!(graph_title("dot"), "Walker Graph (layout='dot')");
    }

    fn rendered_len(path: &Path) -> u64 {
        std::fs::metadata(path).map(|m| m.len()).unwrap_or(0)
    }

    #[test]
    fn test_plot_walker_graph_every_layout() {
        let dir = tempfile::tempdir().unwrap();
        let mut graph = WalkerGraph::new();
        graph.add_edge(1, 2);
        graph.add_edge(1, 3);
        graph.add_edge(1, 3);
        graph.add_edge(3, 1);

        for layout in [Layout::Hierarchical, Layout::ForceDirected, Layout::Circular, Layout::Shell] {
            let path = dir.path().join(format!("{}.png", layout));
            let computed = plot_walker_graph(&graph, layout, &path, None).unwrap();

            assert_eq!(computed.applied, layout);
            assert!(rendered_len(&path) > 0, "layout {}", layout);
        }
    }

    #[test]
    fn test_plot_walker_graph_self_loop_and_single_node() {
        let dir = tempfile::tempdir().unwrap();

        let mut looped = WalkerGraph::new();
        looped.add_edge(7, 7);
        looped.add_edge(7, 8);
        let path = dir.path().join("nested").join("loop.png");
        let config = GraphPlotConfig::default()
            .with_size(300, 200)
            .with_title(graph_title("dot"));
        plot_walker_graph(&looped, Layout::Hierarchical, &path, Some(&config)).unwrap();
        assert!(rendered_len(&path) > 0);

        let mut single = WalkerGraph::new();
        single.add_node(1);
        let path = dir.path().join("single.png");
        plot_walker_graph(&single, Layout::ForceDirected, &path, None).unwrap();
        assert!(rendered_len(&path) > 0);
    }

    #[test]
    fn test_config_builders() {
        let config = GraphPlotConfig::default()
            .with_size(400, 300)
            .with_node_radius(5)
            .with_title("t");
        assert_eq!(config.size, (400, 300));
        assert_eq!(config.title.as_deref(), Some("t"));
        assert_eq!(config.node_radius, 5);
        assert_eq!(config.arrow_size, 10);
    }
}
