//! Graph layout strategies for walker graph rendering.
//!
//! All layouts place vertices inside `[-1, 1] x [-1, 1]`. The hierarchical
//! layout ignores depth-first back edges, so walkers that revisit a node
//! still get a layered drawing. If layering fails anyway a force-directed
//! layout is used instead.

use crate::graph::WalkerGraph;
use crate::utils::config::FORCE_LAYOUT_ITERATIONS;
use crate::utils::error::RenderError;
use log::{debug, warn};
use petgraph::algo::toposort;
use petgraph::graph::{EdgeIndex, EdgeReference, NodeIndex};
use petgraph::visit::{EdgeFiltered, EdgeRef};
use petgraph::Direction;
use std::collections::{HashMap, HashSet, VecDeque};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Vertex positions keyed by node id
pub type Positions = HashMap<i64, (f64, f64)>;

/// Named layout strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// Layered top-down drawing, roots on top
    Hierarchical,
    /// Fruchterman-Reingold spring embedding
    ForceDirected,
    /// All vertices on one circle
    Circular,
    /// Concentric circles by distance from the roots
    Shell,
}

impl Layout {
    pub fn name(&self) -> &'static str {
        match self {
            Layout::Hierarchical => "hierarchical",
            Layout::ForceDirected => "force-directed",
            Layout::Circular => "circular",
            Layout::Shell => "shell",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layout {
    type Err = RenderError;

    /// Accepts the strategy names plus the Graphviz/NetworkX names
    /// benchmark scripts commonly pass (`dot`, `spring`, `twopi`, ...)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dot" | "hierarchical" => Ok(Layout::Hierarchical),
            "spring" | "neato" | "kamada_kawai" | "force" | "force-directed" => {
                Ok(Layout::ForceDirected)
            }
            "circular" | "circo" => Ok(Layout::Circular),
            "shell" | "twopi" => Ok(Layout::Shell),
            _ => Err(RenderError::UnknownLayout(s.to_string())),
        }
    }
}

/// Result of a layout run
#[derive(Debug, Clone)]
pub struct ComputedLayout {
    /// Strategy the caller asked for
    pub requested: Layout,

    /// Strategy that produced `positions`
    pub applied: Layout,

    pub positions: Positions,
}

impl ComputedLayout {
    pub fn fell_back(&self) -> bool {
        self.requested != self.applied
    }
}

/// Compute vertex positions with the requested strategy
///
/// **Public** - main entry point for layouts
///
/// A hierarchical request whose layering fails logs a warning and falls
/// back to the force-directed layout.
pub fn compute_layout(graph: &WalkerGraph, requested: Layout) -> ComputedLayout {
    let (applied, positions) = match requested {
        Layout::Hierarchical => match hierarchical_layout(graph) {
            Some(positions) => (Layout::Hierarchical, positions),
            None => {
                warn!(
                    "Hierarchical layout not available for this graph ({} nodes). Using force-directed layout.",
                    graph.node_count()
                );
                (Layout::ForceDirected, force_directed_layout(graph, FORCE_LAYOUT_ITERATIONS))
            }
        },
        Layout::ForceDirected => (
            Layout::ForceDirected,
            force_directed_layout(graph, FORCE_LAYOUT_ITERATIONS),
        ),
        Layout::Circular => (Layout::Circular, circular_layout(&graph.node_ids())),
        Layout::Shell => (Layout::Shell, shell_layout(graph)),
    };

    debug!(
        "Computed {} layout for {} nodes (requested {})",
        applied,
        positions.len(),
        requested
    );

    ComputedLayout {
        requested,
        applied,
        positions,
    }
}

/// Layered layout: layer = longest path from a root over forward edges
///
/// Back edges found by a depth-first search from the roots are left out of
/// the layering, which makes every graph acyclic first. Returns `None` only
/// if the remaining edges still cannot be ordered.
pub fn hierarchical_layout(graph: &WalkerGraph) -> Option<Positions> {
    let inner = graph.inner();
    let back = back_edges(graph);
    if !back.is_empty() {
        debug!("Ignoring {} back edges for layering", back.len());
    }

    let forward = EdgeFiltered::from_fn(inner, |edge: EdgeReference<'_, ()>| {
        !back.contains(&edge.id())
    });
    let order = toposort(&forward, None).ok()?;

    let mut layer_of: HashMap<NodeIndex, usize> = HashMap::new();
    for &index in &order {
        let layer = inner
            .edges_directed(index, Direction::Incoming)
            .filter(|edge| !back.contains(&edge.id()))
            .filter_map(|edge| layer_of.get(&edge.source()).map(|l| l + 1))
            .max()
            .unwrap_or(0);
        layer_of.insert(index, layer);
    }

    let depth = layer_of.values().copied().max().unwrap_or(0);
    let mut layers: Vec<Vec<i64>> = vec![Vec::new(); depth + 1];
    // Node indices follow insertion order, which keeps siblings left to right
    for index in inner.node_indices() {
        if let Some(&layer) = layer_of.get(&index) {
            layers[layer].push(inner[index]);
        }
    }

    let mut positions = Positions::new();
    for (layer, ids) in layers.iter().enumerate() {
        let y = if depth == 0 {
            0.0
        } else {
            1.0 - 2.0 * layer as f64 / depth as f64
        };
        for (slot, id) in ids.iter().enumerate() {
            positions.insert(*id, (spread(slot, ids.len()), y));
        }
    }

    Some(positions)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Active,
    Done,
}

/// Edges that close a cycle in a depth-first search seeded from the roots,
/// then from any vertex left unvisited (self-loops included)
fn back_edges(graph: &WalkerGraph) -> HashSet<EdgeIndex> {
    let inner = graph.inner();
    let out_edges = |index: NodeIndex| -> Vec<(EdgeIndex, NodeIndex)> {
        let mut edges: Vec<_> = inner.edges(index).map(|e| (e.id(), e.target())).collect();
        // petgraph lists the newest edge first
        edges.reverse();
        edges
    };

    let mut state = vec![Visit::New; inner.node_count()];
    let mut back = HashSet::new();

    let roots = inner
        .node_indices()
        .filter(|&i| inner.neighbors_directed(i, Direction::Incoming).next().is_none());
    let seeds: Vec<NodeIndex> = roots.chain(inner.node_indices()).collect();

    for seed in seeds {
        if state[seed.index()] != Visit::New {
            continue;
        }
        state[seed.index()] = Visit::Active;
        let mut stack = vec![(seed, out_edges(seed), 0usize)];

        while let Some((node, edges, next)) = stack.last_mut() {
            if let Some(&(edge, target)) = edges.get(*next) {
                *next += 1;
                match state[target.index()] {
                    Visit::New => {
                        state[target.index()] = Visit::Active;
                        let target_edges = out_edges(target);
                        stack.push((target, target_edges, 0));
                    }
                    Visit::Active => {
                        back.insert(edge);
                    }
                    Visit::Done => {}
                }
            } else {
                state[node.index()] = Visit::Done;
                stack.pop();
            }
        }
    }

    back
}

/// Evenly spaced vertices on the unit circle; a lone vertex sits at the origin
pub fn circular_layout(ids: &[i64]) -> Positions {
    if ids.len() == 1 {
        return ids.iter().map(|id| (*id, (0.0, 0.0))).collect();
    }

    ids.iter()
        .enumerate()
        .map(|(i, id)| {
            let angle = 2.0 * PI * i as f64 / ids.len() as f64;
            (*id, (angle.cos(), angle.sin()))
        })
        .collect()
}

/// Concentric shells by breadth-first distance from the roots
///
/// Vertices only reachable through a cycle seed a new search of their own.
pub fn shell_layout(graph: &WalkerGraph) -> Positions {
    let shells = bfs_shells(graph);

    if shells.len() <= 1 {
        return circular_layout(shells.first().map(Vec::as_slice).unwrap_or(&[]));
    }

    let center_single = shells[0].len() == 1;
    let count = shells.len() as f64;
    let mut positions = Positions::new();

    for (k, shell) in shells.iter().enumerate() {
        let radius = if center_single {
            k as f64 / (count - 1.0)
        } else {
            (k as f64 + 1.0) / count
        };
        for (i, id) in shell.iter().enumerate() {
            let angle = 2.0 * PI * i as f64 / shell.len() as f64;
            positions.insert(*id, (radius * angle.cos(), radius * angle.sin()));
        }
    }

    positions
}

fn bfs_shells(graph: &WalkerGraph) -> Vec<Vec<i64>> {
    let mut depth_of: HashMap<i64, usize> = HashMap::new();
    let mut queue = VecDeque::new();

    let mut seeds = graph.roots();
    seeds.extend(graph.node_ids());

    for seed in seeds {
        if depth_of.contains_key(&seed) {
            continue;
        }
        depth_of.insert(seed, 0);
        queue.push_back(seed);

        while let Some(id) = queue.pop_front() {
            let next = depth_of[&id] + 1;
            for succ in graph.successors(id) {
                if !depth_of.contains_key(&succ) {
                    depth_of.insert(succ, next);
                    queue.push_back(succ);
                }
            }
        }
    }

    let depth = depth_of.values().copied().max().map_or(0, |d| d + 1);
    let mut shells = vec![Vec::new(); depth];
    for id in graph.node_ids() {
        if let Some(&d) = depth_of.get(&id) {
            shells[d].push(id);
        }
    }
    shells
}

/// Deterministic Fruchterman-Reingold spring layout
///
/// Starts from the circular layout so repeated runs give the same picture.
pub fn force_directed_layout(graph: &WalkerGraph, iterations: usize) -> Positions {
    let ids = graph.node_ids();
    let n = ids.len();
    if n <= 1 {
        return circular_layout(&ids);
    }

    let slot: HashMap<i64, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let edges: Vec<(usize, usize)> = graph
        .simplified_edges()
        .into_iter()
        .filter(|(a, b)| a != b)
        .map(|(a, b)| (slot[&a], slot[&b]))
        .collect();

    let initial = circular_layout(&ids);
    let mut pos: Vec<(f64, f64)> = ids
        .iter()
        .map(|id| {
            let (x, y) = initial[id];
            (x * 0.5, y * 0.5)
        })
        .collect();

    let k = (1.0 / n as f64).sqrt();
    let mut temperature = 0.1;
    let cooling = temperature / (iterations as f64 + 1.0);

    for _ in 0..iterations {
        let mut disp = vec![(0.0, 0.0); n];

        for i in 0..n {
            for j in (i + 1)..n {
                let (dx, dy) = (pos[i].0 - pos[j].0, pos[i].1 - pos[j].1);
                let dist = (dx * dx + dy * dy).sqrt().max(0.01);
                let force = k * k / dist;
                let (fx, fy) = (dx / dist * force, dy / dist * force);
                disp[i].0 += fx;
                disp[i].1 += fy;
                disp[j].0 -= fx;
                disp[j].1 -= fy;
            }
        }

        for &(a, b) in &edges {
            let (dx, dy) = (pos[a].0 - pos[b].0, pos[a].1 - pos[b].1);
            let dist = (dx * dx + dy * dy).sqrt().max(0.01);
            let force = dist * dist / k;
            let (fx, fy) = (dx / dist * force, dy / dist * force);
            disp[a].0 -= fx;
            disp[a].1 -= fy;
            disp[b].0 += fx;
            disp[b].1 += fy;
        }

        for (p, d) in pos.iter_mut().zip(&disp) {
            let len = (d.0 * d.0 + d.1 * d.1).sqrt();
            if len > 0.0 {
                let step = len.min(temperature);
                p.0 += d.0 / len * step;
                p.1 += d.1 / len * step;
            }
        }

        temperature -= cooling;
    }

    rescale(&mut pos);
    ids.into_iter().zip(pos).collect()
}

/// Center on the mean and scale so the largest coordinate is 1
fn rescale(pos: &mut [(f64, f64)]) {
    let n = pos.len() as f64;
    let (cx, cy) = pos
        .iter()
        .fold((0.0, 0.0), |acc, p| (acc.0 + p.0 / n, acc.1 + p.1 / n));

    let mut extent: f64 = 0.0;
    for p in pos.iter_mut() {
        p.0 -= cx;
        p.1 -= cy;
        extent = extent.max(p.0.abs()).max(p.1.abs());
    }

    if extent > 0.0 {
        for p in pos.iter_mut() {
            p.0 /= extent;
            p.1 /= extent;
        }
    }
}

/// Horizontal slot of the i-th of n vertices in one layer
fn spread(i: usize, n: usize) -> f64 {
    if n <= 1 {
        0.0
    } else {
        -1.0 + 2.0 * i as f64 / (n - 1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(ids: &[i64]) -> WalkerGraph {
        let mut graph = WalkerGraph::new();
        for pair in ids.windows(2) {
            graph.add_edge(pair[0], pair[1]);
        }
        graph
    }

    fn in_unit_box(positions: &Positions) -> bool {
        positions
            .values()
            .all(|(x, y)| x.abs() <= 1.0 + 1e-9 && y.abs() <= 1.0 + 1e-9)
    }

    #[test]
    fn test_layout_names() {
        assert_eq!("dot".parse::<Layout>().unwrap(), Layout::Hierarchical);
        assert_eq!("SPRING".parse::<Layout>().unwrap(), Layout::ForceDirected);
        assert_eq!("circular".parse::<Layout>().unwrap(), Layout::Circular);
        assert_eq!("twopi".parse::<Layout>().unwrap(), Layout::Shell);
    }

    #[test]
    fn test_unknown_layout_is_error() {
        assert!(matches!(
            "sugiyama3d".parse::<Layout>(),
            Err(RenderError::UnknownLayout(name)) if name == "sugiyama3d"
        ));
    }

    #[test]
    fn test_hierarchical_layers() {
        let mut graph = chain(&[1, 2, 3]);
        graph.add_edge(1, 4);

        let positions = hierarchical_layout(&graph).unwrap();

        assert_eq!(positions[&1], (0.0, 1.0));
        assert_eq!(positions[&3].1, -1.0);
        assert_eq!(positions[&2].1, 0.0);
        assert_eq!(positions[&4].1, 0.0);
        assert!(positions[&2].0 < positions[&4].0);
    }

    #[test]
    fn test_hierarchical_layers_a_cycle() {
        let mut graph = chain(&[1, 2, 3]);
        graph.add_edge(3, 1);

        let layout = compute_layout(&graph, Layout::Hierarchical);

        assert!(!layout.fell_back());
        assert_eq!(layout.applied, Layout::Hierarchical);
        assert_eq!(layout.positions[&1].1, 1.0);
        assert_eq!(layout.positions[&2].1, 0.0);
        assert_eq!(layout.positions[&3].1, -1.0);
    }

    #[test]
    fn test_hierarchical_self_loop_and_revisit() {
        let mut graph = chain(&[1, 2, 4]);
        graph.add_edge(2, 2);
        graph.add_edge(4, 1);
        graph.add_edge(1, 4);

        let positions = hierarchical_layout(&graph).unwrap();

        assert_eq!(positions.len(), 3);
        assert_eq!(positions[&1].1, 1.0);
        assert_eq!(positions[&2].1, 0.0);
        assert_eq!(positions[&4].1, -1.0);
    }

    #[test]
    fn test_back_edges_only_close_cycles() {
        let mut graph = chain(&[1, 2, 3]);
        graph.add_edge(1, 3);
        assert!(back_edges(&graph).is_empty());

        graph.add_edge(3, 2);
        assert_eq!(back_edges(&graph).len(), 1);
    }

    #[test]
    fn test_circular_single_node_at_origin() {
        let positions = circular_layout(&[9]);
        assert_eq!(positions[&9], (0.0, 0.0));
    }

    #[test]
    fn test_shell_root_in_center() {
        let mut graph = chain(&[1, 2]);
        graph.add_edge(1, 3);

        let positions = shell_layout(&graph);

        assert_eq!(positions[&1], (0.0, 0.0));
        let (x, y) = positions[&2];
        assert!(((x * x + y * y).sqrt() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_force_directed_is_deterministic_and_bounded() {
        let graph = chain(&[1, 2, 3, 4, 5]);

        let first = force_directed_layout(&graph, 50);
        let second = force_directed_layout(&graph, 50);

        assert_eq!(first, second);
        assert_eq!(first.len(), 5);
        assert!(in_unit_box(&first));
    }

    #[test]
    fn test_every_layout_places_every_node() {
        let mut graph = chain(&[1, 2, 3]);
        graph.add_node(7);

        for layout in [Layout::Hierarchical, Layout::ForceDirected, Layout::Circular, Layout::Shell] {
            let computed = compute_layout(&graph, layout);
            assert_eq!(computed.positions.len(), 4, "layout {}", layout);
            assert!(in_unit_box(&computed.positions));
        }
    }
}
