//! Convert walker traversal trees into directed multigraphs.
//!
//! Every distinct node id becomes one vertex; every parent-child link in the
//! tree becomes one edge. A child id repeated under the same parent yields
//! parallel edges, which are kept.

use crate::parser::loader::parse_walker_trees;
use crate::parser::schema::WalkerTreeNode;
use crate::utils::error::ParseError;
use log::debug;
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use serde_json::Value;
use std::collections::{HashMap, HashSet};

/// Directed multigraph of one walker traversal
///
/// Vertices and edges carry no attributes beyond the node id.
#[derive(Debug, Clone, Default)]
pub struct WalkerGraph {
    graph: DiGraph<i64, ()>,
    indices: HashMap<i64, NodeIndex>,
}

impl WalkerGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a vertex; adding an existing id is a no-op
    pub fn add_node(&mut self, id: i64) -> NodeIndex {
        let graph = &mut self.graph;
        *self.indices.entry(id).or_insert_with(|| graph.add_node(id))
    }

    /// Add one directed edge, registering both endpoints if needed
    pub fn add_edge(&mut self, from: i64, to: i64) {
        let a = self.add_node(from);
        let b = self.add_node(to);
        self.graph.add_edge(a, b, ());
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_node(&self, id: i64) -> bool {
        self.indices.contains_key(&id)
    }

    /// Number of parallel edges from `from` to `to`
    pub fn edge_multiplicity(&self, from: i64, to: i64) -> usize {
        match (self.indices.get(&from), self.indices.get(&to)) {
            (Some(&a), Some(&b)) => self.graph.edges_connecting(a, b).count(),
            _ => 0,
        }
    }

    /// Node ids in insertion order
    pub fn node_ids(&self) -> Vec<i64> {
        self.graph.node_indices().map(|i| self.graph[i]).collect()
    }

    /// All edges in insertion order, parallel edges included
    pub fn edges(&self) -> Vec<(i64, i64)> {
        self.graph
            .raw_edges()
            .iter()
            .map(|e| (self.graph[e.source()], self.graph[e.target()]))
            .collect()
    }

    /// Distinct (from, to) pairs in first-seen order
    ///
    /// This is the simple digraph view used for drawing.
    pub fn simplified_edges(&self) -> Vec<(i64, i64)> {
        let mut seen = HashSet::new();
        self.edges()
            .into_iter()
            .filter(|pair| seen.insert(*pair))
            .collect()
    }

    /// Vertices without incoming edges, in insertion order
    pub fn roots(&self) -> Vec<i64> {
        self.graph
            .node_indices()
            .filter(|&i| {
                self.graph
                    .neighbors_directed(i, Direction::Incoming)
                    .next()
                    .is_none()
            })
            .map(|i| self.graph[i])
            .collect()
    }

    /// Successor ids of a vertex (parallel edges collapsed, no fixed order)
    pub fn successors(&self, id: i64) -> Vec<i64> {
        let Some(&index) = self.indices.get(&id) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        self.graph
            .neighbors_directed(index, Direction::Outgoing)
            .map(|i| self.graph[i])
            .filter(|succ| seen.insert(*succ))
            .collect()
    }

    /// True when some id is reachable from itself
    pub fn is_cyclic(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Underlying petgraph graph, for algorithms
    pub fn inner(&self) -> &DiGraph<i64, ()> {
        &self.graph
    }
}

/// Build the multigraph of a single walker tree
///
/// Depth-first, pre-order: each node is registered before its children,
/// children are visited in input order. An explicit stack keeps deep trees
/// off the call stack.
pub fn tree_to_multigraph(root: &WalkerTreeNode) -> WalkerGraph {
    let mut graph = WalkerGraph::new();
    let mut pending: Vec<(&WalkerTreeNode, Option<i64>)> = vec![(root, None)];

    while let Some((step, parent)) = pending.pop() {
        let id = step.node.id;
        graph.add_node(id);

        if let Some(parent_id) = parent {
            graph.add_edge(parent_id, id);
        }

        // Reversed so the first child is popped first
        for child in step.children.iter().rev() {
            pending.push((child, Some(id)));
        }
    }

    graph
}

/// Convert a list of walker trees into one multigraph per tree
///
/// **Public** - main entry point for the tree-to-graph pipeline
///
/// # Arguments
/// * `data` - Parsed JSON; a list whose elements are tree roots
///
/// # Returns
/// One `WalkerGraph` per root, in input order
///
/// # Errors
/// * `ParseError::InvalidFormat` - `data` is not a list
/// * `ParseError::MalformedInput` - a node lacks an integer `node.id`
pub fn walkers_to_multigraphs(data: &Value) -> Result<Vec<WalkerGraph>, ParseError> {
    let trees = parse_walker_trees(data)?;
    Ok(trees_to_multigraphs(&trees))
}

/// Convert already-typed walker trees
pub fn trees_to_multigraphs(trees: &[WalkerTreeNode]) -> Vec<WalkerGraph> {
    trees
        .iter()
        .enumerate()
        .map(|(index, tree)| {
            let graph = tree_to_multigraph(tree);
            debug!(
                "Walker tree {}: {} steps -> {} vertices, {} edges",
                index,
                tree.step_count(),
                graph.node_count(),
                graph.edge_count()
            );
            graph
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_node_tree() {
        let graphs = walkers_to_multigraphs(&json!([{"node": {"id": 1}}])).unwrap();
        assert_eq!(graphs.len(), 1);
        assert_eq!(graphs[0].node_count(), 1);
        assert_eq!(graphs[0].edge_count(), 0);
    }

    #[test]
    fn test_repeated_child_gives_parallel_edges() {
        let data = json!([{
            "node": {"id": 1},
            "children": [{"node": {"id": 2}}, {"node": {"id": 2}}]
        }]);
        let graph = &walkers_to_multigraphs(&data).unwrap()[0];

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edge_multiplicity(1, 2), 2);
        assert_eq!(graph.simplified_edges(), vec![(1, 2)]);
    }

    #[test]
    fn test_preorder_edge_order() {
        let data = json!([{
            "node": {"id": 1},
            "children": [
                {"node": {"id": 2}, "children": [{"node": {"id": 4}}]},
                {"node": {"id": 3}}
            ]
        }]);
        let graph = &walkers_to_multigraphs(&data).unwrap()[0];

        assert_eq!(graph.node_ids(), vec![1, 2, 4, 3]);
        assert_eq!(graph.edges(), vec![(1, 2), (2, 4), (1, 3)]);
        assert_eq!(graph.roots(), vec![1]);
    }

    #[test]
    fn test_add_node_is_idempotent() {
        let mut graph = WalkerGraph::new();
        let a = graph.add_node(5);
        let b = graph.add_node(5);
        assert_eq!(a, b);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_revisited_id_makes_cycle() {
        let data = json!([{
            "node": {"id": 1},
            "children": [{"node": {"id": 2}, "children": [{"node": {"id": 1}}]}]
        }]);
        let graph = &walkers_to_multigraphs(&data).unwrap()[0];

        assert_eq!(graph.node_count(), 2);
        assert!(graph.is_cyclic());
        assert!(graph.roots().is_empty());
    }

    #[test]
    fn test_malformed_tree_fails_whole_call() {
        let data = json!([
            {"node": {"id": 1}},
            {"node": {"id": 2}, "children": [{"children": []}]}
        ]);
        assert!(matches!(
            walkers_to_multigraphs(&data),
            Err(ParseError::MalformedInput(_))
        ));
    }
}
