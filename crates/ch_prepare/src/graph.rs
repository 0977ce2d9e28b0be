//! Meta-graph module. The directed graph is represented as mirrored
//! adjacency lists and rewritten in place during vertex contraction.
use crate::constants::{Weight, WEIGHT_TOLERANCE};
use log::debug;
use serde::{Deserialize, Serialize};
use std::{fmt, hash::Hash};

/// Default integer type for vertex indices.
/// Needs to be increased for very large graphs > u32::max
pub type DefaultIdx = u32;

pub trait IndexType: Copy + Default + Hash + Ord + fmt::Debug {
    fn new(idx: usize) -> Self;
    fn index(&self) -> usize;
    fn max() -> Self;
}

impl IndexType for usize {
    #[inline(always)]
    fn new(x: usize) -> Self {
        x
    }
    #[inline(always)]
    fn index(&self) -> Self {
        *self
    }
    #[inline(always)]
    fn max() -> Self {
        usize::MAX
    }
}

impl IndexType for u32 {
    #[inline(always)]
    fn new(x: usize) -> Self {
        x as u32
    }
    #[inline(always)]
    fn index(&self) -> usize {
        *self as usize
    }
    #[inline(always)]
    fn max() -> Self {
        u32::MAX
    }
}

/// Vertex identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct NodeIndex<Idx = DefaultIdx>(Idx);

impl NodeIndex {
    #[inline]
    pub fn new(x: usize) -> Self {
        NodeIndex(IndexType::new(x))
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0.index()
    }

    #[inline]
    pub fn end() -> Self {
        NodeIndex(IndexType::max())
    }
}

impl<Idx: IndexType> From<Idx> for NodeIndex<Idx> {
    fn from(ix: Idx) -> Self {
        NodeIndex(ix)
    }
}

/// Short version of `NodeIndex::new`
pub fn node_index(index: usize) -> NodeIndex {
    NodeIndex::new(index)
}

/// The two independent metrics of one logical edge. `forward` is the cost of
/// traversing the edge from its source to its target, `backward` the cost of
/// the opposite traversal. `f64::INFINITY` encodes "no path in this
/// direction".
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct DualWeight {
    pub forward: Weight,
    pub backward: Weight,
}

impl DualWeight {
    pub fn new(forward: Weight, backward: Weight) -> Self {
        DualWeight { forward, backward }
    }

    pub fn symmetric(weight: Weight) -> Self {
        DualWeight {
            forward: weight,
            backward: weight,
        }
    }

    pub fn forward_only(weight: Weight) -> Self {
        DualWeight {
            forward: weight,
            backward: Weight::INFINITY,
        }
    }

    pub fn backward_only(weight: Weight) -> Self {
        DualWeight {
            forward: Weight::INFINITY,
            backward: weight,
        }
    }

    /// The weight as seen from the opposite endpoint.
    pub fn reversed(self) -> Self {
        DualWeight {
            forward: self.backward,
            backward: self.forward,
        }
    }
}

/// Directions an edge record may be traversed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum EdgeDirection {
    Both,
    Forward,
    Backward,
}

impl EdgeDirection {
    pub fn allows_forward(self) -> bool {
        matches!(self, EdgeDirection::Both | EdgeDirection::Forward)
    }

    pub fn allows_backward(self) -> bool {
        matches!(self, EdgeDirection::Both | EdgeDirection::Backward)
    }

    pub(crate) fn reversed(self) -> Self {
        match self {
            EdgeDirection::Both => EdgeDirection::Both,
            EdgeDirection::Forward => EdgeDirection::Backward,
            EdgeDirection::Backward => EdgeDirection::Forward,
        }
    }
}

/// A dual-weighted edge record between a `source` and a `target` vertex.
///
/// Shortcut records name the contracted vertex they replace in `via`;
/// original edges carry `via = None`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Edge<Idx = DefaultIdx> {
    pub source: NodeIndex<Idx>,
    pub target: NodeIndex<Idx>,
    pub weight: DualWeight,
    pub direction: EdgeDirection,
    pub via: Option<NodeIndex<Idx>>,
}

impl Edge {
    /// A plain input edge. The stored direction flags are derived from the
    /// weight when the edge is added to a graph.
    pub fn new(source: NodeIndex, target: NodeIndex, weight: DualWeight) -> Self {
        Edge {
            source,
            target,
            weight,
            direction: EdgeDirection::Both,
            via: None,
        }
    }

    pub fn is_shortcut(&self) -> bool {
        self.via.is_some()
    }

    /// Weight used when two records of the same direction compete for the
    /// same vertex pair. Backward records carry their meaning in the
    /// backward component, every other record in the forward component.
    pub(crate) fn comparison_weight(&self) -> Weight {
        match self.direction {
            EdgeDirection::Backward => self.weight.backward,
            _ => self.weight.forward,
        }
    }
}

/// A directed multigraph G = (V,E) with dual-weighted edge records.
///
/// Every logical edge is stored twice: as a record in the source's adjacency
/// list and as a reversed twin (components swapped, direction flipped) in the
/// target's list. All incident information of a vertex is therefore
/// reachable from its own list, which is what both the contraction loop and
/// the upward query searches enumerate.
#[derive(Clone, Serialize, Deserialize)]
pub struct MetaGraph<Idx = DefaultIdx> {
    pub(crate) edges: Vec<Vec<Edge<Idx>>>,
}

impl MetaGraph {
    /// Creates a new empty graph
    pub fn new() -> Self {
        Self { edges: Vec::new() }
    }

    /// Creates a graph with `num_nodes` vertices and no edges.
    pub fn with_node_count(num_nodes: usize) -> Self {
        Self {
            edges: vec![Vec::new(); num_nodes],
        }
    }

    /// Adds a new vertex to the graph
    pub fn add_node(&mut self) -> NodeIndex {
        let node_idx = NodeIndex::new(self.edges.len());

        assert!(
            NodeIndex::end() != node_idx,
            "Maximum number of vertices for index type {} exceeded",
            std::any::type_name::<DefaultIdx>()
        );

        self.edges.push(Vec::new());
        node_idx
    }

    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of edge records over all adjacency lists. Mirrored twins count
    /// separately.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum()
    }

    pub fn shortcut_record_count(&self) -> usize {
        self.all_edges().filter(|e| e.is_shortcut()).count()
    }

    /// Add a new `edge` to the graph, mirrored on both endpoints.
    ///
    /// The dual weight is split into records according to the direction
    /// convention: roughly equal components become one bidirectional record,
    /// anything else one directed record per finite component.
    ///
    /// **Panics** if the source or target vertex does not exist or a weight
    /// component is negative or NaN (zero and infinity are fine, infinity
    /// encodes a missing direction).
    pub fn add_edge(&mut self, edge: Edge) {
        let DualWeight { forward, backward } = edge.weight;

        assert!(
            !forward.is_nan() && !backward.is_nan(),
            "Edge weight must not be NaN"
        );
        assert!(
            forward >= 0.0 && backward >= 0.0,
            "Edge must have non-negative weights. Edge weight was ({}, {})",
            forward,
            backward
        );

        let (u, v, via) = (edge.source, edge.target, edge.via);
        if forward.is_finite() && backward.is_finite() && (forward - backward).abs() < WEIGHT_TOLERANCE
        {
            self.add_or_update_edge(u, v, via, EdgeDirection::Both, edge.weight);
            self.add_or_update_edge(v, u, via, EdgeDirection::Both, edge.weight.reversed());
            return;
        }
        if forward.is_finite() {
            self.add_or_update_edge(u, v, via, EdgeDirection::Forward, DualWeight::forward_only(forward));
            self.add_or_update_edge(v, u, via, EdgeDirection::Backward, DualWeight::backward_only(forward));
        }
        if backward.is_finite() {
            self.add_or_update_edge(u, v, via, EdgeDirection::Backward, DualWeight::backward_only(backward));
            self.add_or_update_edge(v, u, via, EdgeDirection::Forward, DualWeight::forward_only(backward));
        }
    }

    /// Add multiple `edges` to the graph.
    pub fn add_edges(&mut self, edges: Vec<Edge>) {
        for edge in edges {
            self.add_edge(edge);
        }
    }

    /// Adds a single record `u -> v`, or updates an existing record with the
    /// same direction flag when the new weight is strictly smaller. No record
    /// may shadow a smaller weight in the same direction.
    ///
    /// Mirror twins are the caller's responsibility; contraction inserts
    /// shortcuts mirrored on both endpoint orderings explicitly.
    ///
    /// Returns whether the graph changed.
    pub fn add_or_update_edge(
        &mut self,
        u: NodeIndex,
        v: NodeIndex,
        via: Option<NodeIndex>,
        direction: EdgeDirection,
        weight: DualWeight,
    ) -> bool {
        assert!(
            u.index() < self.edges.len(),
            "Source vertex index ({}) does not exist",
            u.index()
        );
        assert!(
            v.index() < self.edges.len(),
            "Target vertex index ({}) does not exist",
            v.index()
        );

        let candidate = Edge {
            source: u,
            target: v,
            weight,
            direction,
            via,
        };
        if let Some(existing) = self.edges[u.index()]
            .iter_mut()
            .find(|e| e.target == v && e.direction == direction)
        {
            if existing.comparison_weight() > candidate.comparison_weight() {
                debug!(
                    "Updated edge weight from {} to {}",
                    existing.comparison_weight(),
                    candidate.comparison_weight()
                );
                existing.weight = weight;
                existing.via = via;
                return true;
            }
            return false;
        }
        self.edges[u.index()].push(candidate);
        true
    }

    /// Removes all records `u -> v` (that direction only).
    pub fn remove_edge(&mut self, u: NodeIndex, v: NodeIndex) {
        self.edges[u.index()].retain(|e| e.target != v);
    }

    /// Removes every record incident to `v`, in both directions.
    pub fn remove_edges(&mut self, v: NodeIndex) {
        let targets: Vec<NodeIndex> = self.edges[v.index()].iter().map(|e| e.target).collect();
        for t in targets {
            self.edges[t.index()].retain(|e| e.target != v);
        }
        self.edges[v.index()].clear();
    }

    /// The records stored at `v`.
    pub fn edges_of(&self, v: NodeIndex) -> &[Edge] {
        &self.edges[v.index()]
    }

    /// Iterator over every record of the graph.
    pub fn all_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.iter().flatten()
    }

    /// Prints some information about the graph
    pub fn print_info(&self) {
        println!(
            "MetaGraph:\t#Vertices: {}, #Records: {}, #Shortcut records: {}",
            self.node_count(),
            self.edge_count(),
            self.shortcut_record_count()
        );
        println!(
            "Avg. Degree: {:.3}",
            crate::statistics::average_degree(self)
        );
    }
}

impl Default for MetaGraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Macro to create an edge from source to target.
/// ```
/// use ch_prepare::edge;
/// // Symmetric edge, same weight in both directions
/// let e = edge!(0, 1, 3.0);
/// // One-way edge
/// let e = edge!(0 => 1, 3.0);
/// // Dual-weighted edge with distinct forward/backward metrics
/// let e = edge!(0 => 1, 3.0, 5.0);
/// ```
#[macro_export]
macro_rules! edge {
    ($source:expr => $target:expr, $forward:expr, $backward:expr) => {
        $crate::graph::Edge::new(
            $source.into(),
            $target.into(),
            $crate::graph::DualWeight::new($forward, $backward),
        )
    };
    ($source:expr => $target:expr, $weight:expr) => {
        $crate::graph::Edge::new(
            $source.into(),
            $target.into(),
            $crate::graph::DualWeight::forward_only($weight),
        )
    };
    ($source:expr , $target:expr, $weight:expr) => {
        $crate::graph::Edge::new(
            $source.into(),
            $target.into(),
            $crate::graph::DualWeight::symmetric($weight),
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_edge_is_mirrored() {
        let mut g = MetaGraph::with_node_count(2);
        g.add_edge(edge!(0, 1, 2.0));

        assert_eq!(g.edges_of(node_index(0)).len(), 1);
        assert_eq!(g.edges_of(node_index(1)).len(), 1);

        let e = &g.edges_of(node_index(0))[0];
        assert_eq!(e.target, node_index(1));
        assert_eq!(e.direction, EdgeDirection::Both);
        assert_eq!(e.weight.forward, 2.0);
        assert_eq!(e.weight.backward, 2.0);

        let twin = &g.edges_of(node_index(1))[0];
        assert_eq!(twin.target, node_index(0));
        assert_eq!(twin.direction, EdgeDirection::Both);
    }

    #[test]
    fn one_way_edge_splits_into_directed_records() {
        let mut g = MetaGraph::with_node_count(2);
        g.add_edge(edge!(0 => 1, 2.0));

        let records = g.edges_of(node_index(0));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].direction, EdgeDirection::Forward);
        assert_eq!(records[0].weight.forward, 2.0);
        assert!(records[0].weight.backward.is_infinite());

        let twin = &g.edges_of(node_index(1))[0];
        assert_eq!(twin.direction, EdgeDirection::Backward);
        assert_eq!(twin.weight.backward, 2.0);
    }

    #[test]
    fn asymmetric_edge_splits_into_two_records_per_endpoint() {
        let mut g = MetaGraph::with_node_count(2);
        g.add_edge(edge!(0 => 1, 1.0, 10.0));

        let records = g.edges_of(node_index(0));
        assert_eq!(records.len(), 2);
        let forward = records
            .iter()
            .find(|e| e.direction == EdgeDirection::Forward)
            .unwrap();
        let backward = records
            .iter()
            .find(|e| e.direction == EdgeDirection::Backward)
            .unwrap();
        assert_eq!(forward.weight.forward, 1.0);
        assert_eq!(backward.weight.backward, 10.0);

        assert_eq!(g.edges_of(node_index(1)).len(), 2);
    }

    #[test]
    fn add_duplicate_edges_keeps_the_smaller_weight() {
        let mut g = MetaGraph::with_node_count(2);
        let a = node_index(0);
        let b = node_index(1);

        g.add_edge(edge!(a, b, 2.0));
        g.add_edge(edge!(a, b, 1.0));

        assert_eq!(g.edges_of(a).len(), 1);
        assert_eq!(g.edges_of(a)[0].weight.forward, 1.0);
        assert_eq!(g.edges_of(b)[0].weight.forward, 1.0);

        // A worse parallel edge never shadows the existing one.
        g.add_edge(edge!(a, b, 5.0));
        assert_eq!(g.edges_of(a).len(), 1);
        assert_eq!(g.edges_of(a)[0].weight.forward, 1.0);
    }

    #[test]
    fn update_replaces_provenance() {
        let mut g = MetaGraph::with_node_count(3);
        let a = node_index(0);
        let b = node_index(1);
        let via = node_index(2);

        g.add_or_update_edge(a, b, None, EdgeDirection::Both, DualWeight::symmetric(4.0));
        g.add_or_update_edge(a, b, Some(via), EdgeDirection::Both, DualWeight::symmetric(3.0));

        let e = &g.edges_of(a)[0];
        assert_eq!(e.via, Some(via));
        assert_eq!(e.weight.forward, 3.0);
    }

    #[test]
    fn records_with_distinct_directions_are_parallel() {
        let mut g = MetaGraph::with_node_count(2);
        let a = node_index(0);
        let b = node_index(1);

        g.add_or_update_edge(a, b, None, EdgeDirection::Forward, DualWeight::forward_only(2.0));
        g.add_or_update_edge(a, b, None, EdgeDirection::Backward, DualWeight::backward_only(7.0));

        assert_eq!(g.edges_of(a).len(), 2);
    }

    #[test]
    fn remove_edge_is_directional() {
        let mut g = MetaGraph::with_node_count(2);
        g.add_edge(edge!(0, 1, 1.0));

        g.remove_edge(node_index(0), node_index(1));

        assert!(g.edges_of(node_index(0)).is_empty());
        // The twin stays until removed from its own side.
        assert_eq!(g.edges_of(node_index(1)).len(), 1);
    }

    #[test]
    fn remove_edges_clears_both_directions() {
        let mut g = MetaGraph::with_node_count(3);
        g.add_edge(edge!(0, 1, 1.0));
        g.add_edge(edge!(1, 2, 1.0));

        g.remove_edges(node_index(1));

        assert!(g.edges_of(node_index(0)).is_empty());
        assert!(g.edges_of(node_index(1)).is_empty());
        assert!(g.edges_of(node_index(2)).is_empty());
    }

    #[test]
    fn infinite_components_are_ignored() {
        let mut g = MetaGraph::with_node_count(2);
        g.add_edge(edge!(0 => 1, f64::INFINITY, f64::INFINITY));

        assert_eq!(g.edge_count(), 0);
    }
}
