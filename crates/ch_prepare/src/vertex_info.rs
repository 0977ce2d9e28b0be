//! Per-vertex evaluation: the neighbour weights, the candidate shortcuts a
//! contraction would have to insert, the witness-pruned survivor set and the
//! priority score derived from them.
use crate::{
    constants::Weight,
    contraction_params::PriorityParams,
    graph::{Edge, NodeIndex},
    witness_graph::WitnessGraph,
};

/// Best per-direction weights between a vertex under evaluation and one of
/// its uncontracted neighbours.
#[derive(Debug, Clone, Copy)]
pub struct NeighborWeights {
    pub node: NodeIndex,
    /// Cheapest vertex -> node
    pub out_weight: Weight,
    /// Cheapest node -> vertex
    pub in_weight: Weight,
}

/// Candidate shortcut between two neighbours of the vertex under
/// evaluation. `forward` is the concatenated cost source -> vertex ->
/// target, `backward` the cost of the reverse concatenation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shortcut {
    pub source: NodeIndex,
    pub target: NodeIndex,
    pub forward: Weight,
    pub backward: Weight,
}

/// Snapshot of everything the driver needs to decide on and perform one
/// contraction.
#[derive(Debug, Clone)]
pub struct VertexInfo {
    pub vertex: NodeIndex,
    pub depth: usize,
    pub contracted_neighbors: usize,
    pub relevant_edges: Vec<NeighborWeights>,
    pub shortcuts: Vec<Shortcut>,
}

impl VertexInfo {
    /// Builds the info from the vertex's live records. The caller passes the
    /// records already filtered down to uncontracted endpoints.
    pub(crate) fn new<'a>(
        vertex: NodeIndex,
        depth: usize,
        contracted_neighbors: usize,
        edges: impl Iterator<Item = &'a Edge>,
    ) -> Self {
        let relevant_edges = Self::relevant_edges(vertex, edges);
        let shortcuts = Self::candidate_shortcuts(&relevant_edges);
        VertexInfo {
            vertex,
            depth,
            contracted_neighbors,
            relevant_edges,
            shortcuts,
        }
    }

    /// Collapses parallel records into one entry per distinct neighbour with
    /// the best weight for either orientation.
    fn relevant_edges<'a>(
        vertex: NodeIndex,
        edges: impl Iterator<Item = &'a Edge>,
    ) -> Vec<NeighborWeights> {
        let mut neighbors: Vec<NeighborWeights> = Vec::new();
        for edge in edges {
            let node = edge.target;
            if node == vertex {
                continue;
            }
            let out_weight = if edge.direction.allows_forward() {
                edge.weight.forward
            } else {
                Weight::INFINITY
            };
            let in_weight = if edge.direction.allows_backward() {
                edge.weight.backward
            } else {
                Weight::INFINITY
            };
            match neighbors.iter_mut().find(|n| n.node == node) {
                Some(n) => {
                    n.out_weight = n.out_weight.min(out_weight);
                    n.in_weight = n.in_weight.min(in_weight);
                }
                None => neighbors.push(NeighborWeights {
                    node,
                    out_weight,
                    in_weight,
                }),
            }
        }
        neighbors
    }

    /// One candidate per ordered neighbour pair. Candidates without a single
    /// finite side are not worth tracking and dropped right away.
    fn candidate_shortcuts(neighbors: &[NeighborWeights]) -> Vec<Shortcut> {
        let mut shortcuts = Vec::new();
        for u in neighbors {
            for w in neighbors {
                if u.node == w.node {
                    continue;
                }
                let forward = u.in_weight + w.out_weight;
                let backward = w.in_weight + u.out_weight;
                if !forward.is_finite() && !backward.is_finite() {
                    continue;
                }
                shortcuts.push(Shortcut {
                    source: u.node,
                    target: w.node,
                    forward,
                    backward,
                });
            }
        }
        shortcuts
    }

    /// Drops every candidate side for which the witness graph certifies an
    /// alternative that is better by at least `tolerance`; a candidate with
    /// both sides gone disappears entirely. Returns whether any witness was
    /// used.
    pub(crate) fn remove_shortcuts(&mut self, witness: &WitnessGraph, tolerance: Weight) -> bool {
        let mut witness_used = false;
        self.shortcuts.retain_mut(|s| {
            if s.forward.is_finite() && witness.weight(s.source, s.target) <= s.forward - tolerance
            {
                s.forward = Weight::INFINITY;
                witness_used = true;
            }
            if s.backward.is_finite()
                && witness.weight(s.target, s.source) <= s.backward - tolerance
            {
                s.backward = Weight::INFINITY;
                witness_used = true;
            }
            s.forward.is_finite() || s.backward.is_finite()
        });
        witness_used
    }

    /// Priority score of the vertex; lower scores are contracted sooner.
    pub(crate) fn priority(&self, params: &PriorityParams) -> Weight {
        params.difference_coeff
            * (self.shortcuts.len() as Weight - self.relevant_edges.len() as Weight)
            + params.depth_coeff * self.depth as Weight
            + params.contracted_neighbors_coeff * self.contracted_neighbors as Weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge;
    use crate::graph::{node_index, MetaGraph};

    fn info_for(g: &MetaGraph, vertex: NodeIndex) -> VertexInfo {
        VertexInfo::new(vertex, 0, 0, g.edges_of(vertex).iter())
    }

    #[test]
    fn relevant_edges_collapse_parallel_records() {
        // 1 <-> 0 with distinct per-direction records
        let mut g = MetaGraph::with_node_count(2);
        g.add_edge(edge!(0 => 1, 1.0, 10.0));

        let info = info_for(&g, node_index(0));

        assert_eq!(info.relevant_edges.len(), 1);
        let n = info.relevant_edges[0];
        assert_eq!(n.node, node_index(1));
        assert_eq!(n.out_weight, 1.0);
        assert_eq!(n.in_weight, 10.0);
    }

    #[test]
    fn candidates_concatenate_the_best_weights() {
        // 0 -> 1 -> 2, evaluated at 1
        let mut g = MetaGraph::with_node_count(3);
        g.add_edge(edge!(0 => 1, 1.0, 10.0));
        g.add_edge(edge!(1 => 2, 1.0, 10.0));

        let info = info_for(&g, node_index(1));

        assert_eq!(info.relevant_edges.len(), 2);
        let forward = info
            .shortcuts
            .iter()
            .find(|s| s.source == node_index(0) && s.target == node_index(2))
            .unwrap();
        assert_eq!(forward.forward, 2.0);
        assert_eq!(forward.backward, 20.0);
    }

    #[test]
    fn candidates_without_a_finite_side_are_dropped() {
        // 0 -> 1 and 2 -> 1: no path passes through 1 in either direction.
        let mut g = MetaGraph::with_node_count(3);
        g.add_edge(edge!(0 => 1, 1.0));
        g.add_edge(edge!(2 => 1, 1.0));

        let info = info_for(&g, node_index(1));

        assert_eq!(info.relevant_edges.len(), 2);
        assert!(info.shortcuts.is_empty());
    }

    #[test]
    fn witness_prunes_a_strictly_better_alternative() {
        // 0 -> 1 -> 2 with a known alternative 0 -> 2 of weight 1.0
        let mut g = MetaGraph::with_node_count(3);
        g.add_edge(edge!(0 => 1, 1.0));
        g.add_edge(edge!(1 => 2, 1.0));

        let mut witness = WitnessGraph::new();
        witness.add_or_update_edge(node_index(0), node_index(2), 1.0);

        // Both ordered pairs carry one finite side each.
        let mut info = info_for(&g, node_index(1));
        assert_eq!(info.shortcuts.len(), 2);

        assert!(info.remove_shortcuts(&witness, 0.1));
        assert!(info.shortcuts.is_empty());
    }

    #[test]
    fn witness_of_equal_weight_does_not_prune() {
        // The alternative must beat the candidate by the tolerance; an equal
        // witness may be the concatenation through the vertex itself.
        let mut g = MetaGraph::with_node_count(3);
        g.add_edge(edge!(0 => 1, 1.0));
        g.add_edge(edge!(1 => 2, 1.0));

        let mut witness = WitnessGraph::new();
        witness.add_or_update_edge(node_index(0), node_index(2), 2.0);

        let mut info = info_for(&g, node_index(1));
        assert!(!info.remove_shortcuts(&witness, 0.1));
        assert_eq!(info.shortcuts.len(), 2);
    }

    #[test]
    fn pruning_works_per_side() {
        // Symmetric chain, but only the direction 0 -> 2 has a better
        // alternative: the backward side must survive.
        let mut g = MetaGraph::with_node_count(3);
        g.add_edge(edge!(0, 1, 2.0));
        g.add_edge(edge!(1, 2, 2.0));

        let mut witness = WitnessGraph::new();
        witness.add_or_update_edge(node_index(0), node_index(2), 1.0);

        let mut info = info_for(&g, node_index(1));
        assert!(info.remove_shortcuts(&witness, 0.1));

        let s = info
            .shortcuts
            .iter()
            .find(|s| s.source == node_index(0) && s.target == node_index(2))
            .unwrap();
        assert!(s.forward.is_infinite());
        assert_eq!(s.backward, 4.0);
    }

    #[test]
    fn priority_weighs_difference_depth_and_neighbors() {
        // Chain midpoint: two neighbours, two surviving candidates.
        let mut g = MetaGraph::with_node_count(3);
        g.add_edge(edge!(0, 1, 1.0));
        g.add_edge(edge!(1, 2, 1.0));

        let info = VertexInfo::new(node_index(1), 3, 2, g.edges_of(node_index(1)).iter());
        let params = PriorityParams::default();

        // 5 * (2 - 2) + 5 * 3 + 5 * 2
        assert_eq!(info.priority(&params), 25.0);
    }

    #[test]
    fn leaf_vertices_score_negative() {
        let mut g = MetaGraph::with_node_count(2);
        g.add_edge(edge!(0, 1, 1.0));

        let info = info_for(&g, node_index(0));
        let params = PriorityParams::default();

        // One neighbour, no candidates: 5 * (0 - 1)
        assert_eq!(info.priority(&params), -5.0);
    }
}
