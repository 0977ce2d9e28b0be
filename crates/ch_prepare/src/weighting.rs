//! Weight-handler seam between the hierarchy builder and the numeric
//! representation of edge weights. The builder only talks to the graph
//! through a handler when it materialises shortcuts, so a different weight
//! encoding only has to provide a different handler.
use crate::{
    constants::Weight,
    graph::{DualWeight, EdgeDirection, MetaGraph, NodeIndex},
};

pub trait WeightHandler {
    /// Whether the handler can operate on the given graph. Checked once at
    /// builder construction; a rejected graph is a fatal error.
    fn supports(&self, g: &MetaGraph) -> bool;

    /// Scalar metric a dual weight contributes in the given direction.
    fn metric(&self, weight: DualWeight, direction: EdgeDirection) -> Weight;

    /// Writes one shortcut record into the graph. Returns whether the graph
    /// changed.
    fn add_or_update_edge(
        &self,
        g: &mut MetaGraph,
        u: NodeIndex,
        v: NodeIndex,
        via: NodeIndex,
        direction: EdgeDirection,
        weight: DualWeight,
    ) -> bool;
}

/// Default handler for plain dual `f64` weights.
#[derive(Debug, Default, Clone, Copy)]
pub struct DualWeightHandler;

impl WeightHandler for DualWeightHandler {
    fn supports(&self, g: &MetaGraph) -> bool {
        g.all_edges()
            .all(|e| !e.weight.forward.is_nan() && !e.weight.backward.is_nan()
                && e.weight.forward >= 0.0
                && e.weight.backward >= 0.0)
    }

    fn metric(&self, weight: DualWeight, direction: EdgeDirection) -> Weight {
        match direction {
            EdgeDirection::Backward => weight.backward,
            _ => weight.forward,
        }
    }

    fn add_or_update_edge(
        &self,
        g: &mut MetaGraph,
        u: NodeIndex,
        v: NodeIndex,
        via: NodeIndex,
        direction: EdgeDirection,
        weight: DualWeight,
    ) -> bool {
        g.add_or_update_edge(u, v, Some(via), direction, weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge;
    use crate::graph::node_index;

    #[test]
    fn default_handler_supports_well_formed_graphs() {
        let mut g = MetaGraph::with_node_count(2);
        g.add_edge(edge!(0, 1, 1.0));

        assert!(DualWeightHandler.supports(&g));
    }

    #[test]
    fn metric_picks_the_meaningful_component() {
        let w = DualWeight::new(2.0, 7.0);
        let handler = DualWeightHandler;

        assert_eq!(handler.metric(w, EdgeDirection::Forward), 2.0);
        assert_eq!(handler.metric(w, EdgeDirection::Both), 2.0);
        assert_eq!(handler.metric(w, EdgeDirection::Backward), 7.0);
    }

    #[test]
    fn handler_insertions_carry_provenance() {
        let mut g = MetaGraph::with_node_count(3);
        let handler = DualWeightHandler;
        handler.add_or_update_edge(
            &mut g,
            node_index(0),
            node_index(1),
            node_index(2),
            EdgeDirection::Both,
            DualWeight::symmetric(4.0),
        );

        let e = &g.edges_of(node_index(0))[0];
        assert_eq!(e.via, Some(node_index(2)));
        assert!(e.is_shortcut());
    }
}
