//! Small fixture graphs shared between tests and doc examples.
use crate::{
    edge,
    graph::{node_index, MetaGraph},
};

/// 0 - 1 - ... - (n-1), symmetric unit weights.
pub fn generate_line_graph(num_nodes: usize) -> MetaGraph {
    let mut g = MetaGraph::with_node_count(num_nodes);
    for i in 1..num_nodes {
        g.add_edge(edge!(node_index(i - 1), node_index(i), 1.0));
    }
    g
}

/// 0 -> 1 -> 2 -> 3 with unit weights plus a direct 0 -> 3 of weight 2,
/// all one-way. The direct edge witnesses the 0 -> 3 detour away.
pub fn generate_one_way_chain() -> MetaGraph {
    let mut g = MetaGraph::with_node_count(4);
    g.add_edge(edge!(0 => 1, 1.0));
    g.add_edge(edge!(1 => 2, 1.0));
    g.add_edge(edge!(2 => 3, 1.0));
    g.add_edge(edge!(0 => 3, 2.0));
    g
}

/// 0 -> 1 -> 2 with forward weight 1 and backward weight 10 per edge; no
/// direct connection between 0 and 2.
pub fn generate_asymmetric_triangle() -> MetaGraph {
    let mut g = MetaGraph::with_node_count(3);
    g.add_edge(edge!(0 => 1, 1.0, 10.0));
    g.add_edge(edge!(1 => 2, 1.0, 10.0));
    g
}

/// Fully connected triangle with symmetric unit weights.
pub fn generate_triangle() -> MetaGraph {
    let mut g = MetaGraph::with_node_count(3);
    g.add_edge(edge!(0, 1, 1.0));
    g.add_edge(edge!(1, 2, 1.0));
    g.add_edge(edge!(0, 2, 1.0));
    g
}

/// Mixed one-way/two-way graph. The edge between 1 and 3 is two-way with
/// asymmetric metrics.
///
/// ```text
/// 0 <-> 1 --> 2
/// ^     |     |
/// |     |     v
/// 4 <-- 3 <-> 5
/// ```
pub fn generate_simple_graph() -> MetaGraph {
    let mut g = MetaGraph::with_node_count(6);

    g.add_edge(edge!(0, 1, 2.0));
    g.add_edge(edge!(1 => 2, 1.0));
    g.add_edge(edge!(1 => 3, 1.0, 4.0));
    g.add_edge(edge!(2 => 5, 3.0));
    g.add_edge(edge!(3, 5, 1.0));
    g.add_edge(edge!(3 => 4, 2.0));
    g.add_edge(edge!(4 => 0, 1.0));

    g
}

/// Symmetric road-network-like mesh over twelve vertices: an outer ring
/// with a handful of chords crossing it.
pub fn generate_complex_graph() -> MetaGraph {
    let mut g = MetaGraph::with_node_count(12);

    let ring = [4.0, 2.0, 3.0, 1.0, 5.0, 2.0, 2.0, 4.0, 1.0, 3.0, 2.0, 6.0];
    for (i, weight) in ring.into_iter().enumerate() {
        g.add_edge(edge!(node_index(i), node_index((i + 1) % 12), weight));
    }

    g.add_edge(edge!(0, 6, 7.0));
    g.add_edge(edge!(1, 5, 4.0));
    g.add_edge(edge!(2, 9, 5.0));
    g.add_edge(edge!(3, 7, 3.0));
    g.add_edge(edge!(4, 10, 6.0));
    g.add_edge(edge!(8, 11, 2.0));

    g
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_have_the_expected_shape() {
        assert_eq!(generate_line_graph(5).node_count(), 5);
        assert_eq!(generate_one_way_chain().node_count(), 4);
        assert_eq!(generate_asymmetric_triangle().node_count(), 3);
        assert_eq!(generate_triangle().node_count(), 3);
        assert_eq!(generate_simple_graph().node_count(), 6);
        assert_eq!(generate_complex_graph().node_count(), 12);
    }
}
