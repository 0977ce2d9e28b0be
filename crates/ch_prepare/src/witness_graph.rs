//! Witness graph module. A flat directed graph with one scalar weight per
//! vertex pair, fed by the neighbour witness searches and consulted to
//! certify that a candidate shortcut is redundant.
use crate::constants::Weight;
use crate::graph::NodeIndex;

#[derive(Debug, Clone, Copy)]
pub(crate) struct WitnessEdge {
    pub source: NodeIndex,
    pub target: NodeIndex,
    pub weight: Weight,
}

/// Directed single-weight graph over the same vertex ids as the routing
/// graph. Records live in an arena indexed by per-vertex adjacency lists;
/// removal drops the list entries and leaves the arena slot dead until
/// [`compress`] rebuilds the storage.
///
/// The vertex set is allowed to lag behind the routing graph's: a pair
/// without a record simply has weight infinity.
///
/// [`compress`]: WitnessGraph::compress
#[derive(Debug, Default)]
pub struct WitnessGraph {
    edges: Vec<WitnessEdge>,
    edges_out: Vec<Vec<usize>>,
    edges_in: Vec<Vec<usize>>,
    num_dead: usize,
}

impl WitnessGraph {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_node_count(num_nodes: usize) -> Self {
        WitnessGraph {
            edges: Vec::new(),
            edges_out: vec![Vec::new(); num_nodes],
            edges_in: vec![Vec::new(); num_nodes],
            num_dead: 0,
        }
    }

    fn ensure_node(&mut self, v: NodeIndex) {
        let len = v.index() + 1;
        if self.edges_out.len() < len {
            self.edges_out.resize_with(len, Vec::new);
            self.edges_in.resize_with(len, Vec::new);
        }
    }

    /// Inserts the record `u -> v` or lowers an existing one. The smaller
    /// weight always wins.
    pub fn add_or_update_edge(&mut self, u: NodeIndex, v: NodeIndex, weight: Weight) {
        self.ensure_node(u);
        self.ensure_node(v);

        let edges = &self.edges;
        if let Some(&idx) = self.edges_out[u.index()]
            .iter()
            .find(|&&i| edges[i].target == v)
        {
            if self.edges[idx].weight > weight {
                self.edges[idx].weight = weight;
            }
            return;
        }

        let idx = self.edges.len();
        self.edges.push(WitnessEdge {
            source: u,
            target: v,
            weight,
        });
        self.edges_out[u.index()].push(idx);
        self.edges_in[v.index()].push(idx);
    }

    /// Weight of the record `u -> v`, infinity when there is none.
    pub fn weight(&self, u: NodeIndex, v: NodeIndex) -> Weight {
        match self.edges_out.get(u.index()) {
            Some(list) => list
                .iter()
                .find(|&&i| self.edges[i].target == v)
                .map(|&i| self.edges[i].weight)
                .unwrap_or(Weight::INFINITY),
            None => Weight::INFINITY,
        }
    }

    /// Removes the record `u -> v`.
    pub fn remove_edge(&mut self, u: NodeIndex, v: NodeIndex) {
        if u.index() >= self.edges_out.len() || v.index() >= self.edges_in.len() {
            return;
        }
        let edges = &self.edges;
        let removed: Vec<usize> = self.edges_out[u.index()]
            .iter()
            .copied()
            .filter(|&i| edges[i].target == v)
            .collect();
        if removed.is_empty() {
            return;
        }
        self.edges_out[u.index()].retain(|i| !removed.contains(i));
        self.edges_in[v.index()].retain(|i| !removed.contains(i));
        self.num_dead += removed.len();
    }

    /// Removes every record incident to `v`, in both directions.
    pub fn remove_edges(&mut self, v: NodeIndex) {
        if v.index() >= self.edges_out.len() {
            return;
        }
        let outgoing = std::mem::take(&mut self.edges_out[v.index()]);
        for &i in &outgoing {
            let target = self.edges[i].target;
            self.edges_in[target.index()].retain(|&j| j != i);
        }
        let incoming = std::mem::take(&mut self.edges_in[v.index()]);
        for &i in &incoming {
            let source = self.edges[i].source;
            self.edges_out[source.index()].retain(|&j| j != i);
        }
        self.num_dead += outgoing.len() + incoming.len();
    }

    /// Number of live records.
    pub fn edge_count(&self) -> usize {
        self.edges.len() - self.num_dead
    }

    /// Arena slots in use, dead ones included.
    pub fn edge_space(&self) -> usize {
        self.edges.len()
    }

    pub fn node_count(&self) -> usize {
        self.edges_out.len()
    }

    /// Rebuilds the arena without dead slots. A no-op until the arena has
    /// grown past four times the live record count.
    pub fn compress(&mut self) {
        if self.edge_space() <= 4 * self.edge_count() {
            return;
        }
        let mut edges = Vec::with_capacity(self.edge_count());
        let mut edges_out = vec![Vec::new(); self.edges_out.len()];
        let mut edges_in = vec![Vec::new(); self.edges_in.len()];
        for list in &self.edges_out {
            for &i in list {
                let e = self.edges[i];
                let idx = edges.len();
                edges.push(e);
                edges_out[e.source.index()].push(idx);
                edges_in[e.target.index()].push(idx);
            }
        }
        self.edges = edges;
        self.edges_out = edges_out;
        self.edges_in = edges_in;
        self.num_dead = 0;
    }

    /// Iterator over the live records.
    pub(crate) fn edges(&self) -> impl Iterator<Item = &WitnessEdge> {
        self.edges_out
            .iter()
            .flatten()
            .map(move |&i| &self.edges[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::node_index;

    #[test]
    fn smaller_weight_wins() {
        let mut w = WitnessGraph::new();
        let a = node_index(0);
        let b = node_index(1);

        w.add_or_update_edge(a, b, 3.0);
        w.add_or_update_edge(a, b, 5.0);
        assert_eq!(w.weight(a, b), 3.0);

        w.add_or_update_edge(a, b, 1.0);
        assert_eq!(w.weight(a, b), 1.0);
        assert_eq!(w.edge_count(), 1);
    }

    #[test]
    fn missing_records_are_infinite() {
        let w = WitnessGraph::with_node_count(2);
        assert!(w.weight(node_index(0), node_index(1)).is_infinite());
        // The vertex set may lag behind the routing graph.
        assert!(w.weight(node_index(17), node_index(3)).is_infinite());
    }

    #[test]
    fn vertex_set_grows_on_demand() {
        let mut w = WitnessGraph::new();
        w.add_or_update_edge(node_index(5), node_index(2), 1.5);

        assert_eq!(w.node_count(), 6);
        assert_eq!(w.weight(node_index(5), node_index(2)), 1.5);
    }

    #[test]
    fn remove_edge_is_directional() {
        let mut w = WitnessGraph::new();
        let a = node_index(0);
        let b = node_index(1);
        w.add_or_update_edge(a, b, 1.0);
        w.add_or_update_edge(b, a, 2.0);

        w.remove_edge(a, b);

        assert!(w.weight(a, b).is_infinite());
        assert_eq!(w.weight(b, a), 2.0);
        assert_eq!(w.edge_count(), 1);
        assert_eq!(w.edge_space(), 2);
    }

    #[test]
    fn remove_edges_clears_both_directions() {
        let mut w = WitnessGraph::new();
        let (a, b, c) = (node_index(0), node_index(1), node_index(2));
        w.add_or_update_edge(a, b, 1.0);
        w.add_or_update_edge(b, c, 1.0);
        w.add_or_update_edge(c, b, 1.0);
        w.add_or_update_edge(a, c, 4.0);

        w.remove_edges(b);

        assert!(w.weight(a, b).is_infinite());
        assert!(w.weight(b, c).is_infinite());
        assert!(w.weight(c, b).is_infinite());
        assert_eq!(w.weight(a, c), 4.0);
        assert_eq!(w.edge_count(), 1);
    }

    #[test]
    fn compress_reclaims_dead_slots() {
        let mut w = WitnessGraph::new();
        for i in 0..10 {
            w.add_or_update_edge(node_index(i), node_index(i + 1), i as f64 + 1.0);
        }
        for i in 1..10 {
            w.remove_edge(node_index(i), node_index(i + 1));
        }
        assert_eq!(w.edge_count(), 1);
        assert_eq!(w.edge_space(), 10);

        w.compress();

        assert_eq!(w.edge_count(), 1);
        assert_eq!(w.edge_space(), 1);
        assert_eq!(w.weight(node_index(0), node_index(1)), 1.0);
    }

    #[test]
    fn compress_is_a_noop_while_dense() {
        let mut w = WitnessGraph::new();
        for i in 0..4 {
            w.add_or_update_edge(node_index(i), node_index(i + 1), 1.0);
        }
        w.remove_edge(node_index(0), node_index(1));

        w.compress();

        // 4 slots, 3 live records: under the 4x threshold.
        assert_eq!(w.edge_space(), 4);
        assert_eq!(w.edge_count(), 3);
    }
}
