//! Statistics module. Used to collect various statistics.
use std::{
    fmt::Display,
    time::{Duration, Instant},
};

use histogram::Histogram;

use crate::graph::MetaGraph;

/// Collects statistics about the hierarchy construction.
#[derive(Debug, Clone, Copy)]
pub struct ConstructionStats {
    pub witness_time: Duration,
    pub node_ordering_time: Duration,
    pub contraction_time: Duration,
    pub total_time: Duration,
    pub shortcuts_added: usize,
    pub queue_rebuilds: usize,
    pub witness_refreshes: usize,
    pub witness_prunes: usize,
    timer: Instant,
}

impl Default for ConstructionStats {
    fn default() -> Self {
        ConstructionStats {
            witness_time: Duration::new(0, 0),
            node_ordering_time: Duration::new(0, 0),
            contraction_time: Duration::new(0, 0),
            total_time: Duration::new(0, 0),
            shortcuts_added: 0,
            queue_rebuilds: 0,
            witness_refreshes: 0,
            witness_prunes: 0,
            timer: Instant::now(),
        }
    }
}

impl Display for ConstructionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "---Construction Stats---")?;
        writeln!(f, "Witness seeding    : {:?}", self.witness_time)?;
        writeln!(f, "Vertex Ordering    : {:?}", self.node_ordering_time)?;
        writeln!(f, "Contraction        : {:?}", self.contraction_time)?;
        writeln!(f, "------------------------")?;
        writeln!(f, "Total time         : {:?}", self.total_time)?;
        writeln!(f, "Shortcuts added [#]: {}", self.shortcuts_added)?;
        writeln!(f, "Queue rebuilds  [#]: {}", self.queue_rebuilds)?;
        writeln!(f, "Refresh drains  [#]: {}", self.witness_refreshes)?;
        writeln!(f, "Witness prunes  [#]: {}", self.witness_prunes)
    }
}

impl ConstructionStats {
    pub(crate) fn init(&mut self) {
        self.timer = Instant::now();
        self.witness_time = Duration::new(0, 0);
        self.node_ordering_time = Duration::new(0, 0);
        self.contraction_time = Duration::new(0, 0);
        self.total_time = Duration::new(0, 0);
        self.shortcuts_added = 0;
        self.queue_rebuilds = 0;
        self.witness_refreshes = 0;
        self.witness_prunes = 0;
    }

    pub(crate) fn stop_timer_witness(&mut self) {
        self.witness_time = self.timer.elapsed();
        self.total_time += self.witness_time;
        self.timer = Instant::now();
    }

    pub(crate) fn stop_timer_node_ordering(&mut self) {
        self.node_ordering_time = self.timer.elapsed();
        self.total_time += self.node_ordering_time;
        self.timer = Instant::now();
    }

    pub(crate) fn stop_timer_construction(&mut self) {
        self.contraction_time = self.timer.elapsed();
        self.total_time += self.contraction_time;
        self.timer = Instant::now();
    }
}

/// Returns a histogram of the record-count distribution over the vertices.
pub fn degree_hist(g: &MetaGraph) -> Histogram {
    let hist = Histogram::new(0, 10, 30).unwrap();
    for node in 0..g.node_count() {
        let degree = g.edges_of(crate::graph::node_index(node)).len();
        hist.increment(degree as u64, 1).unwrap();
    }
    hist
}

/// Returns the average number of records per vertex.
pub fn average_degree(g: &MetaGraph) -> f64 {
    if g.node_count() == 0 {
        return 0.0;
    }
    g.edge_count() as f64 / g.node_count() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge;

    #[test]
    fn average_degree_counts_records() {
        let mut g = MetaGraph::with_node_count(3);
        g.add_edge(edge!(0, 1, 1.0));
        g.add_edge(edge!(1, 2, 1.0));

        // 4 records over 3 vertices
        assert!((average_degree(&g) - 4.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn average_degree_of_empty_graph_is_zero() {
        let g = MetaGraph::new();
        assert_eq!(average_degree(&g), 0.0);
    }

    #[test]
    fn degree_hist_works() {
        let mut g = MetaGraph::with_node_count(4);
        g.add_edge(edge!(0, 1, 1.0));
        g.add_edge(edge!(1, 2, 1.0));
        g.add_edge(edge!(1, 3, 1.0));

        let hist = degree_hist(&g);
        for bucket in hist.into_iter().filter(|b| b.count() > 0) {
            println!("[{}-{}]: {}", bucket.low(), bucket.high(), bucket.count());
        }
    }
}
