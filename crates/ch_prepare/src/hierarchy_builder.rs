//! Module to build a contraction hierarchy on a [`MetaGraph`].
//!
//! Vertices are contracted one by one in the order of a heuristic priority.
//! Contracting a vertex removes the edges its neighbours hold towards it and
//! inserts witness-pruned shortcuts between the neighbours, so that all
//! distances between uncontracted vertices survive. The records a vertex
//! keeps after its contraction point at later-contracted vertices only; they
//! form the upward graph a bidirectional query search runs on.
//!
//! # Examples
//! ```
//! use ch_prepare::hierarchy_builder::HierarchyBuilder;
//! use ch_prepare::util::test_graphs::generate_simple_graph;
//!
//! // Create a new graph
//! let mut g = generate_simple_graph();
//!
//! // Run the contraction
//! let mut builder = HierarchyBuilder::new(&mut g);
//! builder.run();
//! ```
//! [`MetaGraph`]: crate::graph::MetaGraph
use std::fmt::Write;

use anyhow::{ensure, Result};
use indicatif::{ProgressBar, ProgressState, ProgressStyle};
use log::{debug, info};
use rustc_hash::FxHashSet;

use crate::{
    contraction_params::ContractionParams,
    contraction_strategy::ContractionStrategy,
    graph::{node_index, DualWeight, Edge, EdgeDirection, MetaGraph, NodeIndex},
    lazy_queue::LazyQueue,
    statistics::ConstructionStats,
    vertex_info::{Shortcut, VertexInfo},
    weighting::{DualWeightHandler, WeightHandler},
    witness_graph::WitnessGraph,
    witness_search::WitnessSearch,
};

const STEP_SIZE: f64 = 5.0;

/// Builds the contraction hierarchy in place on a borrowed graph.
///
/// The builder owns every piece of mutable state of the algorithm: the
/// witness graph, the contracted flags, the depth and contracted-neighbour
/// bookkeeping, the lazy queue and the deferred witness-refresh set. The
/// helper searches borrow parts of it for the duration of one call.
pub struct HierarchyBuilder<'a, H = DualWeightHandler> {
    g: &'a mut MetaGraph,
    handler: H,
    witness: WitnessGraph,
    contracted: Vec<bool>,
    depth: Vec<usize>,
    contracted_neighbors: Vec<usize>,
    refresh: FxHashSet<NodeIndex>,
    queue: LazyQueue,
    ranks: Vec<usize>,
    num_nodes: usize,
    num_contracted: usize,
    params: ContractionParams,
    stats: ConstructionStats,
}

impl<'a> HierarchyBuilder<'a, DualWeightHandler> {
    pub fn new(g: &'a mut MetaGraph) -> Self {
        Self::with_parts(g, DualWeightHandler, ContractionParams::default())
    }

    pub fn new_with_params(g: &'a mut MetaGraph, params: ContractionParams) -> Self {
        Self::with_parts(g, DualWeightHandler, params)
    }
}

impl<'a, H: WeightHandler> HierarchyBuilder<'a, H> {
    /// Creates a builder with a custom weight handler. Fails when the
    /// handler cannot operate on the given graph.
    pub fn with_handler(g: &'a mut MetaGraph, handler: H) -> Result<Self> {
        Self::with_handler_and_params(g, handler, ContractionParams::default())
    }

    pub fn with_handler_and_params(
        g: &'a mut MetaGraph,
        handler: H,
        params: ContractionParams,
    ) -> Result<Self> {
        ensure!(
            handler.supports(g),
            "weight handler does not support the given graph"
        );
        Ok(Self::with_parts(g, handler, params))
    }

    fn with_parts(g: &'a mut MetaGraph, handler: H, params: ContractionParams) -> Self {
        let num_nodes = g.node_count();
        HierarchyBuilder {
            g,
            handler,
            witness: WitnessGraph::with_node_count(num_nodes),
            contracted: vec![false; num_nodes],
            depth: vec![0; num_nodes],
            contracted_neighbors: vec![0; num_nodes],
            refresh: FxHashSet::default(),
            queue: LazyQueue::new(params.queue_miss_window),
            ranks: vec![0; num_nodes],
            num_nodes,
            num_contracted: 0,
            params,
            stats: ConstructionStats::default(),
        }
    }

    pub fn stats(&self) -> ConstructionStats {
        self.stats
    }

    pub fn is_contracted(&self, v: NodeIndex) -> bool {
        self.contracted[v.index()]
    }

    /// Position of `v` in the contraction order, starting at 1. Zero for a
    /// vertex that has not been contracted.
    pub fn contraction_rank(&self, v: NodeIndex) -> usize {
        self.ranks[v.index()]
    }

    pub fn run(&mut self) {
        self.run_with_strategy(ContractionStrategy::default())
    }

    pub fn run_with_order(&mut self, order: &[NodeIndex]) {
        self.run_with_strategy(ContractionStrategy::FixedOrder(order))
    }

    pub fn run_with_strategy(&mut self, strategy: ContractionStrategy) {
        info!("BEGIN building hierarchy");
        self.stats.init();

        self.build_witness_graph();
        self.stats.stop_timer_witness();

        match strategy {
            ContractionStrategy::FixedOrder(order) => self.contract_in_order(order),
            ContractionStrategy::LazyUpdate => self.contract_by_priority(),
        }

        // Refresh work deferred past the last contraction.
        self.drain_witness_refresh();
        info!("{}", self.stats);
    }

    /// Seeds the witness graph with a bounded search from every vertex.
    fn build_witness_graph(&mut self) {
        info!("Seeding witness graph from {} vertices", self.num_nodes);
        for v in 0..self.num_nodes {
            let v = node_index(v);
            let (g, contracted, witness) = (&*self.g, &self.contracted, &mut self.witness);
            let search = WitnessSearch::new(g, contracted);
            search.search(v, None, |s, t, forward, backward| {
                if forward.is_finite() {
                    witness.add_or_update_edge(s, t, forward);
                }
                if backward.is_finite() {
                    witness.add_or_update_edge(t, s, backward);
                }
            });
        }
    }

    fn contract_by_priority(&mut self) {
        info!("Calculating initial vertex order...");
        self.calculate_queue();
        self.stats.stop_timer_node_ordering();

        let pb = Self::progress_bar(self.num_nodes as u64);
        let mut step_size = STEP_SIZE;
        let mut next_goal = step_size;

        loop {
            while let Some(entry) = self.queue.pop(&self.contracted) {
                let info = self.vertex_info(entry.node);
                let priority = info.priority(&self.params.priority_params);

                if priority != entry.priority {
                    // Stored priority went stale since the last evaluation.
                    self.queue.push(entry.node, priority);
                    if self.queue.record_miss() {
                        info!("Queue miss window saturated, recalculating queue");
                        self.calculate_queue();
                    }
                    continue;
                }
                self.queue.record_hit();

                debug!(
                    "=> Contracting vertex: {} (priority {})",
                    entry.node.index(),
                    priority
                );
                self.contract_vertex(&info);
                pb.inc(1);

                let progress = self.num_contracted as f64 / self.num_nodes as f64;
                if progress * 100.0 >= next_goal {
                    info!(
                        "Progress: {:.2}%, Shortcuts: {}",
                        progress * 100.0,
                        self.stats.shortcuts_added
                    );
                    if progress * 100.0 >= 95.0 {
                        step_size = 0.5;
                    }
                    next_goal += step_size;
                }
            }

            if self.contracted.iter().all(|&c| c) {
                break;
            }
            // Entries can go stale faster than they are consumed; rebuild
            // the queue for the stragglers.
            self.calculate_queue();
        }

        pb.finish_with_message("Done contracting vertices");
        self.stats.stop_timer_construction();
    }

    fn contract_in_order(&mut self, order: &[NodeIndex]) {
        self.stats.stop_timer_node_ordering();
        let pb = Self::progress_bar(order.len() as u64);
        for &node in order {
            debug_assert!(
                !self.contracted[node.index()],
                "fixed order contracts a vertex twice"
            );
            debug!("=> Contracting vertex: {}", node.index());
            let info = self.vertex_info(node);
            self.contract_vertex(&info);
            pb.inc(1);
        }
        pb.finish_with_message("Done contracting vertices");
        self.stats.stop_timer_construction();
    }

    /// Evaluates one vertex: neighbour weights, witness-pruned shortcut set
    /// and the snapshots the priority terms need.
    pub(crate) fn vertex_info(&mut self, node: NodeIndex) -> VertexInfo {
        debug_assert!(!self.contracted[node.index()]);
        let mut info = VertexInfo::new(
            node,
            self.depth[node.index()],
            self.contracted_neighbors[node.index()],
            self.neighbors(node),
        );

        // Deferred witness refreshes are drained once enough of the
        // candidate's neighbourhood is affected by them.
        if !self.refresh.is_empty() {
            let pending = info
                .relevant_edges
                .iter()
                .filter(|e| self.refresh.contains(&e.node))
                .count();
            if pending >= 2 {
                self.drain_witness_refresh();
            }
        }

        if info.remove_shortcuts(&self.witness, self.params.weight_tolerance) {
            self.stats.witness_prunes += 1;
        }
        info
    }

    /// Re-evaluates every uncontracted vertex and rebuilds the queue from
    /// scratch. Used for the initial order and whenever the miss window
    /// saturates.
    fn calculate_queue(&mut self) {
        self.queue.clear();
        for v in 0..self.num_nodes {
            if self.contracted[v] {
                continue;
            }
            let v = node_index(v);
            let info = self.vertex_info(v);
            let priority = info.priority(&self.params.priority_params);
            self.queue.push(v, priority);
        }
        self.stats.queue_rebuilds += 1;
    }

    /// Removes the downward edges of `v`, inserts the surviving shortcuts
    /// between its neighbours and updates the neighbour bookkeeping.
    fn contract_vertex(&mut self, info: &VertexInfo) {
        let v = info.vertex;
        debug_assert!(!self.contracted[v.index()]);

        // Downward removal: the neighbours lose their records into v. The
        // mirrored records v itself holds stay in place as the upward edges
        // of the final hierarchy; every enumeration filters contracted
        // endpoints, so the algorithm never sees them again.
        for neighbor in &info.relevant_edges {
            self.g.remove_edge(neighbor.node, v);
        }

        for shortcut in &info.shortcuts {
            self.insert_shortcut(shortcut, v);
        }

        self.contracted[v.index()] = true;
        self.num_contracted += 1;
        self.ranks[v.index()] = self.num_contracted;

        for neighbor in &info.relevant_edges {
            let n = neighbor.node.index();
            self.depth[n] = self.depth[n].max(self.depth[v.index()] + 1);
            self.contracted_neighbors[n] += 1;
            self.witness.remove_edge(neighbor.node, v);
        }
        self.witness.remove_edges(v);
    }

    /// Materialises one surviving candidate as graph records: a single
    /// bidirectional pair when the two metrics agree within the tolerance,
    /// one directed pair per finite metric otherwise. Every record is
    /// mirrored on both endpoint orderings.
    fn insert_shortcut(&mut self, shortcut: &Shortcut, via: NodeIndex) {
        let (a, b) = (shortcut.source, shortcut.target);
        if a == b {
            // Parallel edges can degenerate into a self-loop candidate.
            return;
        }
        debug_assert!(!self.contracted[a.index()] && !self.contracted[b.index()]);

        let dual = DualWeight::new(shortcut.forward, shortcut.backward);
        let fm = self.handler.metric(dual, EdgeDirection::Forward);
        let bm = self.handler.metric(dual, EdgeDirection::Backward);

        if fm.is_finite()
            && bm.is_finite()
            && fm >= 0.0
            && bm >= 0.0
            && (fm - bm).abs() < self.params.weight_tolerance
        {
            if self.mirrored_insert(a, b, via, EdgeDirection::Both, dual) {
                self.stats.shortcuts_added += 1;
            }
        } else {
            if fm.is_finite()
                && fm >= 0.0
                && self.mirrored_insert(a, b, via, EdgeDirection::Forward, DualWeight::forward_only(fm))
            {
                self.stats.shortcuts_added += 1;
            }
            if bm.is_finite()
                && bm >= 0.0
                && self.mirrored_insert(a, b, via, EdgeDirection::Backward, DualWeight::backward_only(bm))
            {
                self.stats.shortcuts_added += 1;
            }
        }

        self.refresh.insert(a);
        self.refresh.insert(b);
    }

    fn mirrored_insert(
        &mut self,
        a: NodeIndex,
        b: NodeIndex,
        via: NodeIndex,
        direction: EdgeDirection,
        weight: DualWeight,
    ) -> bool {
        let changed = self
            .handler
            .add_or_update_edge(self.g, a, b, via, direction, weight);
        self.handler
            .add_or_update_edge(self.g, b, a, via, direction.reversed(), weight.reversed());
        changed
    }

    /// Runs the witness calculator from every vertex of the refresh set,
    /// restricted to the set as targets, then compacts the witness graph if
    /// it has grown sparse.
    pub(crate) fn drain_witness_refresh(&mut self) {
        if self.refresh.is_empty() {
            return;
        }
        debug!("Refreshing witnesses around {} vertices", self.refresh.len());
        let refresh = std::mem::take(&mut self.refresh);
        {
            let (g, contracted, witness) = (&*self.g, &self.contracted, &mut self.witness);
            let search = WitnessSearch::new(g, contracted);
            for &u in &refresh {
                if contracted[u.index()] {
                    continue;
                }
                search.search(u, Some(&refresh), |s, t, forward, backward| {
                    if forward.is_finite() {
                        witness.add_or_update_edge(s, t, forward);
                    }
                    if backward.is_finite() {
                        witness.add_or_update_edge(t, s, backward);
                    }
                });
            }
        }
        self.stats.witness_refreshes += 1;
        self.witness.compress();
    }

    /// Records of `v` whose other endpoint is still uncontracted.
    pub(crate) fn neighbors(&self, v: NodeIndex) -> impl Iterator<Item = &Edge> {
        self.g
            .edges_of(v)
            .iter()
            .filter(move |e| e.target != v && !self.contracted[e.target.index()])
    }

    fn progress_bar(len: u64) -> ProgressBar {
        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {human_pos}/{human_len} Vertices ({eta})",
            )
            .unwrap()
            .with_key("eta", |state: &ProgressState, w: &mut dyn Write| {
                write!(w, "{:.1}s", state.eta().as_secs_f64()).unwrap()
            })
            .progress_chars("#>-"),
        );
        pb
    }
}
