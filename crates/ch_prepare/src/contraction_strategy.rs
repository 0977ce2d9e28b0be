//! Module to choose a strategy for the vertex contraction process.
//!
//! # Examples
//! ```
//! use ch_prepare::prelude::*;
//!
//! // Use a fixed order for contraction
//! let contraction_strategy = ContractionStrategy::FixedOrder(&[node_index(0), node_index(1)]);
//!
//! // Let the lazy priority queue decide the order
//! let contraction_strategy = ContractionStrategy::LazyUpdate;
//! ```
use crate::graph::NodeIndex;

/// Strategy which is used while contracting vertices.
#[derive(Clone, Copy, Debug)]
pub enum ContractionStrategy<'a> {
    /// Vertices are contracted in the `exact` order of the given slice.
    FixedOrder(&'a [NodeIndex]),
    /// The order is maintained by the lazy priority queue: popped vertices
    /// are re-evaluated and pushed back when their stored priority went
    /// stale, and the queue is rebuilt after a full window of misses.
    LazyUpdate,
}

impl Default for ContractionStrategy<'_> {
    fn default() -> Self {
        Self::LazyUpdate
    }
}
