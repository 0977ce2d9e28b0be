//! Crate to preprocess dual-weighted routing graphs into contraction
//! hierarchies.
//!
//! The routing graph carries an independent forward and backward metric per
//! edge. Preprocessing assigns every vertex a position in a total order,
//! removes it from the live graph and patches the gap with witness-pruned
//! shortcut edges, so that shortest-path queries can later run a
//! bidirectional search over upward edges only.
//!
//! # Basic usage
//! ```
//! use ch_prepare::prelude::*;
//!
//! // Build a graph (normally done by the graph loader)
//! let mut g = generate_simple_graph();
//!
//! // Contract it in place
//! let mut builder = HierarchyBuilder::new(&mut g);
//! builder.run();
//!
//! println!("{}", builder.stats());
//! ```
pub mod constants;
pub mod contraction_params;
pub mod contraction_strategy;
pub mod graph;
pub mod hierarchy_builder;
pub(crate) mod lazy_queue;
pub mod prelude;
pub mod statistics;
pub mod util;
pub mod vertex_info;
pub mod weighting;
pub mod witness_graph;
pub(crate) mod witness_search;
