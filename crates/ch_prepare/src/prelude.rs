//! Re-exports of the most commonly used items in `ch_prepare`.
pub use crate::contraction_params::ContractionParams;
pub use crate::contraction_params::PriorityParams;
pub use crate::contraction_strategy::ContractionStrategy;
pub use crate::hierarchy_builder::HierarchyBuilder;

pub use crate::graph::node_index;
pub use crate::graph::DualWeight;
pub use crate::graph::EdgeDirection;
pub use crate::graph::MetaGraph;
pub use crate::graph::NodeIndex;
pub use crate::weighting::DualWeightHandler;
pub use crate::weighting::WeightHandler;
pub use crate::util::test_graphs::generate_simple_graph;
