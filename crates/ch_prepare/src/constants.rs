/// Edge weight type
pub type Weight = f64;

/// Absolute tolerance below which two weights count as equal. A shortcut
/// whose forward and backward metric differ by less than this is stored as a
/// single bidirectional edge.
pub const WEIGHT_TOLERANCE: Weight = 0.1;

/// Hop bound of the neighbour witness search: a vertex, its neighbours and
/// their neighbours.
pub(crate) const WITNESS_HOP_LIMIT: usize = 2;
