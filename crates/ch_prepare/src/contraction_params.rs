//! Parameters for the contraction algorithm
use crate::constants::{Weight, WEIGHT_TOLERANCE};

/// Parameters for the contraction algorithm
#[derive(Debug, Clone, Copy)]
pub struct ContractionParams {
    pub(crate) priority_params: PriorityParams,
    // Consecutive queue misses tolerated before the queue is rebuilt
    pub(crate) queue_miss_window: usize,
    // Absolute tolerance for treating two weights as equal
    pub(crate) weight_tolerance: Weight,
}

impl ContractionParams {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn priority_params(mut self, params: PriorityParams) -> Self {
        self.priority_params = params;
        self
    }

    pub fn queue_miss_window(mut self, window: usize) -> Self {
        self.queue_miss_window = window;
        self
    }

    pub fn weight_tolerance(mut self, tolerance: Weight) -> Self {
        self.weight_tolerance = tolerance;
        self
    }
}

impl Default for ContractionParams {
    fn default() -> Self {
        ContractionParams {
            priority_params: Default::default(),
            queue_miss_window: 80,
            weight_tolerance: WEIGHT_TOLERANCE,
        }
    }
}

/// Coefficients for the priority function
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityParams {
    pub difference_coeff: Weight,
    pub depth_coeff: Weight,
    pub contracted_neighbors_coeff: Weight,
}

impl PriorityParams {
    pub fn new(
        difference_coeff: Weight,
        depth_coeff: Weight,
        contracted_neighbors_coeff: Weight,
    ) -> Self {
        PriorityParams {
            difference_coeff,
            depth_coeff,
            contracted_neighbors_coeff,
        }
    }

    pub fn difference_coeff(mut self, coeff: Weight) -> Self {
        self.difference_coeff = coeff;
        self
    }

    pub fn depth_coeff(mut self, coeff: Weight) -> Self {
        self.depth_coeff = coeff;
        self
    }

    pub fn contracted_neighbors_coeff(mut self, coeff: Weight) -> Self {
        self.contracted_neighbors_coeff = coeff;
        self
    }
}

impl Default for PriorityParams {
    fn default() -> Self {
        PriorityParams {
            difference_coeff: 5.0,
            depth_coeff: 5.0,
            contracted_neighbors_coeff: 5.0,
        }
    }
}
