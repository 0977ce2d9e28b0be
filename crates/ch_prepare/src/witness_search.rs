//! Bounded local searches that feed the witness graph. From a source vertex
//! a forward and a reverse Dijkstra run over the uncontracted part of the
//! graph, at most two hops deep, and report the best distances found.
use std::collections::BinaryHeap;

use rustc_hash::{FxHashMap, FxHashSet};

use crate::{
    constants::{Weight, WITNESS_HOP_LIMIT},
    graph::{MetaGraph, NodeIndex},
};

#[derive(Debug)]
struct Candidate {
    node: NodeIndex,
    weight: Weight,
    hops: usize,
}

impl Candidate {
    fn new(node: NodeIndex, weight: Weight, hops: usize) -> Self {
        Self { node, weight, hops }
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        other.weight.partial_cmp(&self.weight)
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        other.weight == self.weight
    }
}

impl Eq for Candidate {}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        other
            .weight
            .partial_cmp(&self.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
    }
}

pub(crate) struct WitnessSearch<'a> {
    g: &'a MetaGraph,
    contracted: &'a [bool],
}

impl<'a> WitnessSearch<'a> {
    pub(crate) fn new(g: &'a MetaGraph, contracted: &'a [bool]) -> Self {
        Self { g, contracted }
    }

    /// Runs the bounded searches from `source` and calls
    /// `emit(source, t, forward, backward)` once per settled vertex `t`.
    /// `forward` is the best distance `source -> t`, `backward` the best
    /// distance `t -> source`; a direction without a path within the hop
    /// bound reports infinity.
    ///
    /// With a target set the searches stop as soon as every reachable target
    /// is settled.
    pub(crate) fn search<F>(
        &self,
        source: NodeIndex,
        targets: Option<&FxHashSet<NodeIndex>>,
        mut emit: F,
    ) where
        F: FnMut(NodeIndex, NodeIndex, Weight, Weight),
    {
        let forward = self.bounded_dijkstra(source, targets, true);
        let backward = self.bounded_dijkstra(source, targets, false);

        for (&t, &f) in &forward {
            if t == source {
                continue;
            }
            let b = backward.get(&t).copied().unwrap_or(Weight::INFINITY);
            emit(source, t, f, b);
        }
        for (&t, &b) in &backward {
            if t == source || forward.contains_key(&t) {
                continue;
            }
            emit(source, t, Weight::INFINITY, b);
        }
    }

    /// Distances of all vertices settled within the hop bound. The reverse
    /// run relaxes the backward components of the same adjacency lists,
    /// which the mirrored storage makes equivalent to searching against the
    /// edge directions.
    fn bounded_dijkstra(
        &self,
        source: NodeIndex,
        targets: Option<&FxHashSet<NodeIndex>>,
        forward: bool,
    ) -> FxHashMap<NodeIndex, Weight> {
        let mut settled: FxHashMap<NodeIndex, Weight> = FxHashMap::default();
        let mut dist: FxHashMap<NodeIndex, Weight> = FxHashMap::default();
        let mut queue = BinaryHeap::new();
        let mut targets_settled = 0;

        dist.insert(source, 0.0);
        queue.push(Candidate::new(source, 0.0, 0));

        while let Some(Candidate { node, weight, hops }) = queue.pop() {
            if settled.contains_key(&node) {
                continue;
            }
            settled.insert(node, weight);

            if let Some(targets) = targets {
                if targets.contains(&node) {
                    targets_settled += 1;
                    if targets_settled == targets.len() {
                        break;
                    }
                }
            }

            if hops >= WITNESS_HOP_LIMIT {
                continue;
            }

            for edge in self.g.edges_of(node) {
                let next = edge.target;
                if next == node || self.contracted[next.index()] {
                    continue;
                }
                let step = if forward {
                    if !edge.direction.allows_forward() {
                        continue;
                    }
                    edge.weight.forward
                } else {
                    if !edge.direction.allows_backward() {
                        continue;
                    }
                    edge.weight.backward
                };
                if !step.is_finite() {
                    continue;
                }

                let new_distance = weight + step;
                if new_distance < *dist.get(&next).unwrap_or(&Weight::INFINITY)
                    && !settled.contains_key(&next)
                {
                    dist.insert(next, new_distance);
                    queue.push(Candidate::new(next, new_distance, hops + 1));
                }
            }
        }

        settled
    }
}
