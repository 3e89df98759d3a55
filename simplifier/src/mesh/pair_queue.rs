use std::cmp;

use priority_queue::PriorityQueue;

use super::{
    pair::{PairID, VertexPair},
    vertex::VertID,
};

/// `f64` with a total order, so NaN costs sort instead of panicking.
#[derive(Debug, Clone, Copy)]
pub struct OrdF64(pub f64);

impl PartialEq for OrdF64 {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == cmp::Ordering::Equal
    }
}

impl Eq for OrdF64 {}

impl PartialOrd for OrdF64 {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrdF64 {
    fn cmp(&self, other: &Self) -> cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Reverses the ordering of a cost, such that we take min values from a priority queue.
/// Equal costs fall back to the pair's vertex indices, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PairCost(pub cmp::Reverse<(OrdF64, [VertID; 2])>);

impl PairCost {
    pub fn new(pair: &VertexPair) -> Self {
        PairCost(cmp::Reverse((OrdF64(pair.cost), pair.key())))
    }

    pub fn cost(&self) -> f64 {
        let cmp::Reverse((OrdF64(cost), _)) = self.0;
        cost
    }
}

/// Min-cost-first queue over the indices of a pair set.
#[derive(Clone, Default)]
pub struct PairQueue {
    queue: PriorityQueue<PairID, PairCost>,
}

impl PairQueue {
    pub fn new(pairs: &[VertexPair]) -> Self {
        let mut queue = Self::default();
        queue.rebuild(pairs);
        queue
    }

    /// Discard the queue and heapify every pair in `pairs`.
    pub fn rebuild(&mut self, pairs: &[VertexPair]) {
        self.queue = pairs
            .iter()
            .enumerate()
            .map(|(i, p)| (PairID(i), PairCost::new(p)))
            .collect();
    }

    pub fn pop_min(&mut self) -> Option<(PairID, f64)> {
        self.queue.pop().map(|(id, cost)| (id, cost.cost()))
    }

    pub fn peek_min(&self) -> Option<(PairID, f64)> {
        self.queue.peek().map(|(&id, cost)| (id, cost.cost()))
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn clear(&mut self) {
        self.queue.clear()
    }
}
