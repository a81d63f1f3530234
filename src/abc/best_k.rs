//! Bounded retention of the K best-fitting simulations.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::sample::SimulationResult;

struct Ranked {
    result: SimulationResult,
    seq: u64,
}

impl Ranked {
    fn key_cmp(&self, other: &Self) -> Ordering {
        self.result
            .distance
            .total_cmp(&other.result.distance)
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.key_cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key_cmp(other)
    }
}

/// The `capacity` smallest-distance results seen so far.
///
/// Max-heap on `(distance, observation order)`: the root is the current
/// worst member, and among equal distances the latest arrival counts as
/// worse, so earlier observations win ties.
pub struct BestKSet {
    capacity: usize,
    heap: BinaryHeap<Ranked>,
    observed: u64,
}

impl BestKSet {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            heap: BinaryHeap::with_capacity(capacity),
            observed: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Current worst retained result, if any.
    pub fn worst(&self) -> Option<&SimulationResult> {
        self.heap.peek().map(|ranked| &ranked.result)
    }

    /// Offer a result. Returns true if it was retained.
    ///
    /// Below capacity everything is kept; at capacity the worst member is
    /// replaced only by a strictly smaller distance.
    pub fn offer(&mut self, result: SimulationResult) -> bool {
        let seq = self.observed;
        self.observed += 1;

        if self.heap.len() < self.capacity {
            self.heap.push(Ranked { result, seq });
            return true;
        }

        match self.heap.peek_mut() {
            Some(mut worst) if result.distance < worst.result.distance => {
                *worst = Ranked { result, seq };
                true
            }
            _ => false,
        }
    }

    /// Retained results, ascending by distance, ties in arrival order.
    pub fn into_sorted_vec(self) -> Vec<SimulationResult> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|ranked| ranked.result)
            .collect()
    }
}
