//! Brute-force k-nearest-neighbor baseline and shared ranking primitives.
//!
//! The exact scan serves two roles: ground truth when measuring the recall
//! of the approximate indexes, and the nearest-existing-centroid primitive
//! inside ++ seeding. Both approximate indexes also reuse [`TopK`] to keep
//! a bounded best-so-far set while scanning buckets.

use std::collections::BinaryHeap;

use crate::dataset::Dataset;
use crate::distance::l1_distance;

/// One search result: a dataset index and its exact L1 distance to the query.
///
/// Results are plain values; a query that finds fewer than the requested
/// number of neighbors returns a shorter vector rather than padding with
/// sentinels, so a zero distance always means a genuine exact match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbor {
    pub index: usize,
    pub distance: u32,
}

impl Ord for Neighbor {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Max-heap by distance so TopK can evict its current worst.
        self.distance
            .cmp(&other.distance)
            .then(self.index.cmp(&other.index))
    }
}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Bounded best-k accumulator over a stream of candidates.
///
/// Keeps the k smallest distances seen so far; `push` is O(log k) and a
/// candidate worse than the current worst is rejected without allocation.
#[derive(Debug)]
pub struct TopK {
    k: usize,
    heap: BinaryHeap<Neighbor>,
}

impl TopK {
    #[must_use]
    pub fn new(k: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::with_capacity(k + 1),
        }
    }

    pub fn push(&mut self, candidate: Neighbor) {
        if self.k == 0 {
            return;
        }
        if self.heap.len() < self.k {
            self.heap.push(candidate);
        } else if let Some(worst) = self.heap.peek() {
            if candidate.distance < worst.distance {
                self.heap.pop();
                self.heap.push(candidate);
            }
        }
    }

    /// Drain into a vector sorted by ascending distance.
    #[must_use]
    pub fn into_sorted(self) -> Vec<Neighbor> {
        let mut out = self.heap.into_vec();
        out.sort_unstable();
        out
    }
}

/// Exact k-nearest neighbors of `query` by full linear scan.
///
/// Returns `min(k, n)` results in ascending distance order. O(n * dim) per
/// call plus the partial sort.
#[must_use]
pub fn k_nearest(dataset: &Dataset, query: &[u8], k: usize) -> Vec<Neighbor> {
    let mut all: Vec<Neighbor> = dataset
        .iter()
        .enumerate()
        .map(|(index, v)| Neighbor {
            index,
            distance: l1_distance(v, query),
        })
        .collect();

    let k = k.min(all.len());
    if k == 0 {
        return Vec::new();
    }
    if k < all.len() {
        all.select_nth_unstable(k - 1);
        all.truncate(k);
    }
    all.sort_unstable();
    all
}

/// Index and distance of the centroid closest to `query`.
///
/// # Panics
///
/// Panics if `centroids` is empty.
#[must_use]
pub fn nearest_among(centroids: &[Vec<u8>], query: &[u8]) -> (usize, u32) {
    centroids
        .iter()
        .enumerate()
        .map(|(i, c)| (i, l1_distance(c, query)))
        .min_by_key(|&(_, d)| d)
        .expect("nearest_among requires at least one centroid")
}
