//! Random-hyperplane hypercube index.
//!
//! Projects every vector onto a d'-bit binary hypercube: one [`WindowHash`]
//! per cube axis, each followed by a memoized fair-coin fold from raw hash
//! value to a single bit. The d' bits, packed into a `u32`, name the vertex
//! (bucket) a point lives in.
//!
//! The coin memo is keyed *per raw hash value*, not per vector: two vectors
//! colliding on an axis hash must fold to the same bit, and a query arriving
//! after the build pass must see the same coins the training points saw.
//! Once tossed, a coin is fixed for the index's lifetime. Each axis owns its
//! own memo behind a mutex, so axes never contend with each other and
//! queries can extend the memos concurrently.
//!
//! Queries scan the query's own vertex first, then probe nearby vertices in
//! increasing Hamming distance ([`HammingProber`]) until the candidate or
//! probe budget runs out, or until the whole cube has been visited, in which
//! case whatever was found is returned.

mod prober;

pub use prober::HammingProber;

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::info;

use crate::config::CubeConfig;
use crate::dataset::Dataset;
use crate::distance::{l1_distance, mean_nearest_distance};
use crate::error::{Error, Result};
use crate::exact::{Neighbor, TopK};
use crate::hash::WindowHash;

/// Anchor points sampled when estimating the mean nearest-neighbor distance.
const WINDOW_ANCHORS: usize = 16;

/// One cube axis: a base hash plus its coin memo.
struct Axis {
    hash: WindowHash,
    /// Raw hash value -> folded bit. Grows only; a stored bit never flips.
    coins: Mutex<HashMap<u32, bool>>,
    /// Seed for coin tosses, so seeded indexes project reproducibly.
    coin_rng: Mutex<StdRng>,
}

impl Axis {
    /// Fold the axis hash of `v` to its memoized bit.
    fn bit_of(&self, v: &[u8]) -> bool {
        let hval = self.hash.hash(v);
        let mut coins = self.coins.lock().expect("axis coin memo poisoned");
        if let Some(&bit) = coins.get(&hval) {
            return bit;
        }
        let bit = self
            .coin_rng
            .lock()
            .expect("axis coin rng poisoned")
            .random_bool(0.5);
        coins.insert(hval, bit);
        bit
    }
}

/// Hypercube projection index over a borrowed dataset.
pub struct HypercubeIndex<'a> {
    dataset: &'a Dataset,
    axes: Vec<Axis>,
    vertices: HashMap<u32, Vec<usize>>,
    projection_dim: usize,
    max_candidates: usize,
    max_probes: usize,
    neighbors: usize,
    radius: f64,
    approximation_factor: f64,
}

impl<'a> HypercubeIndex<'a> {
    /// Build the vertex table over the full dataset.
    ///
    /// The axis hashes use modulus `2^(32 / d')` and a window of
    /// `window_multiplier` times the sampled mean nearest-neighbor distance.
    /// Vertex labels for the training points are computed in parallel; the
    /// per-axis memos make that safe.
    pub fn build(dataset: &'a Dataset, config: &CubeConfig) -> Result<Self> {
        config.validate()?;
        if dataset.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let started = Instant::now();
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let window =
            config.window_multiplier * mean_nearest_distance(dataset, WINDOW_ANCHORS, &mut rng);
        let modulus = 1u64 << (32 / config.projection_dim as u32);

        let axes: Vec<Axis> = (0..config.projection_dim)
            .map(|_| {
                let hash = WindowHash::new(dataset.dim(), modulus, window, &mut rng);
                let coin_seed: u64 = rng.random();
                Axis {
                    hash,
                    coins: Mutex::new(HashMap::new()),
                    coin_rng: Mutex::new(StdRng::seed_from_u64(coin_seed)),
                }
            })
            .collect();

        let labels: Vec<u32> = (0..dataset.len())
            .into_par_iter()
            .map(|i| vertex_label(&axes, dataset.get(i)))
            .collect();

        let mut vertices: HashMap<u32, Vec<usize>> = HashMap::new();
        for (index, label) in labels.into_iter().enumerate() {
            vertices.entry(label).or_default().push(index);
        }

        info!(
            projection_dim = config.projection_dim,
            points = dataset.len(),
            occupied_vertices = vertices.len(),
            window,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "hypercube index built"
        );

        Ok(Self {
            dataset,
            axes,
            vertices,
            projection_dim: config.projection_dim,
            max_candidates: config.max_candidates,
            max_probes: config.max_probes,
            neighbors: config.neighbors,
            radius: config.radius,
            approximation_factor: config.approximation_factor,
        })
    }

    /// The d'-bit vertex label of `v`, axis 0 in the highest of the d' bits.
    ///
    /// Deterministic given the memo state; a first-seen axis hash value
    /// draws a fresh coin which is then fixed forever for this index.
    #[must_use]
    pub fn vertex_of(&self, v: &[u8]) -> u32 {
        vertex_label(&self.axes, v)
    }

    /// Approximate k-NN with Hamming-ordered multi-probe.
    ///
    /// Visits at most `max_probes` vertices and examines at most
    /// `max_candidates` points, keeping a bounded top-N by exact distance.
    /// Returns fewer than `n` results when the budgets (or the cube) are
    /// exhausted first.
    #[must_use]
    pub fn approximate_nn(&self, query: &[u8], n: usize) -> Vec<Neighbor> {
        if n == 0 {
            return Vec::new();
        }
        let mut top = TopK::new(n);
        self.probe(query, |index, distance| {
            top.push(Neighbor { index, distance });
        });
        top.into_sorted()
    }

    /// Approximate k-NN at the configured answer size.
    #[must_use]
    pub fn approximate_nn_default(&self, query: &[u8]) -> Vec<Neighbor> {
        self.approximate_nn(query, self.neighbors)
    }

    /// Range search: every examined point within `C * radius`, subject to
    /// the same candidate and probe budgets as k-NN.
    #[must_use]
    pub fn range_search(&self, query: &[u8], radius: f64) -> Vec<usize> {
        let threshold = self.approximation_factor * radius;
        let mut matches = Vec::new();
        self.probe(query, |index, distance| {
            if f64::from(distance) < threshold {
                matches.push(index);
            }
        });
        matches
    }

    /// Range search at the radius the index was configured with.
    #[must_use]
    pub fn range_search_default(&self, query: &[u8]) -> Vec<usize> {
        self.range_search(query, self.radius)
    }

    /// Shared probe schedule: home vertex first, then increasing Hamming
    /// distance, stopping at the candidate/probe budgets or a fully
    /// explored cube.
    fn probe<F: FnMut(usize, u32)>(&self, query: &[u8], mut visit: F) {
        let home = self.vertex_of(query);
        let mut candidates_left = self.max_candidates;
        let mut probes_left = self.max_probes;

        let mut scan = |vertex: u32, candidates_left: &mut usize| {
            if let Some(members) = self.vertices.get(&vertex) {
                for &index in members {
                    if *candidates_left == 0 {
                        return;
                    }
                    *candidates_left -= 1;
                    visit(index, l1_distance(self.dataset.get(index), query));
                }
            }
        };

        probes_left -= 1;
        scan(home, &mut candidates_left);

        let mut prober = HammingProber::new(self.projection_dim as u32);
        while candidates_left > 0 && probes_left > 0 {
            let Some(mask) = prober.next_mask() else {
                break; // whole cube explored
            };
            probes_left -= 1;
            scan(home ^ mask, &mut candidates_left);
        }
    }

    /// Occupied vertex count (for diagnostics and tests).
    #[must_use]
    pub fn occupied_vertices(&self) -> usize {
        self.vertices.len()
    }
}

fn vertex_label(axes: &[Axis], v: &[u8]) -> u32 {
    axes.iter()
        .fold(0u32, |acc, axis| (acc << 1) | u32::from(axis.bit_of(v)))
}
