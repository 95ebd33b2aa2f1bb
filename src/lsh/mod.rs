//! LSH index: L independent tables of amplified hashes.
//!
//! Each table pairs one [`AmplifiedHash`] (its own random offsets) with a
//! bucket map from `g_i(v) mod ht_size` to the dataset indices hashing
//! there. Tables are built once over the whole dataset and never mutated
//! afterwards. A query probes exactly one bucket per table and verifies
//! every candidate with the exact L1 distance, so false bucket collisions
//! cost time but never correctness of the returned distances.
//!
//! Table count L and amplification order K trade against each other:
//! higher K makes a single bucket purer (all K sub-hashes must agree),
//! higher L recovers the recall that purity costs.

use std::collections::{HashMap, HashSet};
use std::time::Instant;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::LshConfig;
use crate::dataset::Dataset;
use crate::distance::{l1_distance, mean_nearest_distance};
use crate::error::{Error, Result};
use crate::exact::{Neighbor, TopK};
use crate::hash::AmplifiedHash;

/// Bucket-count divisor: each table gets `n / 8` buckets.
const BUCKET_DIVISOR: usize = 8;

/// Anchor points sampled when estimating the mean nearest-neighbor distance.
const WINDOW_ANCHORS: usize = 16;

struct LshTable {
    hash: AmplifiedHash,
    buckets: HashMap<u64, Vec<usize>>,
}

impl LshTable {
    fn build(dataset: &Dataset, ht_size: usize, k: usize, window: f64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let hash = AmplifiedHash::new(k, dataset.dim(), window, &mut rng);

        let mut buckets: HashMap<u64, Vec<usize>> = HashMap::new();
        for (index, v) in dataset.iter().enumerate() {
            let bucket = hash.key(v) % ht_size as u64;
            buckets.entry(bucket).or_default().push(index);
        }
        Self { hash, buckets }
    }

    fn bucket_of(&self, v: &[u8], ht_size: usize) -> Option<&[usize]> {
        let bucket = self.hash.key(v) % ht_size as u64;
        self.buckets.get(&bucket).map(Vec::as_slice)
    }
}

/// Locality-sensitive hashing index over a borrowed dataset.
///
/// Stores only dataset indices in its buckets; vectors are resolved through
/// the owning [`Dataset`] at query time.
pub struct LshIndex<'a> {
    dataset: &'a Dataset,
    tables: Vec<LshTable>,
    ht_size: usize,
    neighbors: usize,
    radius: f64,
    approximation_factor: f64,
    candidate_limit: Option<usize>,
}

impl<'a> LshIndex<'a> {
    /// Build the L tables over the full dataset.
    ///
    /// The quantization window is `window_multiplier` times the sampled mean
    /// nearest-neighbor distance. Table construction is independent per
    /// table and runs in parallel; each table derives its own RNG from the
    /// configured seed so results are reproducible regardless of scheduling.
    pub fn build(dataset: &'a Dataset, config: &LshConfig) -> Result<Self> {
        config.validate()?;
        if dataset.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let started = Instant::now();
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let window = config.window_multiplier * mean_nearest_distance(dataset, WINDOW_ANCHORS, &mut rng);
        let ht_size = (dataset.len() / BUCKET_DIVISOR).max(1);
        let table_seeds: Vec<u64> = (0..config.tables).map(|_| rng.random()).collect();

        let tables: Vec<LshTable> = table_seeds
            .into_par_iter()
            .enumerate()
            .map(|(i, seed)| {
                let table = LshTable::build(dataset, ht_size, config.sub_hashes, window, seed);
                debug!(table = i, buckets = table.buckets.len(), "lsh table built");
                table
            })
            .collect();

        info!(
            tables = tables.len(),
            sub_hashes = config.sub_hashes,
            points = dataset.len(),
            window,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "lsh index built"
        );

        Ok(Self {
            dataset,
            tables,
            ht_size,
            neighbors: config.neighbors,
            radius: config.radius,
            approximation_factor: config.approximation_factor,
            candidate_limit: config.candidate_limit,
        })
    }

    /// Approximate k-NN: up to the configured `neighbors` results, ascending
    /// by exact distance.
    ///
    /// Scans the query's bucket in every table, deduplicating candidates
    /// across tables and keeping a running top-N. A point landing in the
    /// query's bucket in several tables is examined once; each index appears
    /// at most once in the result. Stops early once `candidate_limit`
    /// distinct candidates (when configured) have been examined; the guard
    /// bounds work on pathological bucket sizes and is not needed for
    /// correctness. May return fewer results than requested when the probed
    /// buckets are thin.
    #[must_use]
    pub fn approximate_k_nn(&self, query: &[u8]) -> Vec<Neighbor> {
        let mut top = TopK::new(self.neighbors);
        let mut seen = HashSet::new();
        let mut examined = 0usize;

        'tables: for table in &self.tables {
            let Some(members) = table.bucket_of(query, self.ht_size) else {
                continue;
            };
            for &index in members {
                if !seen.insert(index) {
                    continue;
                }
                top.push(Neighbor {
                    index,
                    distance: l1_distance(self.dataset.get(index), query),
                });
                examined += 1;
                if self.candidate_limit.is_some_and(|cap| examined >= cap) {
                    break 'tables;
                }
            }
        }

        top.into_sorted()
    }

    /// Approximate range search: all bucket members within `c * radius` of
    /// the query, deduplicated across tables, in no particular order.
    ///
    /// The slack factor compensates for the bucket radius itself being
    /// approximate. An empty result is a value, not an error.
    #[must_use]
    pub fn range_search(&self, query: &[u8], radius: f64) -> Vec<usize> {
        let threshold = self.approximation_factor * radius;
        let mut seen = HashSet::new();
        let mut matches = Vec::new();

        for table in &self.tables {
            let Some(members) = table.bucket_of(query, self.ht_size) else {
                continue;
            };
            for &index in members {
                if !seen.insert(index) {
                    continue;
                }
                if f64::from(l1_distance(self.dataset.get(index), query)) < threshold {
                    matches.push(index);
                }
            }
        }
        matches
    }

    /// Range search at the radius the index was configured with.
    #[must_use]
    pub fn range_search_default(&self, query: &[u8]) -> Vec<usize> {
        self.range_search(query, self.radius)
    }

    /// Number of hash tables.
    #[must_use]
    pub fn tables(&self) -> usize {
        self.tables.len()
    }
}
