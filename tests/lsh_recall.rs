//! Statistical recall of LSH k-NN on well-separated clustered data.
//!
//! The index is approximate by design, so single queries may miss; the
//! contract worth testing is aggregate: over many seeded trials on obvious
//! cluster structure, a query drawn from a cluster finds a neighbor at least
//! as close as its true nearest one with high empirical frequency.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use locality::{exact, Dataset, LshConfig, LshIndex};

/// 200 8-dimensional vectors: 100 around 20, 100 around 220.
fn clustered_dataset(seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(200);
    for center in [20u8, 220] {
        for _ in 0..100 {
            let row: Vec<u8> = (0..8).map(|_| center + rng.random_range(0..4)).collect();
            rows.push(row);
        }
    }
    Dataset::from_rows(rows).unwrap()
}

#[test]
fn knn_recovers_a_true_nearest_neighbor_with_high_frequency() {
    let mut hits = 0usize;
    let mut trials = 0usize;

    for seed in 0..5u64 {
        let ds = clustered_dataset(seed);
        let cfg = LshConfig {
            tables: 10,
            neighbors: 5,
            window_multiplier: 10.0,
            seed: Some(seed + 100),
            ..LshConfig::default()
        };
        let index = LshIndex::build(&ds, &cfg).unwrap();

        for i in (0..ds.len()).step_by(5) {
            let query = ds.get(i);
            let true_nn = exact::k_nearest(&ds, query, 2)
                .into_iter()
                .find(|nb| nb.index != i)
                .unwrap();

            // Success: some result other than the query itself at least as
            // close as the exact nearest neighbor (ties count, so duplicate
            // vectors cannot fail the trial spuriously).
            let found = index
                .approximate_k_nn(query)
                .iter()
                .any(|nb| nb.index != i && nb.distance <= true_nn.distance);

            hits += usize::from(found);
            trials += 1;
        }
    }

    let recall = hits as f64 / trials as f64;
    assert!(recall >= 0.7, "recall = {recall:.3} over {trials} trials");
}
