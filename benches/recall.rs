//! Recall vs latency benchmarks.
//!
//! Measures the fundamental ANN tradeoff for both index families: how much
//! accuracy is sacrificed for sublinear query time, and how the knobs
//! (table count for LSH, probe budget for the hypercube) move the curve.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

use locality::{exact, CubeConfig, Dataset, HypercubeIndex, LshConfig, LshIndex, Neighbor};

/// Clustered byte vectors: `centers` blobs with small uniform noise, so the
/// approximate indexes have real structure to exploit.
fn create_dataset(n: usize, dim: usize, centers: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let blob_centers: Vec<Vec<u8>> = (0..centers)
        .map(|_| (0..dim).map(|_| rng.random()).collect())
        .collect();
    let rows: Vec<Vec<u8>> = (0..n)
        .map(|_| {
            let center = &blob_centers[rng.random_range(0..centers)];
            center
                .iter()
                .map(|&c| c.saturating_add(rng.random_range(0..16)))
                .collect()
        })
        .collect();
    Dataset::from_rows(rows).expect("rows share a dimension")
}

fn create_queries(n: usize, dim: usize, seed: u64) -> Vec<Vec<u8>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| (0..dim).map(|_| rng.random()).collect())
        .collect()
}

fn recall_at_k(ground_truth: &[Neighbor], retrieved: &[Neighbor], k: usize) -> f32 {
    let gt: HashSet<usize> = ground_truth.iter().take(k).map(|n| n.index).collect();
    let got: HashSet<usize> = retrieved.iter().take(k).map(|n| n.index).collect();
    gt.intersection(&got).count() as f32 / k as f32
}

/// LSH recall/latency as the number of hash tables grows.
fn bench_lsh_recall_vs_tables(c: &mut Criterion) {
    let mut group = c.benchmark_group("lsh_recall_vs_tables");
    group.sample_size(20);

    let n_vectors = 5000;
    let n_queries = 50;
    let dimension = 64;
    let k = 10;

    let dataset = create_dataset(n_vectors, dimension, 20, 42);
    let queries = create_queries(n_queries, dimension, 123);

    let ground_truths: Vec<Vec<Neighbor>> = queries
        .iter()
        .map(|q| exact::k_nearest(&dataset, q, k))
        .collect();

    for tables in [1, 3, 5, 10] {
        let config = LshConfig {
            tables,
            neighbors: k,
            seed: Some(7),
            ..LshConfig::default()
        };
        let index = LshIndex::build(&dataset, &config).expect("index build");

        group.bench_with_input(BenchmarkId::new("tables", tables), &tables, |b, _| {
            b.iter(|| {
                let mut total_recall = 0.0;
                for (i, query) in queries.iter().enumerate() {
                    let results = index.approximate_k_nn(black_box(query));
                    total_recall += recall_at_k(&ground_truths[i], &results, k);
                }
                total_recall / queries.len() as f32
            })
        });
    }

    group.finish();
}

/// Hypercube recall/latency as the probe budget grows.
fn bench_cube_recall_vs_probes(c: &mut Criterion) {
    let mut group = c.benchmark_group("cube_recall_vs_probes");
    group.sample_size(20);

    let n_vectors = 5000;
    let n_queries = 50;
    let dimension = 64;
    let k = 10;

    let dataset = create_dataset(n_vectors, dimension, 20, 42);
    let queries = create_queries(n_queries, dimension, 123);

    let ground_truths: Vec<Vec<Neighbor>> = queries
        .iter()
        .map(|q| exact::k_nearest(&dataset, q, k))
        .collect();

    for probes in [2, 8, 32, 128] {
        let config = CubeConfig {
            projection_dim: 12,
            max_probes: probes,
            max_candidates: probes * 50,
            neighbors: k,
            seed: Some(7),
            ..CubeConfig::default()
        };
        let index = HypercubeIndex::build(&dataset, &config).expect("index build");

        group.bench_with_input(BenchmarkId::new("probes", probes), &probes, |b, _| {
            b.iter(|| {
                let mut total_recall = 0.0;
                for (i, query) in queries.iter().enumerate() {
                    let results = index.approximate_nn(black_box(query), k);
                    total_recall += recall_at_k(&ground_truths[i], &results, k);
                }
                total_recall / queries.len() as f32
            })
        });
    }

    group.finish();
}

/// Exact scan baseline the approximate numbers are judged against.
fn bench_exact_baseline(c: &mut Criterion) {
    let mut group = c.benchmark_group("exact_baseline");
    group.sample_size(20);

    let n_queries = 50;
    let dimension = 64;
    let k = 10;

    for n_vectors in [1000, 5000, 20000] {
        let dataset = create_dataset(n_vectors, dimension, 20, 42);
        let queries = create_queries(n_queries, dimension, 123);

        group.bench_with_input(BenchmarkId::new("n", n_vectors), &n_vectors, |b, _| {
            b.iter(|| {
                for query in &queries {
                    black_box(exact::k_nearest(&dataset, black_box(query), k));
                }
            })
        });
    }

    group.finish();
}

/// Measure actual recall values (not just timing) and print them for
/// documentation, then benchmark one representative configuration.
fn bench_recall_measurement(c: &mut Criterion) {
    let mut group = c.benchmark_group("recall_measurement");
    group.sample_size(10);

    let n_vectors = 5000;
    let n_queries = 100;
    let dimension = 64;
    let k = 10;

    let dataset = create_dataset(n_vectors, dimension, 20, 42);
    let queries = create_queries(n_queries, dimension, 123);

    let ground_truths: Vec<Vec<Neighbor>> = queries
        .iter()
        .map(|q| exact::k_nearest(&dataset, q, k))
        .collect();

    for tables in [1, 3, 5, 10] {
        let config = LshConfig {
            tables,
            neighbors: k,
            seed: Some(7),
            ..LshConfig::default()
        };
        let index = LshIndex::build(&dataset, &config).expect("index build");
        let mean_recall = queries
            .iter()
            .enumerate()
            .map(|(i, q)| recall_at_k(&ground_truths[i], &index.approximate_k_nn(q), k))
            .sum::<f32>()
            / queries.len() as f32;
        eprintln!("lsh tables={}: recall@{}={:.3}", tables, k, mean_recall);
    }

    let config = LshConfig {
        tables: 5,
        neighbors: k,
        seed: Some(7),
        ..LshConfig::default()
    };
    let index = LshIndex::build(&dataset, &config).expect("index build");

    group.bench_function("lsh_5_tables", |b| {
        b.iter(|| {
            queries
                .iter()
                .enumerate()
                .map(|(i, q)| {
                    recall_at_k(&ground_truths[i], &index.approximate_k_nn(black_box(q)), k)
                })
                .sum::<f32>()
                / queries.len() as f32
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_lsh_recall_vs_tables,
    bench_cube_recall_vs_probes,
    bench_exact_baseline,
    bench_recall_measurement,
);
criterion_main!(benches);
