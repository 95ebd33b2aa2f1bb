//! End-to-end clustering scenarios on synthetic two-blob data.

use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use locality::{ClusterConfig, CubeConfig, Dataset, KMedians};

/// 100 8-dimensional byte vectors: 50 around 10, 50 around 200.
fn two_blob_dataset(seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(100);
    for center in [10u8, 200] {
        for _ in 0..50 {
            let row: Vec<u8> = (0..8)
                .map(|_| center.wrapping_add(rng.random_range(0..8)))
                .collect();
            rows.push(row);
        }
    }
    Dataset::from_rows(rows).unwrap()
}

fn blob_of(ds: &Dataset, i: usize) -> u8 {
    if ds.get(i)[0] < 100 {
        0
    } else {
        1
    }
}

#[test]
fn lloyd_two_blobs_end_to_end() -> Result<()> {
    let ds = two_blob_dataset(31);
    let got = KMedians::new(ClusterConfig::lloyd(2)).with_seed(7).fit(&ds)?;

    assert!(got.converged);
    assert_eq!(got.non_empty_clusters(), 2);

    // Each cluster holds points from exactly one blob.
    for members in got.clusters.iter().filter(|m| !m.is_empty()) {
        let first = blob_of(&ds, members[0]);
        assert!(members.iter().all(|&i| blob_of(&ds, i) == first));
    }

    let stats = got.silhouette(&ds);
    assert!(stats.overall > 0.8, "silhouette = {}", stats.overall);
    Ok(())
}

#[test]
fn reverse_cube_two_blobs_end_to_end() -> Result<()> {
    let ds = two_blob_dataset(32);
    let cube = CubeConfig {
        projection_dim: 7,
        max_candidates: ds.len(),
        max_probes: 128,
        ..CubeConfig::default()
    };
    let mut cfg = ClusterConfig::reverse_cube(2, cube);
    cfg.seed = Some(13);
    let got = KMedians::new(cfg).fit(&ds)?;

    assert_eq!(got.non_empty_clusters(), 2);
    let total: usize = got.clusters.iter().map(Vec::len).sum();
    assert_eq!(total, ds.len());
    for members in got.clusters.iter().filter(|m| !m.is_empty()) {
        let first = blob_of(&ds, members[0]);
        assert!(members.iter().all(|&i| blob_of(&ds, i) == first));
    }

    let stats = got.silhouette(&ds);
    assert!(stats.overall > 0.8, "silhouette = {}", stats.overall);
    Ok(())
}

#[test]
fn membership_stabilizes_after_convergence() -> Result<()> {
    // Two consecutive fits from the converged centroids must produce the
    // same partition: rerunning with more allowed iterations cannot change
    // the answer on well-separated blobs.
    let ds = two_blob_dataset(33);
    let mut short = ClusterConfig::lloyd(2);
    short.max_iterations = 25;
    let mut long = short.clone();
    long.max_iterations = 50;

    let a = KMedians::new(short).with_seed(5).fit(&ds)?;
    let b = KMedians::new(long).with_seed(5).fit(&ds)?;
    assert_eq!(a.assignment, b.assignment);
    Ok(())
}

#[test]
fn centroids_land_near_blob_centers() -> Result<()> {
    let ds = two_blob_dataset(34);
    let got = KMedians::new(ClusterConfig::lloyd(2)).with_seed(11).fit(&ds)?;

    let mut centers: Vec<u8> = got.centroids.iter().map(|c| c[0]).collect();
    centers.sort_unstable();
    // Blob coordinates are center + [0, 8); medians must sit inside.
    assert!((10..18).contains(&centers[0]), "low centroid {}", centers[0]);
    assert!((200..208).contains(&centers[1]), "high centroid {}", centers[1]);
    Ok(())
}
