//! Silhouette scoring of a finished clustering.

use rayon::prelude::*;

use crate::dataset::Dataset;
use crate::distance::l1_distance;

/// Per-cluster and overall silhouette coefficients, in `[-1, 1]`.
///
/// Read-only summary of a converged clustering; values near 1 mean points
/// sit well inside their own cluster, values near -1 mean they would rather
/// live in the neighboring one.
#[derive(Debug, Clone, PartialEq)]
pub struct SilhouetteStats {
    /// Mean silhouette per cluster (0.0 for an empty cluster).
    pub per_cluster: Vec<f64>,
    /// Mean over all non-empty clusters.
    pub overall: f64,
}

/// Compute silhouette statistics.
///
/// For each point: `a` = mean distance to the other members of its own
/// cluster (0 for a singleton, whose silhouette is pinned to 0 by
/// definition), `b` = mean distance to the members of the *nearest other*
/// cluster, where "nearest" is judged by centroid-to-centroid distance
/// excluding the point's own; `s = (b - a) / max(a, b)`, with the
/// `a = b = 0` degenerate case mapped to 0 rather than dividing by zero.
pub fn compute(
    dataset: &Dataset,
    clusters: &[Vec<usize>],
    centroids: &[Vec<u8>],
) -> SilhouetteStats {
    let per_cluster: Vec<f64> = clusters
        .iter()
        .enumerate()
        .map(|(c, members)| cluster_mean(dataset, clusters, centroids, c, members))
        .collect();

    let occupied: Vec<f64> = clusters
        .iter()
        .zip(per_cluster.iter())
        .filter(|(members, _)| !members.is_empty())
        .map(|(_, &s)| s)
        .collect();
    let overall = if occupied.is_empty() {
        0.0
    } else {
        occupied.iter().sum::<f64>() / occupied.len() as f64
    };

    SilhouetteStats {
        per_cluster,
        overall,
    }
}

fn cluster_mean(
    dataset: &Dataset,
    clusters: &[Vec<usize>],
    centroids: &[Vec<u8>],
    c: usize,
    members: &[usize],
) -> f64 {
    if members.is_empty() {
        return 0.0;
    }

    let neighbor = nearest_other_cluster(clusters, centroids, c);

    let total: f64 = members
        .par_iter()
        .map(|&i| point_score(dataset, members, neighbor.map(|nc| &clusters[nc][..]), i))
        .sum();
    total / members.len() as f64
}

fn point_score(
    dataset: &Dataset,
    own: &[usize],
    neighbor: Option<&[usize]>,
    i: usize,
) -> f64 {
    // A point alone in its cluster scores exactly 0 by definition.
    if own.len() == 1 {
        return 0.0;
    }

    let point = dataset.get(i);

    let a = own
        .iter()
        .filter(|&&j| j != i)
        .map(|&j| f64::from(l1_distance(point, dataset.get(j))))
        .sum::<f64>()
        / (own.len() - 1) as f64;

    let Some(neighbor) = neighbor else {
        // Single-cluster run: separation is undefined, score neutral.
        return 0.0;
    };
    let b = neighbor
        .iter()
        .map(|&j| f64::from(l1_distance(point, dataset.get(j))))
        .sum::<f64>()
        / neighbor.len() as f64;

    if a == 0.0 && b == 0.0 {
        return 0.0;
    }
    (b - a) / a.max(b)
}

/// Index of the non-empty cluster whose centroid is closest to cluster
/// `c`'s, excluding `c` itself.
fn nearest_other_cluster(
    clusters: &[Vec<usize>],
    centroids: &[Vec<u8>],
    c: usize,
) -> Option<usize> {
    centroids
        .iter()
        .enumerate()
        .filter(|&(o, _)| o != c && !clusters[o].is_empty())
        .min_by_key(|&(_, other)| l1_distance(&centroids[c], other))
        .map(|(o, _)| o)
}
