//! ++ seeding: probabilistic centroid initialization.

use rand::rngs::StdRng;
use rand::Rng;
use rayon::prelude::*;

use crate::dataset::Dataset;
use crate::distance::l1_distance;

/// Choose `k` initial centroids, k-means++ style.
///
/// The first centroid is uniform over the dataset. Each subsequent one is
/// drawn from the unselected points with probability proportional to the
/// square of their (max-normalized) distance to the nearest already-chosen
/// centroid: points far from every existing centroid are favored. The draw
/// walks a cumulative-sum table with a binary search.
///
/// Different seeds produce different, equally valid seedings.
pub fn plus_plus(dataset: &Dataset, k: usize, rng: &mut StdRng) -> Vec<Vec<u8>> {
    let n = dataset.len();
    debug_assert!(k >= 1 && k <= n);

    let mut chosen: Vec<usize> = Vec::with_capacity(k);
    let mut is_chosen = vec![false; n];

    let first = rng.random_range(0..n);
    chosen.push(first);
    is_chosen[first] = true;

    while chosen.len() < k {
        // D(i): distance of every unselected point to its nearest centroid.
        let min_distances: Vec<f64> = (0..n)
            .into_par_iter()
            .map(|i| {
                if is_chosen[i] {
                    return 0.0;
                }
                chosen
                    .iter()
                    .map(|&c| f64::from(l1_distance(dataset.get(i), dataset.get(c))))
                    .fold(f64::INFINITY, f64::min)
            })
            .collect();

        let dmax = min_distances.iter().copied().fold(0.0f64, f64::max);

        // Cumulative sums of squared normalized distances over unselected
        // points: a discrete CDF proportional to D(i)^2.
        let mut cdf: Vec<(f64, usize)> = Vec::with_capacity(n - chosen.len());
        let mut acc = 0.0;
        for i in 0..n {
            if is_chosen[i] {
                continue;
            }
            let d = if dmax > 0.0 { min_distances[i] / dmax } else { 0.0 };
            acc += d * d;
            cdf.push((acc, i));
        }

        let x = rng.random_range(0.0..=acc.max(0.0));
        let pos = cdf.partition_point(|&(sum, _)| sum < x);
        let next = cdf[pos.min(cdf.len() - 1)].1;

        chosen.push(next);
        is_chosen[next] = true;
    }

    chosen.into_iter().map(|i| dataset.get(i).to_vec()).collect()
}
