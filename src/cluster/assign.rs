//! Assignment phase: Lloyd's brute force and hypercube reverse assignment.

use rayon::prelude::*;
use tracing::debug;

use crate::cube::HypercubeIndex;
use crate::dataset::Dataset;
use crate::distance::l1_distance;
use crate::exact;

/// Lloyd's assignment: every point to its exactly-nearest centroid.
///
/// O(n * k) distance computations, parallel across points.
pub fn lloyd(dataset: &Dataset, centroids: &[Vec<u8>]) -> Vec<Vec<usize>> {
    let best: Vec<usize> = (0..dataset.len())
        .into_par_iter()
        .map(|i| exact::nearest_among(centroids, dataset.get(i)).0)
        .collect();

    group(best, centroids.len())
}

/// Reverse assignment: centroids claim points via range queries.
///
/// Starts with a radius of half the minimum inter-centroid distance and
/// doubles it each round. A point returned by several centroids' queries
/// goes to whichever is closer by exact distance, with reassignment whenever
/// a later round finds a strictly closer centroid. Rounds stop once the
/// radius passes `radius_ceiling` or nothing is left unassigned; leftovers
/// fall back to brute-force nearest-centroid search.
///
/// This approximates Lloyd's: it trades some assignment accuracy for
/// replacing the O(n * k) scan with index lookups around k centroids.
pub fn reverse_cube(
    dataset: &Dataset,
    cube: &HypercubeIndex<'_>,
    centroids: &[Vec<u8>],
    radius_ceiling: f64,
) -> Vec<Vec<usize>> {
    let n = dataset.len();
    let k = centroids.len();
    let mut assigned: Vec<Option<usize>> = vec![None; n];

    let mut radius = (min_inter_centroid_distance(centroids) / 2.0).max(1.0);
    let mut unassigned = n;

    while radius < radius_ceiling && unassigned > 0 {
        let mut newly_assigned = 0usize;

        for (c, centroid) in centroids.iter().enumerate() {
            for index in cube.range_search(centroid, radius) {
                match assigned[index] {
                    None => {
                        assigned[index] = Some(c);
                        newly_assigned += 1;
                    }
                    Some(prev) if prev != c => {
                        // Claimed by two centroids' balls: exact distance
                        // breaks the tie, strictly-closer wins.
                        let point = dataset.get(index);
                        let prev_dist = l1_distance(point, &centroids[prev]);
                        let new_dist = l1_distance(point, centroid);
                        if new_dist < prev_dist {
                            assigned[index] = Some(c);
                        }
                    }
                    Some(_) => {}
                }
            }
        }

        unassigned -= newly_assigned;
        debug!(radius, newly_assigned, unassigned, "reverse-assignment round");
        radius *= 2.0;
    }

    if unassigned > 0 {
        // Points no ball reached: exact nearest centroid.
        let fallback: Vec<(usize, usize)> = (0..n)
            .into_par_iter()
            .filter(|&i| assigned[i].is_none())
            .map(|i| (i, exact::nearest_among(centroids, dataset.get(i)).0))
            .collect();
        debug!(points = fallback.len(), "brute-force assignment fallback");
        for (i, c) in fallback {
            assigned[i] = Some(c);
        }
    }

    let flat: Vec<usize> = assigned
        .into_iter()
        .map(|a| a.unwrap_or_default())
        .collect();
    group(flat, k)
}

fn group(assignment: Vec<usize>, k: usize) -> Vec<Vec<usize>> {
    let mut clusters = vec![Vec::new(); k];
    for (i, c) in assignment.into_iter().enumerate() {
        clusters[c].push(i);
    }
    clusters
}

/// Smallest pairwise L1 distance between centroids; `f64::INFINITY` when
/// there is only one.
fn min_inter_centroid_distance(centroids: &[Vec<u8>]) -> f64 {
    let mut min = f64::INFINITY;
    for i in 0..centroids.len() {
        for j in i + 1..centroids.len() {
            min = min.min(f64::from(l1_distance(&centroids[i], &centroids[j])));
        }
    }
    min
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CubeConfig;

    fn blob_dataset() -> Dataset {
        let mut rows = Vec::new();
        for i in 0..10u8 {
            rows.push(vec![10 + i % 3; 4]);
            rows.push(vec![200 + i % 3; 4]);
        }
        Dataset::from_rows(rows).unwrap()
    }

    #[test]
    fn lloyd_assigns_every_point_exactly_once() {
        let ds = blob_dataset();
        let centroids = vec![vec![10u8; 4], vec![200u8; 4]];
        let clusters = lloyd(&ds, &centroids);
        let total: usize = clusters.iter().map(Vec::len).sum();
        assert_eq!(total, ds.len());
        // Low blob to centroid 0, high blob to centroid 1.
        assert!(clusters[0].iter().all(|&i| ds.get(i)[0] < 100));
        assert!(clusters[1].iter().all(|&i| ds.get(i)[0] >= 100));
    }

    #[test]
    fn reverse_cube_covers_all_points() {
        let ds = blob_dataset();
        let cfg = CubeConfig {
            projection_dim: 5,
            max_candidates: ds.len(),
            max_probes: 40,
            seed: Some(8),
            ..CubeConfig::default()
        };
        let cube = HypercubeIndex::build(&ds, &cfg).unwrap();
        let centroids = vec![vec![11u8; 4], vec![201u8; 4]];
        let clusters = reverse_cube(&ds, &cube, &centroids, 1e9);
        let total: usize = clusters.iter().map(Vec::len).sum();
        assert_eq!(total, ds.len());
    }

    #[test]
    fn min_inter_centroid_distance_of_single_centroid_is_infinite() {
        assert!(min_inter_centroid_distance(&[vec![1u8, 2]]).is_infinite());
    }
}
