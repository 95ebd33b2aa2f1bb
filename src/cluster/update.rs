//! Median update: per-dimension upper median of each cluster.

use rayon::prelude::*;

use crate::dataset::Dataset;

/// Recompute every centroid as the coordinate-wise upper median of its
/// cluster's members.
///
/// For each dimension independently: collect the member values, sort, take
/// the element at index `size / 2` (the upper median for even sizes, the
/// true median for odd). A cluster with no members keeps its previous
/// centroid untouched; there is nothing to index into.
pub fn median_update(dataset: &Dataset, centroids: &mut [Vec<u8>], clusters: &[Vec<usize>]) {
    debug_assert_eq!(centroids.len(), clusters.len());

    centroids
        .par_iter_mut()
        .zip(clusters.par_iter())
        .for_each(|(centroid, members)| {
            if members.is_empty() {
                return;
            }
            let mid = members.len() / 2;
            let mut components = vec![0u8; members.len()];
            for d in 0..centroid.len() {
                for (slot, &i) in components.iter_mut().zip(members.iter()) {
                    *slot = dataset.get(i)[d];
                }
                components.sort_unstable();
                centroid[d] = components[mid];
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn odd_cluster_takes_the_true_median() {
        let ds = Dataset::from_rows([[1u8], [9], [5], [3], [7]]).unwrap();
        let mut centroids = vec![vec![0u8]];
        median_update(&ds, &mut centroids, &[vec![0, 1, 2, 3, 4]]);
        assert_eq!(centroids[0], vec![5]);
    }

    #[test]
    fn even_cluster_takes_the_upper_median() {
        let ds = Dataset::from_rows([[1u8], [2], [8], [9]]).unwrap();
        let mut centroids = vec![vec![0u8]];
        median_update(&ds, &mut centroids, &[vec![0, 1, 2, 3]]);
        // Sorted values 1 2 8 9; index 4 / 2 = 2 -> 8.
        assert_eq!(centroids[0], vec![8]);
    }

    #[test]
    fn empty_cluster_keeps_its_centroid() {
        let ds = Dataset::from_rows([[4u8, 4]]).unwrap();
        let mut centroids = vec![vec![7u8, 7], vec![4, 4]];
        median_update(&ds, &mut centroids, &[vec![], vec![0]]);
        assert_eq!(centroids[0], vec![7, 7]);
    }

    #[test]
    fn dimensions_update_independently() {
        let ds = Dataset::from_rows([[0u8, 9], [10, 1], [20, 5]]).unwrap();
        let mut centroids = vec![vec![0u8, 0]];
        median_update(&ds, &mut centroids, &[vec![0, 1, 2]]);
        assert_eq!(centroids[0], vec![10, 5]);
    }
}
