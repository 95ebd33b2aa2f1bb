//! L1 (Manhattan) distance over fixed-length byte vectors.
//!
//! Every structure in this crate measures proximity with the same metric:
//! the sum of absolute per-coordinate differences. For `u8` coordinates the
//! per-pair distance is bounded by `255 * dim`, so a `u32` holds any
//! realistic image dimension without overflow.

use rand::seq::index::sample;
use rand::Rng;

use crate::dataset::Dataset;
use crate::exact;

/// L1 (Manhattan) distance between two equal-length byte vectors.
///
/// # Panics
///
/// Panics if the slices differ in length. A length mismatch means the caller
/// mixed vectors from different datasets, which is a programming error, not
/// a recoverable condition.
#[inline]
#[must_use]
pub fn l1_distance(a: &[u8], b: &[u8]) -> u32 {
    assert_eq!(
        a.len(),
        b.len(),
        "l1_distance called on vectors of different dimension"
    );
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| u32::from(x.abs_diff(y)))
        .sum()
}

/// Estimate the mean nearest-neighbor distance of a dataset.
///
/// Samples up to `anchors` points without replacement and averages each
/// anchor's exact nearest-neighbor distance over the full dataset. The
/// estimate seeds the quantization window of the hash family; it does not
/// need to be tight, only scale-correct.
///
/// Returns at least `1.0` so a degenerate dataset (all points identical)
/// cannot produce a zero-width window.
#[must_use]
pub fn mean_nearest_distance<R: Rng>(dataset: &Dataset, anchors: usize, rng: &mut R) -> f64 {
    let n = dataset.len();
    if n < 2 {
        return 1.0;
    }

    let picked = sample(rng, n, anchors.clamp(1, n));
    let total: f64 = picked
        .iter()
        .map(|i| {
            let query = dataset.get(i);
            exact::k_nearest(dataset, query, 2)
                .into_iter()
                .find(|nb| nb.index != i)
                .map_or(0.0, |nb| f64::from(nb.distance))
        })
        .sum();

    (total / picked.len() as f64).max(1.0)
}
