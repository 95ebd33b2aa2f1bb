//! Windowed LSH hash family for L1-metric byte vectors.
//!
//! The family follows Datar et al.'s p-stable construction adapted to the
//! Manhattan metric: each base hash shifts every coordinate by a random
//! offset drawn from `[0, w)` (the *window*), quantizes by `floor(. / w)`,
//! and folds the quantized coordinates into a bucket id with a modular
//! polynomial. Nearby points land in the same bucket with probability that
//! grows as their distance shrinks relative to `w`.
//!
//! Two composition layers sit on top:
//!
//! - [`AmplifiedHash`] concatenates `k` independent base hashes into one
//!   composite key (the LSH "g" function). Amplification trades recall for
//!   precision; the LSH index compensates by running L independent tables.
//! - The hypercube index folds each base hash to a single memoized bit
//!   instead (see [`crate::cube`]).
//!
//! ## References
//!
//! - Indyk & Motwani (1998). "Approximate nearest neighbors: towards
//!   removing the curse of dimensionality"
//! - Datar, Immorlica, Indyk, Mirrokni (2004). "Locality-sensitive hashing
//!   scheme based on p-stable distributions"

mod window;

pub use window::{AmplifiedHash, WindowHash, POLY_BASE};
