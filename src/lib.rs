//! locality: approximate nearest neighbor search over byte-image vectors.
//!
//! Two independent indexing techniques over the L1 (Manhattan) metric, plus
//! a clustering engine that can reuse them:
//!
//! - `hash/` + `lsh/`: windowed locality-sensitive hashing, L tables of
//!   k-amplified random-offset hashes
//! - `cube/`: random-hyperplane hypercube projection with memoized binary
//!   folds and Hamming-ordered multi-probe
//! - `exact`: brute-force baseline for recall measurement and seeding
//! - `cluster/`: k-medians++ (probabilistic seeding, Lloyd's or reverse
//!   assignment, per-dimension median update, silhouette scoring)
//!
//! # Why two indexes
//!
//! LSH and the hypercube make opposite bets on the same hash family. LSH
//! amplifies k hashes into one high-precision key and pays for lost recall
//! with L independent tables; a query touches one bucket per table. The
//! hypercube folds each hash to a single bit, giving a tiny d'-bit address
//! space it can explore *around* the query vertex by flipping bits in
//! increasing Hamming distance. LSH spends memory to keep probing cheap;
//! the hypercube spends probes to keep memory small.
//!
//! Both are approximate by design: a query may legitimately miss its true
//! nearest neighbor, and callers that need the truth run [`exact`]
//! alongside (see [`report`] for the comparison plumbing).
//!
//! # Example
//!
//! ```
//! use locality::{Dataset, LshConfig, LshIndex};
//!
//! let dataset = Dataset::from_rows([[10u8, 10], [12, 11], [200, 199]])?;
//! let config = LshConfig { neighbors: 2, seed: Some(7), ..LshConfig::default() };
//! let index = LshIndex::build(&dataset, &config)?;
//!
//! let hits = index.approximate_k_nn(&[11, 11]);
//! assert!(hits.len() <= 2);
//! # Ok::<(), locality::Error>(())
//! ```
//!
//! # References
//!
//! - Indyk & Motwani (1998). "Approximate nearest neighbors: towards
//!   removing the curse of dimensionality"
//! - Datar et al. (2004). "Locality-sensitive hashing scheme based on
//!   p-stable distributions"
//! - Arthur & Vassilvitskii (2007). "k-means++: the advantages of careful
//!   seeding"

pub mod cluster;
pub mod config;
pub mod cube;
pub mod dataset;
pub mod distance;
pub mod error;
pub mod exact;
pub mod hash;
pub mod lsh;
pub mod report;

pub use cluster::{Clustering, KMedians, SilhouetteStats};
pub use config::{AssignmentMethod, ClusterConfig, CubeConfig, LshConfig};
pub use cube::HypercubeIndex;
pub use dataset::Dataset;
pub use distance::l1_distance;
pub use error::{Error, Result};
pub use exact::Neighbor;
pub use lsh::LshIndex;
