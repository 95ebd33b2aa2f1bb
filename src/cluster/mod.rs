//! k-medians++ clustering engine.
//!
//! Alternating minimization over a fixed cluster count:
//!
//! 1. **Init++**: probabilistic seeding weighted by squared distance to the
//!    nearest already-chosen centroid (Arthur & Vassilvitskii's k-means++
//!    weights, reused verbatim for medians).
//! 2. **Assignment**: Lloyd's brute force, or reverse assignment driving
//!    range queries around each centroid through a hypercube index.
//! 3. **Median update**: per-dimension upper median of each cluster's
//!    member coordinates (medians, not means: the L1 analogue).
//! 4. **Convergence**: stop when the relative change of the objective
//!    (sum of squared nearest-centroid distances) drops below epsilon, or
//!    when the iteration cap is hit (best-effort result, `converged: false`).
//!
//! Assignment and the objective parallelize across points; the loop itself
//! is inherently sequential (each median update needs the full assignment).
//!
//! ## References
//!
//! - Arthur & Vassilvitskii (2007). "k-means++: the advantages of careful
//!   seeding"
//! - Rousseeuw (1987). "Silhouettes: a graphical aid to the interpretation
//!   and validation of cluster analysis"

mod assign;
mod init;
mod silhouette;
mod update;

pub use silhouette::SilhouetteStats;

use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::{AssignmentMethod, ClusterConfig};
use crate::cube::HypercubeIndex;
use crate::dataset::Dataset;
use crate::error::Result;
use crate::exact;

/// k-medians++ clusterer. Construct with a [`ClusterConfig`], then call
/// [`fit`](KMedians::fit).
#[derive(Debug, Clone)]
pub struct KMedians {
    config: ClusterConfig,
}

/// A converged (or best-effort) clustering.
#[derive(Debug, Clone)]
pub struct Clustering {
    /// Final centroid vectors, one per configured cluster.
    pub centroids: Vec<Vec<u8>>,
    /// Member indices per cluster; every dataset index appears in exactly
    /// one cluster.
    pub clusters: Vec<Vec<usize>>,
    /// Point index -> cluster index.
    pub assignment: Vec<usize>,
    /// Iterations actually run.
    pub iterations: usize,
    /// False when the iteration cap fired before epsilon was met.
    pub converged: bool,
    /// Final objective: sum of squared nearest-centroid distances.
    pub objective: f64,
}

impl KMedians {
    #[must_use]
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    /// Override the seed, for reproducible runs.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Run the full loop: seed, iterate assignment + median update until
    /// the objective stabilizes, and package the result.
    ///
    /// Exceeding `max_iterations` is not an error: the best-effort
    /// clustering comes back with `converged == false` and a warning in the
    /// log.
    pub fn fit(&self, dataset: &Dataset) -> Result<Clustering> {
        let cfg = &self.config;
        cfg.validate(dataset.len())?;

        let mut rng = match cfg.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_rng(&mut rand::rng()),
        };

        let mut centroids = init::plus_plus(dataset, cfg.clusters, &mut rng);

        // Built once; every reverse-assignment round reuses it.
        let cube = match cfg.method {
            AssignmentMethod::Lloyd => None,
            AssignmentMethod::ReverseCube => {
                let mut cube_cfg = cfg.cube.clone();
                if cube_cfg.seed.is_none() {
                    cube_cfg.seed = cfg.seed;
                }
                Some(HypercubeIndex::build(dataset, &cube_cfg)?)
            }
        };

        let mut clusters = Vec::new();
        let mut previous = f64::INFINITY;
        let mut objective = f64::INFINITY;
        let mut converged = false;
        let mut iterations = 0;

        for iteration in 0..cfg.max_iterations {
            clusters = match &cube {
                None => assign::lloyd(dataset, &centroids),
                Some(cube) => {
                    assign::reverse_cube(dataset, cube, &centroids, cfg.radius_ceiling)
                }
            };

            update::median_update(dataset, &mut centroids, &clusters);

            objective = clustering_objective(dataset, &centroids);
            iterations = iteration + 1;
            debug!(iteration, objective, "k-medians iteration");

            let relative = (previous - objective).abs() / previous.abs().max(f64::MIN_POSITIVE);
            if previous.is_finite() && relative < cfg.epsilon {
                converged = true;
                break;
            }
            previous = objective;
        }

        if !converged {
            warn!(
                iterations,
                objective, "k-medians hit the iteration cap before converging"
            );
        } else {
            info!(iterations, objective, "k-medians converged");
        }

        let mut assignment = vec![0usize; dataset.len()];
        for (c, members) in clusters.iter().enumerate() {
            for &i in members {
                assignment[i] = c;
            }
        }

        Ok(Clustering {
            centroids,
            clusters,
            assignment,
            iterations,
            converged,
            objective,
        })
    }
}

impl Clustering {
    /// Silhouette statistics of this clustering over its dataset.
    #[must_use]
    pub fn silhouette(&self, dataset: &Dataset) -> SilhouetteStats {
        silhouette::compute(dataset, &self.clusters, &self.centroids)
    }

    /// Number of clusters with at least one member.
    #[must_use]
    pub fn non_empty_clusters(&self) -> usize {
        self.clusters.iter().filter(|c| !c.is_empty()).count()
    }
}

/// Sum of squared nearest-centroid distances over all points.
fn clustering_objective(dataset: &Dataset, centroids: &[Vec<u8>]) -> f64 {
    (0..dataset.len())
        .into_par_iter()
        .map(|i| {
            let (_, d) = exact::nearest_among(centroids, dataset.get(i));
            f64::from(d) * f64::from(d)
        })
        .sum()
}
