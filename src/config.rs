//! Configuration structs for the two indexes and the clusterer.
//!
//! One plain struct per component, deserializable from TOML. There is no
//! shared base type: the components overlap only in a couple of field names,
//! and each struct validates its own invariants in `validate()` before an
//! index accepts it.
//!
//! ```toml
//! [lsh]
//! tables = 5
//! sub_hashes = 4
//!
//! [cube]
//! projection_dim = 14
//! max_candidates = 10
//! max_probes = 2
//!
//! [cluster]
//! clusters = 10
//! method = "lloyd"
//! ```

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Hash functions folded into one amplified hash when unspecified.
fn default_sub_hashes() -> usize {
    4
}

/// Hash tables built when unspecified.
fn default_tables() -> usize {
    5
}

fn default_neighbors() -> usize {
    1
}

fn default_radius() -> f64 {
    10_000.0
}

/// Window = multiplier x mean nearest-neighbor distance.
fn default_window_multiplier() -> f64 {
    4.0
}

/// Approximation slack applied to range-search radii.
fn default_approximation_factor() -> f64 {
    1.2
}

fn default_projection_dim() -> usize {
    14
}

fn default_max_candidates() -> usize {
    10
}

fn default_max_probes() -> usize {
    2
}

fn default_epsilon() -> f64 {
    1e-3
}

fn default_max_iterations() -> usize {
    25
}

fn default_radius_ceiling() -> f64 {
    1e9
}

/// Parameters for [`LshIndex`](crate::lsh::LshIndex).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LshConfig {
    /// Number of independent hash tables (L).
    #[serde(default = "default_tables")]
    pub tables: usize,
    /// Hash functions per amplified hash (K). Must lie in `1..=32`.
    #[serde(default = "default_sub_hashes")]
    pub sub_hashes: usize,
    /// Nearest neighbors returned per query (N).
    #[serde(default = "default_neighbors")]
    pub neighbors: usize,
    /// Default range-search radius (R).
    #[serde(default = "default_radius")]
    pub radius: f64,
    /// Slack multiplier `c >= 1` applied to range-search radii.
    #[serde(default = "default_approximation_factor")]
    pub approximation_factor: f64,
    /// Quantization window as a multiple of the mean nearest-neighbor distance.
    #[serde(default = "default_window_multiplier")]
    pub window_multiplier: f64,
    /// Optional cap on candidates examined per k-NN query. Purely a
    /// performance guard against pathological bucket sizes.
    #[serde(default)]
    pub candidate_limit: Option<usize>,
    /// Seed for the hash family. Unseeded runs draw one from entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for LshConfig {
    fn default() -> Self {
        Self {
            tables: default_tables(),
            sub_hashes: default_sub_hashes(),
            neighbors: default_neighbors(),
            radius: default_radius(),
            approximation_factor: default_approximation_factor(),
            window_multiplier: default_window_multiplier(),
            candidate_limit: None,
            seed: None,
        }
    }
}

impl LshConfig {
    pub fn validate(&self) -> Result<()> {
        if self.tables == 0 {
            return Err(Error::Config("tables must be >= 1".into()));
        }
        if self.sub_hashes == 0 || self.sub_hashes > 32 {
            return Err(Error::Config(format!(
                "sub_hashes must lie in 1..=32, got {}",
                self.sub_hashes
            )));
        }
        if self.approximation_factor < 1.0 {
            return Err(Error::Config("approximation_factor must be >= 1".into()));
        }
        if self.window_multiplier <= 0.0 {
            return Err(Error::Config("window_multiplier must be positive".into()));
        }
        Ok(())
    }
}

/// Parameters for [`HypercubeIndex`](crate::cube::HypercubeIndex).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CubeConfig {
    /// Projection dimension d'. Must lie in `1..=32`: it sizes both the
    /// vertex label and the per-axis modulus `2^(32 / d')`, so zero would
    /// divide by zero and anything past 32 would shift the modulus away.
    #[serde(default = "default_projection_dim")]
    pub projection_dim: usize,
    /// Max points examined per query (M).
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,
    /// Max vertices visited per query, the home vertex included.
    #[serde(default = "default_max_probes")]
    pub max_probes: usize,
    /// Nearest neighbors returned per query (N).
    #[serde(default = "default_neighbors")]
    pub neighbors: usize,
    /// Default range-search radius (R).
    #[serde(default = "default_radius")]
    pub radius: f64,
    /// Slack multiplier `C > 1` compensating for projection error.
    #[serde(default = "default_approximation_factor")]
    pub approximation_factor: f64,
    /// Quantization window as a multiple of the mean nearest-neighbor distance.
    #[serde(default = "default_window_multiplier")]
    pub window_multiplier: f64,
    /// Seed for the axis hashes and coin folds.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for CubeConfig {
    fn default() -> Self {
        Self {
            projection_dim: default_projection_dim(),
            max_candidates: default_max_candidates(),
            max_probes: default_max_probes(),
            neighbors: default_neighbors(),
            radius: default_radius(),
            approximation_factor: default_approximation_factor(),
            window_multiplier: default_window_multiplier(),
            seed: None,
        }
    }
}

impl CubeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.projection_dim == 0 || self.projection_dim > 32 {
            return Err(Error::Config(format!(
                "projection_dim must lie in 1..=32, got {}",
                self.projection_dim
            )));
        }
        if self.max_candidates == 0 {
            return Err(Error::Config("max_candidates must be >= 1".into()));
        }
        if self.max_probes == 0 {
            return Err(Error::Config("max_probes must be >= 1".into()));
        }
        if self.approximation_factor < 1.0 {
            return Err(Error::Config("approximation_factor must be >= 1".into()));
        }
        if self.window_multiplier <= 0.0 {
            return Err(Error::Config("window_multiplier must be positive".into()));
        }
        Ok(())
    }
}

/// How the clusterer assigns points to centroids each iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentMethod {
    /// Brute-force nearest centroid per point.
    Lloyd,
    /// Reverse assignment: range queries around each centroid against a
    /// hypercube index, radius doubling per round.
    ReverseCube,
}

/// Parameters for [`KMedians`](crate::cluster::KMedians).
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterConfig {
    /// Number of clusters (and centroids) for the whole run.
    pub clusters: usize,
    /// Assignment strategy.
    #[serde(default = "default_method")]
    pub method: AssignmentMethod,
    /// Relative change in the objective below which the loop stops.
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    /// Hard cap on assignment/update iterations. Exceeding it returns the
    /// best-effort clustering with `converged == false`.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Reverse assignment stops doubling its radius past this ceiling and
    /// falls back to brute force for whatever is still unassigned.
    #[serde(default = "default_radius_ceiling")]
    pub radius_ceiling: f64,
    /// Hypercube parameters used by [`AssignmentMethod::ReverseCube`].
    #[serde(default)]
    pub cube: CubeConfig,
    /// Seed for ++ initialization (and the cube, when unset there).
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_method() -> AssignmentMethod {
    AssignmentMethod::Lloyd
}

impl ClusterConfig {
    /// A Lloyd-assignment configuration with defaults for everything else.
    #[must_use]
    pub fn lloyd(clusters: usize) -> Self {
        Self {
            clusters,
            method: AssignmentMethod::Lloyd,
            epsilon: default_epsilon(),
            max_iterations: default_max_iterations(),
            radius_ceiling: default_radius_ceiling(),
            cube: CubeConfig::default(),
            seed: None,
        }
    }

    /// A reverse-assignment configuration backed by the given cube parameters.
    #[must_use]
    pub fn reverse_cube(clusters: usize, cube: CubeConfig) -> Self {
        Self {
            clusters,
            method: AssignmentMethod::ReverseCube,
            epsilon: default_epsilon(),
            max_iterations: default_max_iterations(),
            radius_ceiling: default_radius_ceiling(),
            cube,
            seed: None,
        }
    }

    /// Validate against a dataset of `n` points.
    pub fn validate(&self, n: usize) -> Result<()> {
        if self.clusters == 0 {
            return Err(Error::Config("clusters must be >= 1".into()));
        }
        if self.clusters > n {
            return Err(Error::Config(format!(
                "clusters ({}) exceeds dataset size ({n})",
                self.clusters
            )));
        }
        if !(self.epsilon > 0.0) {
            return Err(Error::Config("epsilon must be positive".into()));
        }
        if self.max_iterations == 0 {
            return Err(Error::Config("max_iterations must be >= 1".into()));
        }
        if self.method == AssignmentMethod::ReverseCube {
            self.cube.validate()?;
        }
        Ok(())
    }
}

/// Parse a component configuration out of a TOML document.
pub fn from_toml_str<T: DeserializeOwned>(text: &str) -> Result<T> {
    toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
}
