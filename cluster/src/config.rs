use serde::{Deserialize, Serialize};

/// Similarity every accepted item must reach, whatever the cluster.
pub const DEFAULT_BASE_THRESHOLD: f32 = 0.80;

/// Similarity required to grow a single-member cluster.
pub const DEFAULT_SINGLETON_THRESHOLD: f32 = 0.92;

/// How far below a cluster's mean cohesion a newcomer may fall.
pub const DEFAULT_TIGHTNESS: f32 = 0.07;

/// Minimum lead of the best cluster over the runner-up.
pub const DEFAULT_MARGIN: f32 = 0.05;

pub const DEFAULT_MAX_K: usize = 10;
pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_N_INIT: usize = 10;
pub const DEFAULT_MAX_ITER: usize = 300;
pub const DEFAULT_TOLERANCE: f64 = 1e-4;

/// Acceptance constants for incremental assignment.
///
/// Any field left out of a deserialized config keeps its default.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Flat floor for every cluster.
    pub base: f32,

    /// Floor for clusters with a single member.
    pub singleton: f32,

    /// Allowed distance below the cluster's mean member similarity.
    pub tightness: f32,

    /// Required separation between best and second-best similarity.
    pub margin: f32,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE_THRESHOLD,
            singleton: DEFAULT_SINGLETON_THRESHOLD,
            tightness: DEFAULT_TIGHTNESS,
            margin: DEFAULT_MARGIN,
        }
    }
}

/// Controls batch partitioning and the automatic choice of k.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    /// Upper bound for the k sweep. Capped at n - 1 per call.
    pub max_k: usize,

    /// Seed for k-means++ initialization.
    pub seed: u64,

    /// Number of k-means restarts; the lowest-inertia run wins.
    pub n_init: usize,

    /// Lloyd iteration cap per restart.
    pub max_iter: usize,

    /// Stop once total centroid movement (squared) falls below this.
    pub tolerance: f64,
}

impl PartitionConfig {
    /// Replaces zero values with defaults.
    pub fn with_defaults(mut self) -> Self {
        if self.max_k == 0 {
            self.max_k = DEFAULT_MAX_K;
        }
        if self.n_init == 0 {
            self.n_init = DEFAULT_N_INIT;
        }
        if self.max_iter == 0 {
            self.max_iter = DEFAULT_MAX_ITER;
        }
        if self.tolerance <= 0.0 {
            self.tolerance = DEFAULT_TOLERANCE;
        }
        self
    }
}

impl Default for PartitionConfig {
    fn default() -> Self {
        Self {
            max_k: DEFAULT_MAX_K,
            seed: DEFAULT_SEED,
            n_init: DEFAULT_N_INIT,
            max_iter: DEFAULT_MAX_ITER,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}
