//! Grouping of embedding vectors into clusters, in batch and one item at a
//! time.
//!
//! Works with any fixed-length embedding (image captions, text, faces).
//!
//! # Usage
//!
//! ```
//! use picgroup_cluster::{partition, Algorithm, Assigner, PartitionConfig, build_profiles};
//!
//! let embeddings = vec![
//!     vec![1.0, 0.0, 0.0],
//!     vec![0.98, 0.1, 0.0],
//!     vec![0.0, 1.0, 0.0],
//!     vec![0.1, 0.97, 0.0],
//! ];
//! let ids: Vec<String> = (0..4).map(|i| format!("img-{i}")).collect();
//!
//! // Batch: k chosen by silhouette sweep when not given.
//! let result = partition(&embeddings, &ids, Algorithm::KMeans, None, &PartitionConfig::default()).unwrap();
//! assert_eq!(result.clusters.len(), 2);
//!
//! // Incremental: join the closest cluster or start a new one.
//! let members: Vec<(u64, &[f32])> = vec![(0, &embeddings[0][..]), (0, &embeddings[1][..])];
//! let profiles = build_profiles(members).unwrap();
//! let decision = Assigner::default().decide(&[0.99, 0.05, 0.0], &profiles, Some(0)).unwrap();
//! assert_eq!(decision.cluster_id(), 0);
//! ```
//!
//! # Design
//!
//! Every call is pure and takes its full input by value or reference:
//! profiles are rebuilt from the current assignment each time, and new
//! cluster ids derive from the highest id in that assignment. Callers own
//! persistence and must serialize incremental decisions per user.

mod agglomerative;
mod algorithm;
mod assign;
mod autok;
mod config;
mod error;
mod kmeans;
mod partition;
mod profile;
mod silhouette;
mod types;
pub mod vecops;

pub use agglomerative::Agglomerative;
pub use algorithm::Algorithm;
pub use assign::{Assigner, Decision, Evidence, NO_RUNNER_UP, NewClusterReason};
pub use autok::{FALLBACK_K, KSelection, score_candidates, select_k};
pub use config::{
    DEFAULT_BASE_THRESHOLD, DEFAULT_MARGIN, DEFAULT_MAX_ITER, DEFAULT_MAX_K, DEFAULT_N_INIT,
    DEFAULT_SEED, DEFAULT_SINGLETON_THRESHOLD, DEFAULT_TIGHTNESS, DEFAULT_TOLERANCE,
    PartitionConfig, Thresholds,
};
pub use error::{ClusterError, Result};
pub use kmeans::{KMeans, KMeansFit};
pub use partition::{partition, partition_items};
pub use profile::{ClusterProfile, build_profiles, profile_assignment};
pub use silhouette::silhouette_score;
pub use types::{ClusterAssignment, ClusterId, Item, PartitionResult};
