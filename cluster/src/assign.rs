//! Incremental assignment: does a new embedding join an existing cluster
//! or seed a new one?
//!
//! The acceptance threshold adapts to each cluster's own cohesion. A
//! candidate has to be about as similar to the centroid as the cluster's
//! typical member (`mean - tightness`), never less than a flat `base`
//! floor. Single-member clusters have unreliable centroids, so growing one
//! demands near-duplicate similarity (`singleton`). The best cluster must
//! also lead the runner-up by `margin`; an ambiguous match starts a new
//! cluster instead of guessing.
//!
//! Decisions are pure: nothing is persisted here. Callers must serialize
//! decisions per user so that each call sees every earlier acceptance.

use serde::Serialize;
use tracing::info;

use crate::config::Thresholds;
use crate::error::{ClusterError, Result};
use crate::profile::{ClusterProfile, profile_assignment};
use crate::types::{ClusterAssignment, ClusterId, Item, next_cluster_id};
use crate::vecops::{cosine, ensure_dim, normalize};

/// Runner-up similarity when only one cluster exists; no real similarity
/// can reach it, so the margin check always passes.
pub const NO_RUNNER_UP: f32 = -1.0;

/// Why a new cluster was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NewClusterReason {
    /// The user has no profiled cluster yet.
    NoClusters,

    /// The embedding has zero norm.
    ZeroEmbedding,

    /// Best similarity fell short of the required threshold.
    BelowThreshold,

    /// Best cluster did not lead the runner-up by the margin.
    AmbiguousMargin,
}

/// Numbers behind a threshold comparison.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Evidence {
    pub best_cluster: ClusterId,
    pub best_similarity: f32,
    pub second_similarity: f32,
    pub size: usize,
    pub mean_similarity: f32,
    pub std_similarity: f32,
    pub required: f32,
}

/// Outcome of [`Assigner::decide`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    Join {
        cluster_id: ClusterId,
        evidence: Evidence,
    },
    Create {
        cluster_id: ClusterId,
        reason: NewClusterReason,
        evidence: Option<Evidence>,
    },
}

impl Decision {
    pub fn cluster_id(&self) -> ClusterId {
        match self {
            Decision::Join { cluster_id, .. } | Decision::Create { cluster_id, .. } => *cluster_id,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, Decision::Create { .. })
    }
}

/// Decides cluster membership for new embeddings.
#[derive(Debug, Clone, Default)]
pub struct Assigner {
    thresholds: Thresholds,
}

impl Assigner {
    pub fn new(thresholds: Thresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &Thresholds {
        &self.thresholds
    }

    /// Similarity a newcomer needs to join `profile`.
    pub fn required_threshold(&self, profile: &ClusterProfile) -> f32 {
        let t = &self.thresholds;
        if profile.size <= 1 {
            t.base.max(t.singleton)
        } else {
            t.base.max(profile.mean_similarity - t.tightness)
        }
    }

    /// Decides whether `embedding` joins one of `profiles` or starts a new
    /// cluster.
    ///
    /// `watermark` is the highest cluster id currently assigned for the user
    /// (including clusters that have no profile); a new cluster gets
    /// `watermark + 1`, or 0 when there is none. The embedding need not be
    /// normalized. Fails only when its dimensionality disagrees with the
    /// profiles.
    pub fn decide(
        &self,
        embedding: &[f32],
        profiles: &[ClusterProfile],
        watermark: Option<ClusterId>,
    ) -> Result<Decision> {
        let watermark = watermark.max(profiles.iter().map(|p| p.cluster_id).max());
        let new_id = next_cluster_id(watermark);

        let Some(first) = profiles.first() else {
            info!(cluster_id = new_id, "assign: no clusters yet, creating");
            return Ok(Decision::Create {
                cluster_id: new_id,
                reason: NewClusterReason::NoClusters,
                evidence: None,
            });
        };
        ensure_dim(embedding, first.centroid.len())?;

        let e = match normalize(embedding) {
            Ok(e) => e,
            Err(ClusterError::DegenerateVector) => {
                info!(cluster_id = new_id, "assign: zero-norm embedding, creating");
                return Ok(Decision::Create {
                    cluster_id: new_id,
                    reason: NewClusterReason::ZeroEmbedding,
                    evidence: None,
                });
            }
            Err(err) => return Err(err),
        };

        let mut ranked = Vec::with_capacity(profiles.len());
        for p in profiles {
            ensure_dim(&p.centroid, e.len())?;
            ranked.push((p, cosine(&e, &p.centroid)));
        }
        // Stable: equal similarities keep profile order.
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

        let (best, best_sim) = ranked[0];
        let second_sim = ranked.get(1).map_or(NO_RUNNER_UP, |&(_, s)| s);
        let required = self.required_threshold(best);
        let evidence = Evidence {
            best_cluster: best.cluster_id,
            best_similarity: best_sim,
            second_similarity: second_sim,
            size: best.size,
            mean_similarity: best.mean_similarity,
            std_similarity: best.std_similarity,
            required,
        };

        let clears = best_sim >= required;
        let separated = best_sim - second_sim >= self.thresholds.margin;
        let accept = clears && separated;
        info!(
            best_cluster = best.cluster_id,
            best_sim,
            second_sim,
            size = best.size,
            mean = best.mean_similarity,
            std = best.std_similarity,
            required,
            accept,
            "assign: decision"
        );

        if accept {
            return Ok(Decision::Join {
                cluster_id: best.cluster_id,
                evidence,
            });
        }
        let reason = if clears {
            NewClusterReason::AmbiguousMargin
        } else {
            NewClusterReason::BelowThreshold
        };
        Ok(Decision::Create {
            cluster_id: new_id,
            reason,
            evidence: Some(evidence),
        })
    }

    /// Profiles `assignment` from `items` and decides for `embedding`.
    pub fn decide_for(
        &self,
        embedding: &[f32],
        assignment: &ClusterAssignment,
        items: &[Item],
    ) -> Result<Decision> {
        let profiles = profile_assignment(assignment, items)?;
        self.decide(embedding, &profiles, assignment.watermark())
    }
}
