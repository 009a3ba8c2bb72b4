//! Per-cluster centroid and cohesion statistics.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::Serialize;

use crate::error::Result;
use crate::types::{ClusterAssignment, ClusterId, Item};
use crate::vecops::{cosine, ensure_dim, normalize, normalize_in_place};

/// Derived summary of one cluster, rebuilt on every assignment call.
#[derive(Clone, Serialize)]
pub struct ClusterProfile {
    pub cluster_id: ClusterId,

    /// L2-normalized mean of the normalized member embeddings.
    pub centroid: Vec<f32>,

    /// Members that contributed (zero-norm embeddings are left out).
    pub size: usize,

    /// Mean cosine similarity of members to the centroid.
    pub mean_similarity: f32,

    /// Population standard deviation of those similarities.
    pub std_similarity: f32,
}

impl fmt::Debug for ClusterProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterProfile")
            .field("cluster_id", &self.cluster_id)
            .field("size", &self.size)
            .field("mean_similarity", &self.mean_similarity)
            .field("std_similarity", &self.std_similarity)
            .field("centroid_len", &self.centroid.len())
            .finish()
    }
}

/// Builds profiles from `(cluster, embedding)` member pairs.
///
/// Zero-norm embeddings are skipped. A cluster with no remaining member,
/// or whose members cancel out to a zero mean, gets no profile. Profiles
/// come back in ascending cluster id order. Mixed dimensionality fails.
pub fn build_profiles<'a, I>(members: I) -> Result<Vec<ClusterProfile>>
where
    I: IntoIterator<Item = (ClusterId, &'a [f32])>,
{
    let mut dim = None;
    let mut grouped: BTreeMap<ClusterId, Vec<Vec<f32>>> = BTreeMap::new();
    for (cid, emb) in members {
        let d = *dim.get_or_insert(emb.len());
        ensure_dim(emb, d)?;
        // Zero-norm members stay assigned but cannot shape the centroid.
        if let Ok(v) = normalize(emb) {
            grouped.entry(cid).or_default().push(v);
        }
    }

    let mut profiles = Vec::with_capacity(grouped.len());
    for (cid, vecs) in grouped {
        if let Some(p) = profile_of(cid, &vecs) {
            profiles.push(p);
        }
    }
    Ok(profiles)
}

/// Builds profiles for `assignment`, looking member embeddings up in `items`.
///
/// Members missing from `items` or lacking an embedding are ignored.
pub fn profile_assignment(assignment: &ClusterAssignment, items: &[Item]) -> Result<Vec<ClusterProfile>> {
    let by_id: HashMap<&str, &[f32]> = items
        .iter()
        .filter_map(|i| i.usable_embedding().map(|e| (i.id.as_str(), e)))
        .collect();
    build_profiles(assignment.iter().flat_map(|(cid, members)| {
        members
            .iter()
            .filter_map(|m| by_id.get(m.as_str()).map(|&e| (cid, e)))
            .collect::<Vec<_>>()
    }))
}

fn profile_of(cluster_id: ClusterId, normed: &[Vec<f32>]) -> Option<ClusterProfile> {
    let first = normed.first()?;
    let mut sum = vec![0.0f64; first.len()];
    for v in normed {
        for (s, &x) in sum.iter_mut().zip(v) {
            *s += x as f64;
        }
    }
    let n = normed.len() as f64;
    let mut centroid: Vec<f32> = sum.iter().map(|&s| (s / n) as f32).collect();
    normalize_in_place(&mut centroid).ok()?;

    let sims: Vec<f64> = normed.iter().map(|v| cosine(v, &centroid) as f64).collect();
    let mean = sims.iter().sum::<f64>() / n;
    let var = sims.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / n;

    Some(ClusterProfile {
        cluster_id,
        centroid,
        size: normed.len(),
        mean_similarity: mean as f32,
        std_similarity: var.sqrt() as f32,
    })
}
