//! Batch partitioning of a fixed set of embeddings.

use tracing::{info, warn};

use crate::algorithm::Algorithm;
use crate::autok::select_k;
use crate::config::PartitionConfig;
use crate::error::{ClusterError, Result};
use crate::types::{Item, PartitionResult};
use crate::vecops::{ensure_dim, norm, normalize};

/// Partitions `embeddings` (one per id in `ids`) into groups.
///
/// A requested `k` below 1 is treated as unspecified and chosen by
/// [`select_k`]; a `k` above the number of points is clamped down to it.
/// Fewer than two points yield no partitions and every id unclustered.
///
/// Every embedding must be non-zero and share one dimensionality.
pub fn partition(
    embeddings: &[Vec<f32>],
    ids: &[String],
    algorithm: Algorithm,
    k: Option<i64>,
    cfg: &PartitionConfig,
) -> Result<PartitionResult> {
    if embeddings.len() != ids.len() {
        return Err(ClusterError::LengthMismatch {
            ids: ids.len(),
            vectors: embeddings.len(),
        });
    }

    let requested = match k {
        Some(k) if k < 1 => {
            warn!(k, "partition: invalid cluster count, selecting automatically");
            None
        }
        Some(k) => Some(usize::try_from(k).unwrap_or(usize::MAX)),
        None => None,
    };

    let n = embeddings.len();
    if n < 2 {
        warn!(n, "partition: not enough items to cluster, returning all as unclustered");
        return Ok(PartitionResult::unclustered(ids.to_vec()));
    }

    let dim = embeddings[0].len();
    let mut normed = Vec::with_capacity(n);
    for emb in embeddings {
        ensure_dim(emb, dim)?;
        normed.push(normalize(emb)?);
    }

    let cfg = cfg.with_defaults();
    let mut k = match requested {
        Some(k) => k,
        None => {
            let sel = select_k(&normed, &cfg);
            info!(k = sel.k, score = ?sel.score, fallback = sel.fallback, "partition: auto-selected cluster count");
            sel.k
        }
    };
    if k > n {
        warn!(requested = k, n_items = n, "partition: more clusters than items, clamping");
        k = n;
    }

    info!(%algorithm, n_items = n, k, "partition: running");
    let labels = algorithm.fit_predict(&normed, k, &cfg)?;

    let mut result = PartitionResult {
        k,
        ..Default::default()
    };
    for (id, label) in ids.iter().zip(labels) {
        result.clusters.entry(label).or_default().push(id.clone());
    }
    info!(groups = result.clusters.len(), "partition: complete");
    Ok(result)
}

/// Partitions items, routing those without a usable embedding to the
/// unclustered set.
///
/// An embedding is unusable when absent, empty, or of zero or non-finite
/// norm. The
/// returned unclustered list holds those items first, in input order.
pub fn partition_items(
    items: &[Item],
    algorithm: Algorithm,
    k: Option<i64>,
    cfg: &PartitionConfig,
) -> Result<PartitionResult> {
    let mut ids = Vec::new();
    let mut embeddings = Vec::new();
    let mut skipped = Vec::new();
    for item in items {
        match item.usable_embedding() {
            Some(emb) if is_usable(emb) => {
                ids.push(item.id.clone());
                embeddings.push(emb.to_vec());
            }
            _ => skipped.push(item.id.clone()),
        }
    }

    if embeddings.is_empty() {
        warn!(items = items.len(), "partition: no items with embeddings");
        return Ok(PartitionResult::unclustered(skipped));
    }

    let mut result = partition(&embeddings, &ids, algorithm, k, cfg)?;
    skipped.append(&mut result.unclustered);
    result.unclustered = skipped;
    Ok(result)
}

fn is_usable(emb: &[f32]) -> bool {
    let n = norm(emb);
    n > 0.0 && n.is_finite()
}
