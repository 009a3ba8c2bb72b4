//! Automatic choice of the cluster count.
//!
//! Sweeps k over `2..=min(max_k, n - 1)`, partitions with k-means for each
//! candidate and keeps the k with the best silhouette score. The sweep is
//! best-effort: a candidate that fails to partition, or that collapses into
//! an unscoreable label set, is skipped rather than reported.

use serde::Serialize;
use tracing::debug;

use crate::algorithm::Algorithm;
use crate::config::PartitionConfig;
use crate::silhouette::silhouette_score;

/// Cluster count used when no candidate could be scored.
pub const FALLBACK_K: usize = 3;

/// Outcome of [`select_k`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KSelection {
    pub k: usize,

    /// Silhouette score of the chosen k; `None` for a fallback.
    pub score: Option<f64>,

    /// True when no candidate was scoreable and `min(3, n)` was used.
    pub fallback: bool,
}

/// Scores every candidate k that yields a scoreable partition.
///
/// `data` is expected to be L2-normalized. Returned pairs are in ascending k.
pub fn score_candidates(data: &[Vec<f32>], cfg: &PartitionConfig) -> Vec<(usize, f64)> {
    let n = data.len();
    if n < 2 {
        return Vec::new();
    }
    let cfg = cfg.with_defaults();
    let max_k = cfg.max_k.min(n - 1);

    let mut scores = Vec::new();
    for k in 2..=max_k {
        let labels = match Algorithm::KMeans.fit_predict(data, k, &cfg) {
            Ok(labels) => labels,
            Err(err) => {
                debug!(k, error = %err, "autok: candidate failed, skipping");
                continue;
            }
        };
        // Labels are dense, so the largest label + 1 is the group count.
        let groups = labels.iter().max().map_or(0, |&m| m + 1);
        if groups < 2 || groups >= n {
            debug!(k, groups, "autok: degenerate partition, skipping");
            continue;
        }
        match silhouette_score(data, &labels) {
            Some(score) => {
                debug!(k, score, "autok: scored candidate");
                scores.push((k, score));
            }
            None => debug!(k, "autok: unscoreable partition, skipping"),
        }
    }
    scores
}

/// Picks the cluster count for `data`.
///
/// Returns the best-scoring k, or `min(3, n)` when nothing could be scored.
/// Fewer than two points yield `k = 1`.
pub fn select_k(data: &[Vec<f32>], cfg: &PartitionConfig) -> KSelection {
    let n = data.len();
    if n < 2 {
        return KSelection {
            k: 1,
            score: None,
            fallback: true,
        };
    }

    let mut best: Option<(usize, f64)> = None;
    for (k, score) in score_candidates(data, cfg) {
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((k, score));
        }
    }

    match best {
        Some((k, score)) => KSelection {
            k,
            score: Some(score),
            fallback: false,
        },
        None => KSelection {
            k: FALLBACK_K.min(n),
            score: None,
            fallback: true,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vecops::normalize;

    fn bimodal() -> Vec<Vec<f32>> {
        let mut data = Vec::new();
        for i in 0..5 {
            let j = i as f32 * 0.01;
            data.push(normalize(&[1.0, j, 0.0]).unwrap());
            data.push(normalize(&[1.0, 0.0, j]).unwrap());
            data.push(normalize(&[j, 1.0, 0.0]).unwrap());
            data.push(normalize(&[0.0, 1.0, j]).unwrap());
        }
        data
    }

    #[test]
    fn bimodal_selects_two() {
        let sel = select_k(&bimodal(), &PartitionConfig::default());
        assert_eq!(sel.k, 2);
        assert!(!sel.fallback);
        assert!(sel.score.unwrap() > 0.9);
    }

    #[test]
    fn three_groups_selects_three() {
        let mut data = Vec::new();
        for i in 0..4 {
            let j = i as f32 * 0.02;
            data.push(normalize(&[1.0, j, 0.0]).unwrap());
            data.push(normalize(&[j, 1.0, 0.0]).unwrap());
            data.push(normalize(&[0.0, j, 1.0]).unwrap());
        }
        let sel = select_k(&data, &PartitionConfig::default());
        assert_eq!(sel.k, 3);
    }

    #[test]
    fn candidates_capped_by_n_minus_one() {
        let data = bimodal()[..4].to_vec();
        let scores = score_candidates(&data, &PartitionConfig::default());
        assert!(scores.iter().all(|&(k, _)| (2..=3).contains(&k)));
    }

    #[test]
    fn two_points_fall_back() {
        let data = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let sel = select_k(&data, &PartitionConfig::default());
        assert_eq!(
            sel,
            KSelection {
                k: 2,
                score: None,
                fallback: true
            }
        );
    }

    #[test]
    fn identical_points_fall_back_to_three() {
        let data = vec![vec![1.0, 0.0]; 6];
        let sel = select_k(&data, &PartitionConfig::default());
        assert!(sel.fallback);
        assert_eq!(sel.k, 3);
    }

    #[test]
    fn failing_candidates_are_skipped() {
        // Mixed dimensions make every k-means candidate fail.
        let data = vec![
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![1.0, 0.0, 0.0],
            vec![0.7, 0.7],
        ];
        let cfg = PartitionConfig::default();
        assert!(score_candidates(&data, &cfg).is_empty());
        assert_eq!(
            select_k(&data, &cfg),
            KSelection {
                k: 3,
                score: None,
                fallback: true
            }
        );
    }

    #[test]
    fn single_point() {
        let sel = select_k(&[vec![1.0]], &PartitionConfig::default());
        assert_eq!(sel.k, 1);
        assert!(sel.fallback);
    }
}
