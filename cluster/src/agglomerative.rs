//! Hierarchical-merge partitioning with Ward linkage.
//!
//! Starts from singletons and repeatedly merges the pair whose union grows
//! the within-cluster variance least, until `k` clusters remain. Merge
//! costs are kept in a dense matrix and updated with the Lance-Williams
//! recurrence, so memory is O(n^2) and time O(n^3). Album-sized batches
//! (hundreds to low thousands of items) are the intended load.

use crate::error::{ClusterError, Result};
use crate::vecops::{ensure_dim, sq_dist};

/// Ward agglomerative clustering to a fixed number of clusters.
#[derive(Debug, Clone)]
pub struct Agglomerative {
    k: usize,
}

impl Agglomerative {
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    /// Returns a label per point in `0..k`, numbered by first appearance.
    pub fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        let n = data.len();
        if self.k == 0 || self.k > n {
            return Err(ClusterError::InvalidClusterCount {
                requested: self.k,
                n_items: n,
            });
        }
        let dim = data[0].len();
        for v in data {
            ensure_dim(v, dim)?;
        }

        // dist[i][j] holds the Ward cost between clusters rooted at i and j.
        let mut dist = vec![vec![0.0f64; n]; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let d = sq_dist(&data[i], &data[j]);
                dist[i][j] = d;
                dist[j][i] = d;
            }
        }

        let mut size = vec![1usize; n];
        let mut active = vec![true; n];
        let mut root: Vec<usize> = (0..n).collect();
        let mut remaining = n;

        while remaining > self.k {
            let Some((a, b)) = closest_pair(&dist, &active) else {
                break;
            };

            let (na, nb) = (size[a] as f64, size[b] as f64);
            for c in 0..n {
                if !active[c] || c == a || c == b {
                    continue;
                }
                let nc = size[c] as f64;
                let merged = ((na + nc) * dist[a][c] + (nb + nc) * dist[b][c] - nc * dist[a][b])
                    / (na + nb + nc);
                dist[a][c] = merged;
                dist[c][a] = merged;
            }

            size[a] += size[b];
            active[b] = false;
            for r in root.iter_mut() {
                if *r == b {
                    *r = a;
                }
            }
            remaining -= 1;
        }

        Ok(crate::algorithm::relabel_dense(&root))
    }
}

/// Lowest-cost active pair; ties go to the lexicographically smallest pair.
fn closest_pair(dist: &[Vec<f64>], active: &[bool]) -> Option<(usize, usize)> {
    let n = active.len();
    let mut best: Option<(usize, usize)> = None;
    let mut best_d = f64::INFINITY;
    for i in 0..n {
        if !active[i] {
            continue;
        }
        for j in (i + 1)..n {
            if active[j] && dist[i][j] < best_d {
                best_d = dist[i][j];
                best = Some((i, j));
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_nearby_points() {
        let data = vec![
            vec![0.0, 0.0],
            vec![10.0, 10.0],
            vec![0.1, 0.0],
            vec![10.0, 10.2],
            vec![0.0, 0.1],
        ];
        let labels = Agglomerative::new(2).fit_predict(&data).unwrap();
        assert_eq!(labels, vec![0, 1, 0, 1, 0]);
    }

    #[test]
    fn k_equals_n_keeps_singletons() {
        let data = vec![vec![0.0], vec![1.0], vec![2.0]];
        let labels = Agglomerative::new(3).fit_predict(&data).unwrap();
        assert_eq!(labels, vec![0, 1, 2]);
    }

    #[test]
    fn k_one_merges_everything() {
        let data = vec![vec![0.0], vec![5.0], vec![9.0]];
        let labels = Agglomerative::new(1).fit_predict(&data).unwrap();
        assert_eq!(labels, vec![0, 0, 0]);
    }

    #[test]
    fn ward_prefers_balanced_merge() {
        // 0 and 1 merge first; then 2 is closer to {0,1} than 3 is to anything.
        let data = vec![vec![0.0], vec![1.0], vec![3.0], vec![20.0]];
        let labels = Agglomerative::new(2).fit_predict(&data).unwrap();
        assert_eq!(labels, vec![0, 0, 0, 1]);
    }

    #[test]
    fn rejects_bad_k() {
        let data = vec![vec![0.0], vec![1.0]];
        assert!(Agglomerative::new(0).fit_predict(&data).is_err());
        assert!(Agglomerative::new(3).fit_predict(&data).is_err());
    }
}
