//! Centroid-relocation partitioning: k-means++ seeding followed by Lloyd
//! iterations, restarted `n_init` times from a single seeded generator.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::PartitionConfig;
use crate::error::{ClusterError, Result};
use crate::vecops::{ensure_dim, sq_dist};

/// K-means parameters.
#[derive(Debug, Clone)]
pub struct KMeans {
    k: usize,
    n_init: usize,
    max_iter: usize,
    tolerance: f64,
    seed: u64,
}

/// Result of a k-means fit.
#[derive(Debug, Clone)]
pub struct KMeansFit {
    /// Cluster index per input point, in `0..k`.
    pub labels: Vec<usize>,

    pub centroids: Vec<Vec<f32>>,

    /// Sum of squared distances of points to their centroid.
    pub inertia: f64,

    /// Lloyd iterations used by the winning restart.
    pub iterations: usize,
}

impl KMeans {
    pub fn new(k: usize) -> Self {
        Self::with_config(k, &PartitionConfig::default())
    }

    pub fn with_config(k: usize, cfg: &PartitionConfig) -> Self {
        let cfg = cfg.with_defaults();
        Self {
            k,
            n_init: cfg.n_init,
            max_iter: cfg.max_iter,
            tolerance: cfg.tolerance,
            seed: cfg.seed,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Fits `k` centroids to `data`.
    ///
    /// Empty clusters are reseeded during the Lloyd loop, but the final
    /// assignment step may still leave a centroid without members when
    /// points coincide. With duplicate inputs, `k == n` can therefore yield
    /// fewer than `k` non-empty groups.
    pub fn fit(&self, data: &[Vec<f32>]) -> Result<KMeansFit> {
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

        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut best: Option<KMeansFit> = None;
        for _ in 0..self.n_init.max(1) {
            let fit = self.run_once(data, dim, &mut rng);
            if best.as_ref().is_none_or(|b| fit.inertia < b.inertia) {
                best = Some(fit);
            }
        }
        best.ok_or(ClusterError::InvalidClusterCount {
            requested: self.k,
            n_items: n,
        })
    }

    /// Convenience wrapper returning only the labels.
    pub fn fit_predict(&self, data: &[Vec<f32>]) -> Result<Vec<usize>> {
        Ok(self.fit(data)?.labels)
    }

    fn run_once(&self, data: &[Vec<f32>], dim: usize, rng: &mut StdRng) -> KMeansFit {
        let k = self.k;
        let mut centroids = seed_plus_plus(data, k, rng);
        let mut labels = vec![0usize; data.len()];
        let mut iterations = 0;

        for iter in 0..self.max_iter {
            iterations = iter + 1;
            assign_nearest(data, &centroids, &mut labels);

            let mut sums = vec![vec![0.0f64; dim]; k];
            let mut counts = vec![0usize; k];
            for (x, &l) in data.iter().zip(&labels) {
                counts[l] += 1;
                for (s, &v) in sums[l].iter_mut().zip(x) {
                    *s += v as f64;
                }
            }
            reseed_empty(data, &centroids, &mut labels, &mut sums, &mut counts);

            let mut shift = 0.0;
            for c in 0..k {
                if counts[c] == 0 {
                    continue;
                }
                let n = counts[c] as f64;
                let next: Vec<f32> = sums[c].iter().map(|&s| (s / n) as f32).collect();
                shift += sq_dist(&centroids[c], &next);
                centroids[c] = next;
            }
            if shift <= self.tolerance {
                break;
            }
        }

        assign_nearest(data, &centroids, &mut labels);
        let inertia = data
            .iter()
            .zip(&labels)
            .map(|(x, &l)| sq_dist(x, &centroids[l]))
            .sum();

        KMeansFit {
            labels,
            centroids,
            inertia,
            iterations,
        }
    }
}

/// k-means++: first centroid uniform, the rest sampled proportional to the
/// squared distance to the nearest centroid chosen so far.
fn seed_plus_plus(data: &[Vec<f32>], k: usize, rng: &mut StdRng) -> Vec<Vec<f32>> {
    let n = data.len();
    let mut centroids = Vec::with_capacity(k);
    centroids.push(data[rng.gen_range(0..n)].clone());

    let mut d2: Vec<f64> = data.iter().map(|x| sq_dist(x, &centroids[0])).collect();
    while centroids.len() < k {
        let total: f64 = d2.iter().sum();
        let idx = if total > 0.0 {
            let mut target = rng.r#gen::<f64>() * total;
            let mut chosen = None;
            let mut last_positive = 0;
            for (i, &d) in d2.iter().enumerate() {
                if d <= 0.0 {
                    continue;
                }
                last_positive = i;
                target -= d;
                if target <= 0.0 {
                    chosen = Some(i);
                    break;
                }
            }
            chosen.unwrap_or(last_positive)
        } else {
            // All remaining points coincide with a centroid.
            rng.gen_range(0..n)
        };

        let c = data[idx].clone();
        for (d, x) in d2.iter_mut().zip(data) {
            *d = d.min(sq_dist(x, &c));
        }
        centroids.push(c);
    }
    centroids
}

fn assign_nearest(data: &[Vec<f32>], centroids: &[Vec<f32>], labels: &mut [usize]) {
    for (x, label) in data.iter().zip(labels.iter_mut()) {
        let mut best = 0;
        let mut best_d = f64::INFINITY;
        for (c, centroid) in centroids.iter().enumerate() {
            let d = sq_dist(x, centroid);
            if d < best_d {
                best_d = d;
                best = c;
            }
        }
        *label = best;
    }
}

/// Moves the points farthest from their centroid into empty clusters.
fn reseed_empty(
    data: &[Vec<f32>],
    centroids: &[Vec<f32>],
    labels: &mut [usize],
    sums: &mut [Vec<f64>],
    counts: &mut [usize],
) {
    if counts.iter().all(|&c| c > 0) {
        return;
    }
    let mut far: Vec<(usize, f64)> = data
        .iter()
        .zip(labels.iter())
        .enumerate()
        .map(|(i, (x, &l))| (i, sq_dist(x, &centroids[l])))
        .collect();
    far.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    let mut candidates = far.into_iter().map(|(i, _)| i);

    for c in 0..counts.len() {
        if counts[c] > 0 {
            continue;
        }
        let Some(i) = candidates.by_ref().find(|&i| counts[labels[i]] > 1) else {
            return;
        };
        let from = labels[i];
        counts[from] -= 1;
        for (s, &v) in sums[from].iter_mut().zip(&data[i]) {
            *s -= v as f64;
        }
        counts[c] = 1;
        sums[c] = data[i].iter().map(|&v| v as f64).collect();
        labels[i] = c;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_blobs() -> Vec<Vec<f32>> {
        vec![
            vec![0.0, 0.0],
            vec![0.1, 0.1],
            vec![0.0, 0.2],
            vec![10.0, 10.0],
            vec![10.1, 10.1],
            vec![9.9, 10.0],
        ]
    }

    #[test]
    fn separates_two_blobs() {
        let labels = KMeans::new(2).fit_predict(&two_blobs()).unwrap();
        assert_eq!(labels[0], labels[1]);
        assert_eq!(labels[0], labels[2]);
        assert_eq!(labels[3], labels[4]);
        assert_eq!(labels[3], labels[5]);
        assert_ne!(labels[0], labels[3]);
    }

    #[test]
    fn deterministic_for_fixed_seed() {
        let data = two_blobs();
        let a = KMeans::new(3).fit(&data).unwrap();
        let b = KMeans::new(3).fit(&data).unwrap();
        assert_eq!(a.labels, b.labels);
        assert_eq!(a.inertia, b.inertia);
    }

    #[test]
    fn k_equals_n_gives_singletons() {
        let data = two_blobs();
        let fit = KMeans::new(data.len()).fit(&data).unwrap();
        let mut seen = fit.labels.clone();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), data.len());
        assert!(fit.inertia.abs() < 1e-9);
    }

    #[test]
    fn rejects_bad_k() {
        let data = two_blobs();
        assert!(matches!(
            KMeans::new(0).fit(&data),
            Err(ClusterError::InvalidClusterCount { requested: 0, .. })
        ));
        assert!(matches!(
            KMeans::new(7).fit(&data),
            Err(ClusterError::InvalidClusterCount { requested: 7, n_items: 6 })
        ));
        assert!(KMeans::new(1).fit(&[]).is_err());
    }

    #[test]
    fn rejects_mixed_dimensions() {
        let data = vec![vec![1.0, 0.0], vec![1.0, 0.0, 0.0]];
        assert!(matches!(
            KMeans::new(1).fit(&data),
            Err(ClusterError::DimensionMismatch { expected: 2, got: 3 })
        ));
    }

    #[test]
    fn duplicate_points_do_not_panic() {
        let data = vec![vec![1.0, 0.0]; 4];
        let fit = KMeans::new(3).fit(&data).unwrap();
        assert_eq!(fit.labels.len(), 4);
        assert!(fit.inertia.abs() < 1e-12);
    }

    #[test]
    fn k_equal_n_on_duplicates_may_merge_groups() {
        let data = vec![vec![1.0, 0.0], vec![1.0, 0.0], vec![0.0, 1.0]];
        let fit = KMeans::new(3).fit(&data).unwrap();
        assert!(fit.labels.iter().all(|&l| l < 3));
        assert_eq!(fit.labels[0], fit.labels[1]);
        assert_ne!(fit.labels[0], fit.labels[2]);
        assert!(fit.inertia.abs() < 1e-12);
    }
}
