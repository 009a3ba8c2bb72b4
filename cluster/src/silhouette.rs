//! Silhouette coefficient, the cohesion/separation score used to pick k.

use std::collections::BTreeMap;

use crate::vecops::sq_dist;

/// Mean silhouette coefficient over all points, with Euclidean distance.
///
/// Points in a singleton cluster score 0. Returns `None` unless the labels
/// form at least 2 and fewer than `data.len()` distinct groups, where the
/// score is undefined.
pub fn silhouette_score(data: &[Vec<f32>], labels: &[usize]) -> Option<f64> {
    let n = data.len();
    if n != labels.len() {
        return None;
    }

    let mut index: BTreeMap<usize, usize> = BTreeMap::new();
    for &l in labels {
        let next = index.len();
        index.entry(l).or_insert(next);
    }
    let groups = index.len();
    if groups < 2 || groups >= n {
        return None;
    }

    let group_of: Vec<usize> = labels.iter().map(|l| index[l]).collect();
    let mut sizes = vec![0usize; groups];
    for &g in &group_of {
        sizes[g] += 1;
    }

    let mut total = 0.0;
    let mut sums = vec![0.0f64; groups];
    for i in 0..n {
        let own = group_of[i];
        if sizes[own] == 1 {
            continue;
        }
        sums.iter_mut().for_each(|s| *s = 0.0);
        for j in 0..n {
            if i != j {
                sums[group_of[j]] += sq_dist(&data[i], &data[j]).sqrt();
            }
        }
        let a = sums[own] / (sizes[own] - 1) as f64;
        let b = (0..groups)
            .filter(|&g| g != own)
            .map(|g| sums[g] / sizes[g] as f64)
            .fold(f64::INFINITY, f64::min);
        let denom = a.max(b);
        if denom > 0.0 {
            total += (b - a) / denom;
        }
    }
    Some(total / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_separated_scores_near_one() {
        let data = vec![vec![0.0], vec![0.1], vec![10.0], vec![10.1]];
        let s = silhouette_score(&data, &[0, 0, 1, 1]).unwrap();
        assert!(s > 0.98, "got {s}");
    }

    #[test]
    fn bad_split_scores_lower() {
        let data = vec![vec![0.0], vec![0.1], vec![10.0], vec![10.1]];
        let good = silhouette_score(&data, &[0, 0, 1, 1]).unwrap();
        let bad = silhouette_score(&data, &[0, 1, 0, 1]).unwrap();
        assert!(bad < good);
        assert!(bad < 0.0, "got {bad}");
    }

    #[test]
    fn undefined_for_degenerate_labels() {
        let data = vec![vec![0.0], vec![1.0], vec![2.0]];
        assert_eq!(silhouette_score(&data, &[0, 0, 0]), None);
        assert_eq!(silhouette_score(&data, &[0, 1, 2]), None);
        assert_eq!(silhouette_score(&data, &[0, 1]), None);
    }

    #[test]
    fn singleton_points_score_zero() {
        // Cluster {0,1} is perfect; point 2 alone contributes 0.
        let data = vec![vec![0.0], vec![0.0], vec![5.0]];
        let s = silhouette_score(&data, &[3, 3, 9]).unwrap();
        assert!((s - 2.0 / 3.0).abs() < 1e-9, "got {s}");
    }
}
