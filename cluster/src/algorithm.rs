use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::agglomerative::Agglomerative;
use crate::config::PartitionConfig;
use crate::error::{ClusterError, Result};
use crate::kmeans::KMeans;

/// Selects the batch partitioning algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Centroid relocation (k-means).
    #[default]
    KMeans,

    /// Hierarchical merge (Ward agglomerative).
    Hierarchical,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::KMeans => "kmeans",
            Algorithm::Hierarchical => "hierarchical",
        }
    }

    /// Partitions `data` into at most `k` groups.
    ///
    /// Labels are dense and numbered by first appearance, so two runs that
    /// produce the same membership produce the same labels.
    pub fn fit_predict(&self, data: &[Vec<f32>], k: usize, cfg: &PartitionConfig) -> Result<Vec<usize>> {
        let labels = match self {
            Algorithm::KMeans => KMeans::with_config(k, cfg).fit_predict(data)?,
            Algorithm::Hierarchical => Agglomerative::new(k).fit_predict(data)?,
        };
        Ok(relabel_dense(&labels))
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = ClusterError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "kmeans" => Ok(Algorithm::KMeans),
            "hierarchical" => Ok(Algorithm::Hierarchical),
            other => Err(ClusterError::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

/// Renumbers arbitrary labels to `0..m` in order of first appearance.
pub(crate) fn relabel_dense(labels: &[usize]) -> Vec<usize> {
    let mut map: HashMap<usize, usize> = HashMap::new();
    labels
        .iter()
        .map(|&l| {
            let next = map.len();
            *map.entry(l).or_insert(next)
        })
        .collect()
}
