use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Cluster identifier. Dense-ish per user, not necessarily contiguous.
pub type ClusterId = u64;

/// An item as seen by the engine: opaque id, optional embedding and text.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Item {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Item {
    pub fn new(id: impl Into<String>, embedding: Vec<f32>) -> Self {
        Self {
            id: id.into(),
            embedding: Some(embedding),
            description: None,
        }
    }

    /// Returns the embedding if it is present and non-empty.
    ///
    /// An empty vector from the embedding source means "no embedding".
    pub fn usable_embedding(&self) -> Option<&[f32]> {
        self.embedding.as_deref().filter(|e| !e.is_empty())
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("id", &self.id)
            .field("embedding_len", &self.embedding.as_ref().map(Vec::len))
            .field("description", &self.description)
            .finish()
    }
}

/// Current mapping from cluster id to member item ids for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterAssignment {
    clusters: BTreeMap<ClusterId, Vec<String>>,
}

impl ClusterAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an assignment from `(item, cluster)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, ClusterId)>,
        S: Into<String>,
    {
        let mut a = Self::new();
        for (item, cid) in pairs {
            a.insert(item, cid);
        }
        a
    }

    /// Places `item` in `cluster`, removing it from any previous cluster.
    pub fn insert(&mut self, item: impl Into<String>, cluster: ClusterId) {
        let item = item.into();
        self.remove(&item);
        self.clusters.entry(cluster).or_default().push(item);
    }

    /// Removes `item` from whichever cluster holds it. Empty clusters vanish.
    pub fn remove(&mut self, item: &str) -> Option<ClusterId> {
        let cid = self.cluster_of(item)?;
        if let Some(members) = self.clusters.get_mut(&cid) {
            members.retain(|m| m != item);
            if members.is_empty() {
                self.clusters.remove(&cid);
            }
        }
        Some(cid)
    }

    pub fn cluster_of(&self, item: &str) -> Option<ClusterId> {
        self.clusters
            .iter()
            .find(|(_, members)| members.iter().any(|m| m == item))
            .map(|(&cid, _)| cid)
    }

    pub fn members(&self, cluster: ClusterId) -> &[String] {
        self.clusters.get(&cluster).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates clusters in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (ClusterId, &[String])> {
        self.clusters.iter().map(|(&cid, m)| (cid, m.as_slice()))
    }

    /// Highest cluster id in use, if any.
    pub fn watermark(&self) -> Option<ClusterId> {
        self.clusters.keys().next_back().copied()
    }

    /// Identifier for a freshly created cluster: watermark + 1, or 0.
    pub fn next_cluster_id(&self) -> ClusterId {
        next_cluster_id(self.watermark())
    }

    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

pub(crate) fn next_cluster_id(watermark: Option<ClusterId>) -> ClusterId {
    watermark.map_or(0, |w| w + 1)
}

/// Outcome of a batch partition.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionResult {
    /// Transient label (0..k) to member ids, in input order.
    pub clusters: BTreeMap<usize, Vec<String>>,

    /// Items that took no part in partitioning.
    pub unclustered: Vec<String>,

    /// Cluster count actually requested from the algorithm (0 when skipped).
    pub k: usize,
}

impl PartitionResult {
    pub(crate) fn unclustered(ids: Vec<String>) -> Self {
        Self {
            clusters: BTreeMap::new(),
            unclustered: ids,
            k: 0,
        }
    }

    /// Total items across partitions and the unclustered set.
    pub fn item_count(&self) -> usize {
        self.clusters.values().map(Vec::len).sum::<usize>() + self.unclustered.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn watermark_and_next_id() {
        let a = ClusterAssignment::new();
        assert_eq!(a.watermark(), None);
        assert_eq!(a.next_cluster_id(), 0);

        let a = ClusterAssignment::from_pairs([("a", 0), ("b", 7), ("c", 3)]);
        assert_eq!(a.watermark(), Some(7));
        assert_eq!(a.next_cluster_id(), 8);
    }

    #[test]
    fn insert_moves_item() {
        let mut a = ClusterAssignment::from_pairs([("a", 1), ("b", 1)]);
        a.insert("a", 2);
        assert_eq!(a.cluster_of("a"), Some(2));
        assert_eq!(a.members(1), ["b".to_string()]);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn remove_drops_empty_cluster() {
        let mut a = ClusterAssignment::from_pairs([("a", 5)]);
        assert_eq!(a.remove("a"), Some(5));
        assert!(a.is_empty());
        assert_eq!(a.remove("a"), None);
    }

    #[test]
    fn empty_embedding_is_not_usable() {
        let item = Item::new("x", vec![]);
        assert!(item.usable_embedding().is_none());
        let item = Item::new("y", vec![1.0]);
        assert_eq!(item.usable_embedding(), Some(&[1.0f32][..]));
    }
}
