use std::fmt;

use picgroup_cluster::{ClusterAssignment, ClusterId, Item};
use serde::{Deserialize, Serialize};

/// A stored item as the persistence collaborator returns it.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct ItemRecord {
    pub id: String,

    #[serde(default)]
    pub filename: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_id: Option<ClusterId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster_name: Option<String>,
}

impl ItemRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn with_filename(mut self, filename: &str) -> Self {
        self.filename = filename.to_string();
        self
    }

    pub fn with_cluster(mut self, cluster_id: ClusterId) -> Self {
        self.cluster_id = Some(cluster_id);
        self
    }

    /// The engine's view of this record.
    pub fn to_item(&self) -> Item {
        Item {
            id: self.id.clone(),
            embedding: self.embedding.clone(),
            description: self.description.clone(),
        }
    }

    /// Text offered to the namer: the description, else the filename.
    pub fn naming_text(&self) -> Option<&str> {
        self.description
            .as_deref()
            .filter(|d| !d.is_empty())
            .or_else(|| Some(self.filename.as_str()).filter(|f| !f.is_empty()))
    }
}

impl fmt::Debug for ItemRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemRecord")
            .field("id", &self.id)
            .field("filename", &self.filename)
            .field("embedding_len", &self.embedding.as_ref().map(Vec::len))
            .field("cluster_id", &self.cluster_id)
            .field("cluster_name", &self.cluster_name)
            .finish()
    }
}

/// Current cluster membership of `records`.
pub fn assignment_of(records: &[ItemRecord]) -> ClusterAssignment {
    ClusterAssignment::from_pairs(
        records
            .iter()
            .filter_map(|r| r.cluster_id.map(|cid| (r.id.clone(), cid))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naming_text_prefers_description() {
        let r = ItemRecord::new("a").with_filename("beach.jpg").with_description("sunset");
        assert_eq!(r.naming_text(), Some("sunset"));

        let r = ItemRecord::new("a").with_filename("beach.jpg");
        assert_eq!(r.naming_text(), Some("beach.jpg"));

        assert_eq!(ItemRecord::new("a").naming_text(), None);
    }

    #[test]
    fn assignment_skips_unassigned() {
        let records = vec![
            ItemRecord::new("a").with_cluster(2),
            ItemRecord::new("b"),
            ItemRecord::new("c").with_cluster(2),
        ];
        let a = assignment_of(&records);
        assert_eq!(a.members(2), ["a".to_string(), "c".to_string()]);
        assert_eq!(a.watermark(), Some(2));
    }

    #[test]
    fn deserialize_minimal() {
        let r: ItemRecord = serde_json::from_str(r#"{"id": "x", "embedding": [1.0, 0.0]}"#).unwrap();
        assert_eq!(r.id, "x");
        assert_eq!(r.embedding, Some(vec![1.0, 0.0]));
        assert!(r.cluster_id.is_none());
    }
}
