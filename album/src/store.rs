use std::collections::HashMap;
use std::sync::Mutex;

use picgroup_cluster::ClusterId;

use crate::error::AlbumError;
use crate::record::ItemRecord;

/// Persists item records and their cluster membership per user.
///
/// Implementations must be safe for concurrent use.
/// Use [`MemoryStore`] for in-memory storage (testing/ephemeral).
pub trait AlbumStore: Send + Sync {
    /// Returns all records of `user` in insertion order.
    fn items(&self, user: &str) -> Result<Vec<ItemRecord>, AlbumError>;

    /// Inserts or replaces a record.
    fn put_item(&self, user: &str, record: ItemRecord) -> Result<(), AlbumError>;

    /// Assigns one item to a cluster, optionally naming the cluster.
    fn set_cluster(
        &self,
        user: &str,
        item_id: &str,
        cluster_id: ClusterId,
        name: Option<&str>,
    ) -> Result<(), AlbumError>;

    /// Replaces cluster membership in bulk.
    ///
    /// Items absent from `assignments` are left untouched. Cluster names
    /// missing from `names` are cleared on the affected items.
    fn set_clusters(
        &self,
        user: &str,
        assignments: &HashMap<String, ClusterId>,
        names: &HashMap<ClusterId, String>,
    ) -> Result<(), AlbumError>;
}

/// In-memory [`AlbumStore`] implementation.
/// Data is lost on restart. Suitable for testing or ephemeral use.
pub struct MemoryStore {
    inner: Mutex<HashMap<String, Vec<ItemRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    fn with_user<T>(
        &self,
        user: &str,
        f: impl FnOnce(&mut Vec<ItemRecord>) -> Result<T, AlbumError>,
    ) -> Result<T, AlbumError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| AlbumError::Store("memory store lock poisoned".into()))?;
        f(inner.entry(user.to_string()).or_default())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AlbumStore for MemoryStore {
    fn items(&self, user: &str) -> Result<Vec<ItemRecord>, AlbumError> {
        self.with_user(user, |records| Ok(records.clone()))
    }

    fn put_item(&self, user: &str, record: ItemRecord) -> Result<(), AlbumError> {
        self.with_user(user, |records| {
            match records.iter_mut().find(|r| r.id == record.id) {
                Some(existing) => *existing = record,
                None => records.push(record),
            }
            Ok(())
        })
    }

    fn set_cluster(
        &self,
        user: &str,
        item_id: &str,
        cluster_id: ClusterId,
        name: Option<&str>,
    ) -> Result<(), AlbumError> {
        self.with_user(user, |records| {
            let record = records
                .iter_mut()
                .find(|r| r.id == item_id)
                .ok_or_else(|| AlbumError::NotFound(item_id.to_string()))?;
            record.cluster_id = Some(cluster_id);
            if let Some(name) = name {
                record.cluster_name = Some(name.to_string());
            }
            Ok(())
        })
    }

    fn set_clusters(
        &self,
        user: &str,
        assignments: &HashMap<String, ClusterId>,
        names: &HashMap<ClusterId, String>,
    ) -> Result<(), AlbumError> {
        self.with_user(user, |records| {
            for record in records.iter_mut() {
                if let Some(&cid) = assignments.get(&record.id) {
                    record.cluster_id = Some(cid);
                    record.cluster_name = names.get(&cid).cloned();
                }
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_and_items() {
        let store = MemoryStore::new();
        store.put_item("u", ItemRecord::new("a")).unwrap();
        store.put_item("u", ItemRecord::new("b")).unwrap();
        store.put_item("other", ItemRecord::new("c")).unwrap();

        let items = store.items("u").unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "a");
        assert!(store.items("nobody").unwrap().is_empty());
    }

    #[test]
    fn put_replaces_existing() {
        let store = MemoryStore::new();
        store.put_item("u", ItemRecord::new("a")).unwrap();
        store
            .put_item("u", ItemRecord::new("a").with_filename("x.jpg"))
            .unwrap();
        let items = store.items("u").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].filename, "x.jpg");
    }

    #[test]
    fn set_cluster_and_missing_item() {
        let store = MemoryStore::new();
        store.put_item("u", ItemRecord::new("a")).unwrap();
        store.set_cluster("u", "a", 3, Some("Beach")).unwrap();
        let a = &store.items("u").unwrap()[0];
        assert_eq!(a.cluster_id, Some(3));
        assert_eq!(a.cluster_name.as_deref(), Some("Beach"));

        let err = store.set_cluster("u", "zzz", 1, None).unwrap_err();
        assert!(matches!(err, AlbumError::NotFound(_)));
    }

    #[test]
    fn set_clusters_bulk() {
        let store = MemoryStore::new();
        for id in ["a", "b", "c"] {
            store.put_item("u", ItemRecord::new(id)).unwrap();
        }
        let assignments = HashMap::from([("a".to_string(), 0), ("b".to_string(), 1)]);
        let names = HashMap::from([(0, "Pets".to_string())]);
        store.set_clusters("u", &assignments, &names).unwrap();

        let items = store.items("u").unwrap();
        assert_eq!(items[0].cluster_id, Some(0));
        assert_eq!(items[0].cluster_name.as_deref(), Some("Pets"));
        assert_eq!(items[1].cluster_id, Some(1));
        assert_eq!(items[1].cluster_name, None);
        assert_eq!(items[2].cluster_id, None);
    }
}
