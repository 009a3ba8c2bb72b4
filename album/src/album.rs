use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use futures::future::join_all;
use picgroup_cluster::{
    Algorithm, Assigner, ClusterId, Decision, Item, PartitionResult, partition_items,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::AlbumConfig;
use crate::error::AlbumError;
use crate::namer::{ClusterNamer, name_or_fallback};
use crate::record::{ItemRecord, assignment_of};
use crate::store::AlbumStore;

/// Parameters of a batch clustering run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterRequest {
    pub algorithm: Algorithm,

    /// Requested cluster count; absent or below 1 means automatic.
    pub n_clusters: Option<i64>,

    pub generate_names: bool,
}

/// One cluster and its members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterGroup {
    pub cluster_id: ClusterId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub item_ids: Vec<String>,
}

/// Result of [`Album::cluster`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClusterReport {
    pub clusters: Vec<ClusterGroup>,
    pub unclustered: Vec<String>,
}

/// A user's item collection, grouped by the clustering engine.
///
/// Holds no item state of its own: every call reads the store and writes
/// decisions back. Calls for the same user are serialized; different users
/// run in parallel.
pub struct Album {
    store: Arc<dyn AlbumStore>,
    namer: Option<Arc<dyn ClusterNamer>>,
    assigner: Assigner,
    cfg: AlbumConfig,
    locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl Album {
    pub fn new(store: Arc<dyn AlbumStore>, cfg: AlbumConfig) -> Self {
        let cfg = cfg.with_defaults();
        Self {
            store,
            namer: None,
            assigner: Assigner::new(cfg.thresholds),
            cfg,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Enables cluster naming.
    pub fn with_namer(mut self, namer: Arc<dyn ClusterNamer>) -> Self {
        self.namer = Some(namer);
        self
    }

    pub fn config(&self) -> &AlbumConfig {
        &self.cfg
    }

    fn user_lock(&self, user: &str) -> Result<Arc<tokio::sync::Mutex<()>>, AlbumError> {
        let mut locks = self
            .locks
            .lock()
            .map_err(|_| AlbumError::Task("user lock table poisoned".into()))?;
        // Entries only the table still references belong to finished calls.
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        Ok(locks.entry(user.to_string()).or_default().clone())
    }

    /// Re-partitions all of `user`'s items and persists the new grouping.
    ///
    /// Partition labels become the users' cluster ids. Failing to persist
    /// is logged and does not fail the call.
    pub async fn cluster(&self, user: &str, req: &ClusterRequest) -> Result<ClusterReport, AlbumError> {
        let lock = self.user_lock(user)?;
        let _guard = lock.lock().await;

        let records = self.store.items(user)?;
        if records.is_empty() {
            return Ok(ClusterReport::default());
        }

        let items: Vec<Item> = records.iter().map(ItemRecord::to_item).collect();
        let (algorithm, k, pcfg) = (req.algorithm, req.n_clusters, self.cfg.partition);
        let result = tokio::task::spawn_blocking(move || partition_items(&items, algorithm, k, &pcfg))
            .await
            .map_err(|e| AlbumError::Task(e.to_string()))??;
        info!(user, groups = result.clusters.len(), unclustered = result.unclustered.len(), "album: clustered");

        let names = if req.generate_names {
            self.name_partitions(&records, &result).await
        } else {
            HashMap::new()
        };

        let assignments: HashMap<String, ClusterId> = result
            .clusters
            .iter()
            .flat_map(|(&label, ids)| ids.iter().map(move |id| (id.clone(), label as ClusterId)))
            .collect();
        if let Err(err) = self.store.set_clusters(user, &assignments, &names) {
            warn!(user, error = %err, "album: failed to persist cluster assignments");
        }

        let clusters = result
            .clusters
            .into_iter()
            .map(|(label, item_ids)| {
                let cluster_id = label as ClusterId;
                ClusterGroup {
                    cluster_id,
                    name: names.get(&cluster_id).cloned(),
                    item_ids,
                }
            })
            .collect();
        Ok(ClusterReport {
            clusters,
            unclustered: result.unclustered,
        })
    }

    /// Names every partition concurrently. Partitions whose sampled members
    /// carry neither description nor filename stay unnamed.
    async fn name_partitions(
        &self,
        records: &[ItemRecord],
        result: &PartitionResult,
    ) -> HashMap<ClusterId, String> {
        let Some(namer) = self.namer.as_deref() else {
            return HashMap::new();
        };
        let by_id: HashMap<&str, &ItemRecord> = records.iter().map(|r| (r.id.as_str(), r)).collect();
        let samples = self.cfg.naming_samples;
        let fallback = self.cfg.fallback_name.as_str();

        let tasks = result.clusters.iter().map(|(&label, ids)| {
            let sampled: Vec<&ItemRecord> = ids
                .iter()
                .take(samples)
                .filter_map(|id| by_id.get(id.as_str()).copied())
                .collect();
            async move {
                let mut texts: Vec<String> = sampled
                    .iter()
                    .filter_map(|r| r.description.clone().filter(|d| !d.is_empty()))
                    .collect();
                if texts.is_empty() {
                    texts = sampled
                        .iter()
                        .filter(|r| !r.filename.is_empty())
                        .map(|r| r.filename.clone())
                        .collect();
                }
                if texts.is_empty() {
                    return None;
                }
                let name = name_or_fallback(namer, &texts, samples, fallback).await;
                Some((label as ClusterId, name))
            }
        });
        join_all(tasks).await.into_iter().flatten().collect()
    }

    /// Stores `record` and places it into a cluster.
    ///
    /// The record joins an existing cluster of the user's or seeds a new one,
    /// which is named from the record's description when a namer is set.
    /// Returns `None` when the record has no embedding or the engine rejects
    /// it (for example a dimension mismatch); either way it is stored but
    /// left unassigned. Only store failures are returned as errors.
    pub async fn add_item(&self, user: &str, record: ItemRecord) -> Result<Option<Decision>, AlbumError> {
        let lock = self.user_lock(user)?;
        let _guard = lock.lock().await;

        let others: Vec<ItemRecord> = self
            .store
            .items(user)?
            .into_iter()
            .filter(|r| r.id != record.id)
            .collect();
        self.store.put_item(user, record.clone())?;

        let Some(embedding) = record.embedding.as_deref().filter(|e| !e.is_empty()) else {
            info!(user, item = %record.id, "album: no embedding, leaving unassigned");
            return Ok(None);
        };

        let assignment = assignment_of(&others);
        let items: Vec<Item> = others.iter().map(ItemRecord::to_item).collect();
        let decision = match self.assigner.decide_for(embedding, &assignment, &items) {
            Ok(decision) => decision,
            Err(err) => {
                warn!(user, item = %record.id, error = %err, "album: auto-assign failed");
                return Ok(None);
            }
        };

        let mut name = None;
        if decision.is_new() {
            if let (Some(namer), Some(desc)) = (self.namer.as_deref(), record.description.as_ref()) {
                let texts = [desc.clone()];
                name = Some(
                    name_or_fallback(namer, &texts, self.cfg.naming_samples, &self.cfg.fallback_name).await,
                );
            }
        }
        self.store
            .set_cluster(user, &record.id, decision.cluster_id(), name.as_deref())?;
        info!(user, item = %record.id, cluster_id = decision.cluster_id(), new = decision.is_new(), "album: assigned");
        Ok(Some(decision))
    }

    /// Stored clusters of `user` in ascending id order. Unassigned items are
    /// left out.
    pub fn clusters(&self, user: &str) -> Result<Vec<ClusterGroup>, AlbumError> {
        let mut grouped: BTreeMap<ClusterId, ClusterGroup> = BTreeMap::new();
        for r in self.store.items(user)? {
            let Some(cid) = r.cluster_id else {
                continue;
            };
            let group = grouped.entry(cid).or_insert_with(|| ClusterGroup {
                cluster_id: cid,
                name: None,
                item_ids: Vec::new(),
            });
            if r.cluster_name.is_some() {
                group.name = r.cluster_name;
            }
            group.item_ids.push(r.id);
        }
        Ok(grouped.into_values().collect())
    }
}
