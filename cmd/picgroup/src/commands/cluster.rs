//! Batch clustering command.

use std::sync::Arc;

use clap::Args;
use picgroup_album::{Album, AlbumStore, ClusterRequest, KeywordNamer, MemoryStore};
use picgroup_cluster::Algorithm;

use super::{get_config, load_items, output_result};
use crate::Cli;

/// In-memory user the file's records are loaded under.
const LOCAL_USER: &str = "local";

/// Partition all items of the input file.
#[derive(Args)]
pub struct ClusterCommand {
    /// Partitioning algorithm: kmeans or hierarchical
    #[arg(short = 'a', long, default_value = "kmeans")]
    algorithm: String,

    /// Number of clusters (automatic when omitted or below 1)
    #[arg(short = 'k', long, allow_negative_numbers = true)]
    k: Option<i64>,

    /// Name clusters from member descriptions
    #[arg(long)]
    names: bool,
}

impl ClusterCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let algorithm: Algorithm = self.algorithm.parse()?;
        let cfg = get_config(cli)?;
        let records = load_items(cli)?;

        let store = Arc::new(MemoryStore::new());
        for record in records {
            store.put_item(LOCAL_USER, record)?;
        }
        let album = Album::new(store, cfg).with_namer(Arc::new(KeywordNamer::new()));

        let report = album
            .cluster(
                LOCAL_USER,
                &ClusterRequest {
                    algorithm,
                    n_clusters: self.k,
                    generate_names: self.names,
                },
            )
            .await?;
        output_result(&report, cli.output.as_deref(), cli.json)
    }
}
