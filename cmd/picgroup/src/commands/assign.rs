//! Incremental assignment command.

use std::sync::Arc;

use anyhow::Context;
use clap::Args;
use picgroup_album::{Album, AlbumStore, ItemRecord, KeywordNamer, MemoryStore};
use serde::Serialize;

use super::{get_config, load_file, load_items, output_result};
use crate::Cli;

const LOCAL_USER: &str = "local";

/// Decide whether a new item joins an existing cluster.
#[derive(Args)]
pub struct AssignCommand {
    /// File holding the new item record (YAML or JSON)
    #[arg(long)]
    item: String,

    /// Name a newly created cluster from the item's description
    #[arg(long)]
    names: bool,
}

#[derive(Serialize)]
struct AssignOutput {
    item_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    decision: Option<picgroup_cluster::Decision>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cluster_name: Option<String>,
}

impl AssignCommand {
    pub async fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let cfg = get_config(cli)?;
        let records = load_items(cli)?;
        let item: ItemRecord = load_file(&self.item)?;
        let item_id = item.id.clone();

        let store = Arc::new(MemoryStore::new());
        for record in records {
            store.put_item(LOCAL_USER, record)?;
        }
        let mut album = Album::new(store.clone(), cfg);
        if self.names {
            album = album.with_namer(Arc::new(KeywordNamer::new()));
        }

        let decision = album.add_item(LOCAL_USER, item).await?;
        let cluster_name = store
            .items(LOCAL_USER)?
            .into_iter()
            .find(|r| r.id == item_id)
            .context("new item missing from store")?
            .cluster_name;

        output_result(
            &AssignOutput {
                item_id,
                decision,
                cluster_name,
            },
            cli.output.as_deref(),
            cli.json,
        )
    }
}
