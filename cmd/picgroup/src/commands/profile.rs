//! Cluster profile command.

use clap::Args;
use picgroup_album::{ItemRecord, assignment_of};
use picgroup_cluster::profile_assignment;
use serde::Serialize;

use super::{load_items, output_result};
use crate::Cli;

/// Show centroid and cohesion statistics of the clusters in the input file.
#[derive(Args)]
pub struct ProfileCommand {
    /// Include centroid vectors in the output
    #[arg(long)]
    centroids: bool,
}

#[derive(Serialize)]
struct ProfileRow {
    cluster_id: u64,
    size: usize,
    mean_similarity: f32,
    std_similarity: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    centroid: Option<Vec<f32>>,
}

impl ProfileCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let records = load_items(cli)?;
        let items: Vec<_> = records.iter().map(ItemRecord::to_item).collect();
        let profiles = profile_assignment(&assignment_of(&records), &items)?;

        let rows: Vec<ProfileRow> = profiles
            .into_iter()
            .map(|p| ProfileRow {
                cluster_id: p.cluster_id,
                size: p.size,
                mean_similarity: p.mean_similarity,
                std_similarity: p.std_similarity,
                centroid: self.centroids.then_some(p.centroid),
            })
            .collect();
        output_result(&rows, cli.output.as_deref(), cli.json)
    }
}
