//! Cluster count selection command.

use clap::Args;
use picgroup_cluster::{KSelection, score_candidates, select_k, vecops};
use serde::Serialize;

use super::{get_config, load_items, output_result};
use crate::Cli;

/// Score every candidate cluster count for the items in the input file.
#[derive(Args)]
pub struct AutoKCommand {
    /// Upper bound for the sweep (overrides config file)
    #[arg(long)]
    max_k: Option<usize>,
}

#[derive(Serialize)]
struct Candidate {
    k: usize,
    score: f64,
}

#[derive(Serialize)]
struct AutoKOutput {
    items: usize,
    skipped: usize,
    candidates: Vec<Candidate>,
    selection: KSelection,
}

impl AutoKCommand {
    pub fn run(&self, cli: &Cli) -> anyhow::Result<()> {
        let mut cfg = get_config(cli)?.partition;
        if let Some(max_k) = self.max_k {
            cfg.max_k = max_k;
        }

        let records = load_items(cli)?;
        let data: Vec<Vec<f32>> = records
            .iter()
            .filter_map(|r| r.embedding.as_deref())
            .filter_map(|e| vecops::normalize(e).ok())
            .collect();
        if let Some(first) = data.first() {
            for v in &data {
                vecops::ensure_dim(v, first.len())?;
            }
        }

        let candidates = score_candidates(&data, &cfg)
            .into_iter()
            .map(|(k, score)| Candidate { k, score })
            .collect();
        let out = AutoKOutput {
            items: records.len(),
            skipped: records.len() - data.len(),
            candidates,
            selection: select_k(&data, &cfg),
        };
        output_result(&out, cli.output.as_deref(), cli.json)
    }
}
