//! picgroup CLI - group item embeddings into clusters from the command line.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{AssignCommand, AutoKCommand, ClusterCommand, ProfileCommand};

/// picgroup CLI - batch clustering and incremental assignment of embeddings.
///
/// Items are read from a YAML or JSON file holding a list of records:
///   - id: img-1
///     filename: beach.jpg
///     embedding: [0.1, 0.9, ...]
///     description: a dog on the beach
///     cluster_id: 0
#[derive(Parser)]
#[command(name = "picgroup")]
#[command(about = "Embedding clustering CLI tool")]
#[command(version)]
pub struct Cli {
    /// Config file with thresholds and partition parameters (YAML or JSON)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Items file (YAML or JSON)
    #[arg(short = 'f', long = "file", global = true)]
    pub input: Option<String>,

    /// Output file (default: stdout)
    #[arg(short = 'o', long, global = true)]
    pub output: Option<String>,

    /// Output as JSON instead of YAML
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Partition all items into clusters
    Cluster(ClusterCommand),
    /// Decide the cluster of one new item
    Assign(AssignCommand),
    /// Show centroid and cohesion statistics per cluster
    Profile(ProfileCommand),
    /// Score candidate cluster counts
    Autok(AutoKCommand),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Cluster(cmd) => cmd.run(&cli).await,
        Commands::Assign(cmd) => cmd.run(&cli).await,
        Commands::Profile(cmd) => cmd.run(&cli),
        Commands::Autok(cmd) => cmd.run(&cli),
    }
}
