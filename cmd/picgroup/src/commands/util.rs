//! Utility functions for CLI commands.

use std::path::Path;

use anyhow::Context;
use picgroup_album::{AlbumConfig, ItemRecord};

use crate::Cli;

/// Loads a value from a YAML or JSON file, chosen by extension.
pub fn load_file<T: serde::de::DeserializeOwned>(path: &str) -> anyhow::Result<T> {
    let content = std::fs::read_to_string(path).with_context(|| format!("reading {path}"))?;
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("yaml");

    let result = match ext.to_lowercase().as_str() {
        "json" => serde_json::from_str(&content).with_context(|| format!("parsing {path}"))?,
        _ => serde_yaml::from_str(&content).with_context(|| format!("parsing {path}"))?,
    };

    Ok(result)
}

/// Loads the album config, or defaults when no `--config` is given.
pub fn get_config(cli: &Cli) -> anyhow::Result<AlbumConfig> {
    match cli.config.as_deref() {
        Some(path) => load_file(path),
        None => Ok(AlbumConfig::default()),
    }
}

/// Loads the records named by `-f`.
pub fn load_items(cli: &Cli) -> anyhow::Result<Vec<ItemRecord>> {
    let path = cli
        .input
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("items file is required, use -f flag"))?;
    load_file(path)
}

/// Outputs result as JSON or YAML.
pub fn output_result<T: serde::Serialize>(
    result: &T,
    output_path: Option<&str>,
    as_json: bool,
) -> anyhow::Result<()> {
    let output = if as_json {
        serde_json::to_string_pretty(result)? + "\n"
    } else {
        serde_yaml::to_string(result)?
    };

    match output_path {
        Some(path) => std::fs::write(path, output).with_context(|| format!("writing {path}"))?,
        None => print!("{}", output),
    }

    Ok(())
}
