use picgroup_cluster::{PartitionConfig, Thresholds};
use serde::{Deserialize, Serialize};

use crate::namer::{DEFAULT_NAMING_SAMPLES, FALLBACK_NAME};

/// Controls album behavior. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlbumConfig {
    /// Acceptance constants for upload-time assignment.
    pub thresholds: Thresholds,

    /// Batch partitioning parameters.
    pub partition: PartitionConfig,

    /// Member descriptions offered to the namer per cluster.
    pub naming_samples: usize,

    /// Name used when naming fails.
    pub fallback_name: String,
}

impl AlbumConfig {
    pub(crate) fn with_defaults(mut self) -> Self {
        if self.naming_samples == 0 {
            self.naming_samples = DEFAULT_NAMING_SAMPLES;
        }
        if self.fallback_name.is_empty() {
            self.fallback_name = FALLBACK_NAME.to_string();
        }
        self.partition = self.partition.with_defaults();
        self
    }
}

impl Default for AlbumConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            partition: PartitionConfig::default(),
            naming_samples: DEFAULT_NAMING_SAMPLES,
            fallback_name: FALLBACK_NAME.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: AlbumConfig =
            serde_json::from_str(r#"{"thresholds": {"singleton": 0.95}, "naming_samples": 3}"#).unwrap();
        assert_eq!(cfg.thresholds.singleton, 0.95);
        assert_eq!(cfg.thresholds.base, 0.80);
        assert_eq!(cfg.naming_samples, 3);
        assert_eq!(cfg.fallback_name, FALLBACK_NAME);
    }

    #[test]
    fn with_defaults_fills_zero_values() {
        let cfg = AlbumConfig {
            naming_samples: 0,
            fallback_name: String::new(),
            ..Default::default()
        }
        .with_defaults();
        assert_eq!(cfg.naming_samples, DEFAULT_NAMING_SAMPLES);
        assert_eq!(cfg.fallback_name, FALLBACK_NAME);
    }
}
