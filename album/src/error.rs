use picgroup_cluster::ClusterError;
use thiserror::Error;

/// Errors returned by album operations.
#[derive(Debug, Error)]
pub enum AlbumError {
    #[error("album: store error: {0}")]
    Store(String),

    #[error("album: naming error: {0}")]
    Naming(String),

    #[error("album: {0}")]
    Cluster(#[from] ClusterError),

    /// A blocking clustering task panicked or was cancelled.
    #[error("album: task failed: {0}")]
    Task(String),

    #[error("album: not found: {0}")]
    NotFound(String),
}
