use thiserror::Error;

/// Errors returned by clustering operations.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// A zero-norm vector was given where a direction is required.
    #[error("degenerate vector: zero norm has no direction")]
    DegenerateVector,

    #[error("unsupported clustering algorithm: {0}")]
    UnsupportedAlgorithm(String),

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("length mismatch: {ids} ids, {vectors} vectors")]
    LengthMismatch { ids: usize, vectors: usize },

    /// Requested cluster count is incompatible with the dataset.
    #[error("invalid cluster count: requested {requested}, but dataset has {n_items} items")]
    InvalidClusterCount { requested: usize, n_items: usize },
}

pub type Result<T> = std::result::Result<T, ClusterError>;
